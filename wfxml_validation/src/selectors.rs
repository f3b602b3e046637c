/*!
# Codepoint range tables and matchers

The tables in this module are taken verbatim from the XML 1.0 grammar
(production \[2\] and Appendix B). They are sorted and non-overlapping, which
[`CodepointRanges`] relies on for its binary search.
*/
use std::cmp::Ordering;
use std::fmt;

/**
# Predicate trait for matching chars
*/
pub trait CharSelector {
	/// Return true if the given char is selected by the selector
	fn select(&self, c: char) -> bool;
}

/// Selects all chars
#[derive(Debug, Copy, Clone)]
pub struct AllChars();

impl CharSelector for char {
	fn select(&self, c: char) -> bool {
		*self == c
	}
}

impl CharSelector for &'_ [char] {
	fn select(&self, c: char) -> bool {
		self.contains(&c)
	}
}

impl CharSelector for AllChars {
	fn select(&self, _c: char) -> bool {
		true
	}
}

// start to end (incl.), on raw codepoints so that the surrogate block can be
// described even though it has no rust chars
/// Selects all codepoints from a range (including both ends)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CodepointRange(pub u32, pub u32);

impl CodepointRange {
	pub fn contains(&self, cp: u32) -> bool {
		self.0 <= cp && cp <= self.1
	}

	fn locate(&self, cp: u32) -> Ordering {
		if self.1 < cp {
			Ordering::Less
		} else if self.0 > cp {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}
}

/// Valid codepoints for character data (XML 1.0 § 2.2 \[2\])
pub const XML_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x0009, 0x000a),
	CodepointRange(0x000d, 0x000d),
	CodepointRange(0x0020, 0xd7ff),
	CodepointRange(0xe000, 0xfffd),
	CodepointRange(0x10000, 0x10ffff),
];

/// XML 1.0 Appendix B \[85\]
pub const XML_BASE_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x0041, 0x005a),
	CodepointRange(0x0061, 0x007a),
	CodepointRange(0x00c0, 0x00d6),
	CodepointRange(0x00d8, 0x00f6),
	CodepointRange(0x00f8, 0x00ff),
	CodepointRange(0x0100, 0x0131),
	CodepointRange(0x0134, 0x013e),
	CodepointRange(0x0141, 0x0148),
	CodepointRange(0x014a, 0x017e),
	CodepointRange(0x0180, 0x01c3),
	CodepointRange(0x01cd, 0x01f0),
	CodepointRange(0x01f4, 0x01f5),
	CodepointRange(0x01fa, 0x0217),
	CodepointRange(0x0250, 0x02a8),
	CodepointRange(0x02bb, 0x02c1),
	CodepointRange(0x0386, 0x0386),
	CodepointRange(0x0388, 0x038a),
	CodepointRange(0x038c, 0x038c),
	CodepointRange(0x038e, 0x03a1),
	CodepointRange(0x03a3, 0x03ce),
	CodepointRange(0x03d0, 0x03d6),
	CodepointRange(0x03da, 0x03da),
	CodepointRange(0x03dc, 0x03dc),
	CodepointRange(0x03de, 0x03de),
	CodepointRange(0x03e0, 0x03e0),
	CodepointRange(0x03e2, 0x03f3),
	CodepointRange(0x0401, 0x040c),
	CodepointRange(0x040e, 0x044f),
	CodepointRange(0x0451, 0x045c),
	CodepointRange(0x045e, 0x0481),
	CodepointRange(0x0490, 0x04c4),
	CodepointRange(0x04c7, 0x04c8),
	CodepointRange(0x04cb, 0x04cc),
	CodepointRange(0x04d0, 0x04eb),
	CodepointRange(0x04ee, 0x04f5),
	CodepointRange(0x04f8, 0x04f9),
	CodepointRange(0x0531, 0x0556),
	CodepointRange(0x0559, 0x0559),
	CodepointRange(0x0561, 0x0586),
	CodepointRange(0x05d0, 0x05ea),
	CodepointRange(0x05f0, 0x05f2),
	CodepointRange(0x0621, 0x063a),
	CodepointRange(0x0641, 0x064a),
	CodepointRange(0x0671, 0x06b7),
	CodepointRange(0x06ba, 0x06be),
	CodepointRange(0x06c0, 0x06ce),
	CodepointRange(0x06d0, 0x06d3),
	CodepointRange(0x06d5, 0x06d5),
	CodepointRange(0x06e5, 0x06e6),
	CodepointRange(0x0905, 0x0939),
	CodepointRange(0x093d, 0x093d),
	CodepointRange(0x0958, 0x0961),
	CodepointRange(0x0985, 0x098c),
	CodepointRange(0x098f, 0x0990),
	CodepointRange(0x0993, 0x09a8),
	CodepointRange(0x09aa, 0x09b0),
	CodepointRange(0x09b2, 0x09b2),
	CodepointRange(0x09b6, 0x09b9),
	CodepointRange(0x09dc, 0x09dd),
	CodepointRange(0x09df, 0x09e1),
	CodepointRange(0x09f0, 0x09f1),
	CodepointRange(0x0a05, 0x0a0a),
	CodepointRange(0x0a0f, 0x0a10),
	CodepointRange(0x0a13, 0x0a28),
	CodepointRange(0x0a2a, 0x0a30),
	CodepointRange(0x0a32, 0x0a33),
	CodepointRange(0x0a35, 0x0a36),
	CodepointRange(0x0a38, 0x0a39),
	CodepointRange(0x0a59, 0x0a5c),
	CodepointRange(0x0a5e, 0x0a5e),
	CodepointRange(0x0a72, 0x0a74),
	CodepointRange(0x0a85, 0x0a8b),
	CodepointRange(0x0a8d, 0x0a8d),
	CodepointRange(0x0a8f, 0x0a91),
	CodepointRange(0x0a93, 0x0aa8),
	CodepointRange(0x0aaa, 0x0ab0),
	CodepointRange(0x0ab2, 0x0ab3),
	CodepointRange(0x0ab5, 0x0ab9),
	CodepointRange(0x0abd, 0x0abd),
	CodepointRange(0x0ae0, 0x0ae0),
	CodepointRange(0x0b05, 0x0b0c),
	CodepointRange(0x0b0f, 0x0b10),
	CodepointRange(0x0b13, 0x0b28),
	CodepointRange(0x0b2a, 0x0b30),
	CodepointRange(0x0b32, 0x0b33),
	CodepointRange(0x0b36, 0x0b39),
	CodepointRange(0x0b3d, 0x0b3d),
	CodepointRange(0x0b5c, 0x0b5d),
	CodepointRange(0x0b5f, 0x0b61),
	CodepointRange(0x0b85, 0x0b8a),
	CodepointRange(0x0b8e, 0x0b90),
	CodepointRange(0x0b92, 0x0b95),
	CodepointRange(0x0b99, 0x0b9a),
	CodepointRange(0x0b9c, 0x0b9c),
	CodepointRange(0x0b9e, 0x0b9f),
	CodepointRange(0x0ba3, 0x0ba4),
	CodepointRange(0x0ba8, 0x0baa),
	CodepointRange(0x0bae, 0x0bb5),
	CodepointRange(0x0bb7, 0x0bb9),
	CodepointRange(0x0c05, 0x0c0c),
	CodepointRange(0x0c0e, 0x0c10),
	CodepointRange(0x0c12, 0x0c28),
	CodepointRange(0x0c2a, 0x0c33),
	CodepointRange(0x0c35, 0x0c39),
	CodepointRange(0x0c60, 0x0c61),
	CodepointRange(0x0c85, 0x0c8c),
	CodepointRange(0x0c8e, 0x0c90),
	CodepointRange(0x0c92, 0x0ca8),
	CodepointRange(0x0caa, 0x0cb3),
	CodepointRange(0x0cb5, 0x0cb9),
	CodepointRange(0x0cde, 0x0cde),
	CodepointRange(0x0ce0, 0x0ce1),
	CodepointRange(0x0d05, 0x0d0c),
	CodepointRange(0x0d0e, 0x0d10),
	CodepointRange(0x0d12, 0x0d28),
	CodepointRange(0x0d2a, 0x0d39),
	CodepointRange(0x0d60, 0x0d61),
	CodepointRange(0x0e01, 0x0e2e),
	CodepointRange(0x0e30, 0x0e30),
	CodepointRange(0x0e32, 0x0e33),
	CodepointRange(0x0e40, 0x0e45),
	CodepointRange(0x0e81, 0x0e82),
	CodepointRange(0x0e84, 0x0e84),
	CodepointRange(0x0e87, 0x0e88),
	CodepointRange(0x0e8a, 0x0e8a),
	CodepointRange(0x0e8d, 0x0e8d),
	CodepointRange(0x0e94, 0x0e97),
	CodepointRange(0x0e99, 0x0e9f),
	CodepointRange(0x0ea1, 0x0ea3),
	CodepointRange(0x0ea5, 0x0ea5),
	CodepointRange(0x0ea7, 0x0ea7),
	CodepointRange(0x0eaa, 0x0eab),
	CodepointRange(0x0ead, 0x0eae),
	CodepointRange(0x0eb0, 0x0eb0),
	CodepointRange(0x0eb2, 0x0eb3),
	CodepointRange(0x0ebd, 0x0ebd),
	CodepointRange(0x0ec0, 0x0ec4),
	CodepointRange(0x0f40, 0x0f47),
	CodepointRange(0x0f49, 0x0f69),
	CodepointRange(0x10a0, 0x10c5),
	CodepointRange(0x10d0, 0x10f6),
	CodepointRange(0x1100, 0x1100),
	CodepointRange(0x1102, 0x1103),
	CodepointRange(0x1105, 0x1107),
	CodepointRange(0x1109, 0x1109),
	CodepointRange(0x110b, 0x110c),
	CodepointRange(0x110e, 0x1112),
	CodepointRange(0x113c, 0x113c),
	CodepointRange(0x113e, 0x113e),
	CodepointRange(0x1140, 0x1140),
	CodepointRange(0x114c, 0x114c),
	CodepointRange(0x114e, 0x114e),
	CodepointRange(0x1150, 0x1150),
	CodepointRange(0x1154, 0x1155),
	CodepointRange(0x1159, 0x1159),
	CodepointRange(0x115f, 0x1161),
	CodepointRange(0x1163, 0x1163),
	CodepointRange(0x1165, 0x1165),
	CodepointRange(0x1167, 0x1167),
	CodepointRange(0x1169, 0x1169),
	CodepointRange(0x116d, 0x116e),
	CodepointRange(0x1172, 0x1173),
	CodepointRange(0x1175, 0x1175),
	CodepointRange(0x119e, 0x119e),
	CodepointRange(0x11a8, 0x11a8),
	CodepointRange(0x11ab, 0x11ab),
	CodepointRange(0x11ae, 0x11af),
	CodepointRange(0x11b7, 0x11b8),
	CodepointRange(0x11ba, 0x11ba),
	CodepointRange(0x11bc, 0x11c2),
	CodepointRange(0x11eb, 0x11eb),
	CodepointRange(0x11f0, 0x11f0),
	CodepointRange(0x11f9, 0x11f9),
	CodepointRange(0x1e00, 0x1e9b),
	CodepointRange(0x1ea0, 0x1ef9),
	CodepointRange(0x1f00, 0x1f15),
	CodepointRange(0x1f18, 0x1f1d),
	CodepointRange(0x1f20, 0x1f45),
	CodepointRange(0x1f48, 0x1f4d),
	CodepointRange(0x1f50, 0x1f57),
	CodepointRange(0x1f59, 0x1f59),
	CodepointRange(0x1f5b, 0x1f5b),
	CodepointRange(0x1f5d, 0x1f5d),
	CodepointRange(0x1f5f, 0x1f7d),
	CodepointRange(0x1f80, 0x1fb4),
	CodepointRange(0x1fb6, 0x1fbc),
	CodepointRange(0x1fbe, 0x1fbe),
	CodepointRange(0x1fc2, 0x1fc4),
	CodepointRange(0x1fc6, 0x1fcc),
	CodepointRange(0x1fd0, 0x1fd3),
	CodepointRange(0x1fd6, 0x1fdb),
	CodepointRange(0x1fe0, 0x1fec),
	CodepointRange(0x1ff2, 0x1ff4),
	CodepointRange(0x1ff6, 0x1ffc),
	CodepointRange(0x2126, 0x2126),
	CodepointRange(0x212a, 0x212b),
	CodepointRange(0x212e, 0x212e),
	CodepointRange(0x2180, 0x2182),
	CodepointRange(0x3041, 0x3094),
	CodepointRange(0x30a1, 0x30fa),
	CodepointRange(0x3105, 0x312c),
	CodepointRange(0xac00, 0xd7a3),
];

/// XML 1.0 Appendix B \[86\]
pub const XML_IDEOGRAPHIC_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x3007, 0x3007),
	CodepointRange(0x3021, 0x3029),
	CodepointRange(0x4e00, 0x9fa5),
];

/// XML 1.0 Appendix B \[87\]
pub const XML_COMBINING_CHAR_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x0300, 0x0345),
	CodepointRange(0x0360, 0x0361),
	CodepointRange(0x0483, 0x0486),
	CodepointRange(0x0591, 0x05a1),
	CodepointRange(0x05a3, 0x05b9),
	CodepointRange(0x05bb, 0x05bd),
	CodepointRange(0x05bf, 0x05bf),
	CodepointRange(0x05c1, 0x05c2),
	CodepointRange(0x05c4, 0x05c4),
	CodepointRange(0x064b, 0x0652),
	CodepointRange(0x0670, 0x0670),
	CodepointRange(0x06d6, 0x06dc),
	CodepointRange(0x06dd, 0x06df),
	CodepointRange(0x06e0, 0x06e4),
	CodepointRange(0x06e7, 0x06e8),
	CodepointRange(0x06ea, 0x06ed),
	CodepointRange(0x0901, 0x0903),
	CodepointRange(0x093c, 0x093c),
	CodepointRange(0x093e, 0x094c),
	CodepointRange(0x094d, 0x094d),
	CodepointRange(0x0951, 0x0954),
	CodepointRange(0x0962, 0x0963),
	CodepointRange(0x0981, 0x0983),
	CodepointRange(0x09bc, 0x09bc),
	CodepointRange(0x09be, 0x09be),
	CodepointRange(0x09bf, 0x09bf),
	CodepointRange(0x09c0, 0x09c4),
	CodepointRange(0x09c7, 0x09c8),
	CodepointRange(0x09cb, 0x09cd),
	CodepointRange(0x09d7, 0x09d7),
	CodepointRange(0x09e2, 0x09e3),
	CodepointRange(0x0a02, 0x0a02),
	CodepointRange(0x0a3c, 0x0a3c),
	CodepointRange(0x0a3e, 0x0a3e),
	CodepointRange(0x0a3f, 0x0a3f),
	CodepointRange(0x0a40, 0x0a42),
	CodepointRange(0x0a47, 0x0a48),
	CodepointRange(0x0a4b, 0x0a4d),
	CodepointRange(0x0a70, 0x0a71),
	CodepointRange(0x0a81, 0x0a83),
	CodepointRange(0x0abc, 0x0abc),
	CodepointRange(0x0abe, 0x0ac5),
	CodepointRange(0x0ac7, 0x0ac9),
	CodepointRange(0x0acb, 0x0acd),
	CodepointRange(0x0b01, 0x0b03),
	CodepointRange(0x0b3c, 0x0b3c),
	CodepointRange(0x0b3e, 0x0b43),
	CodepointRange(0x0b47, 0x0b48),
	CodepointRange(0x0b4b, 0x0b4d),
	CodepointRange(0x0b56, 0x0b57),
	CodepointRange(0x0b82, 0x0b83),
	CodepointRange(0x0bbe, 0x0bc2),
	CodepointRange(0x0bc6, 0x0bc8),
	CodepointRange(0x0bca, 0x0bcd),
	CodepointRange(0x0bd7, 0x0bd7),
	CodepointRange(0x0c01, 0x0c03),
	CodepointRange(0x0c3e, 0x0c44),
	CodepointRange(0x0c46, 0x0c48),
	CodepointRange(0x0c4a, 0x0c4d),
	CodepointRange(0x0c55, 0x0c56),
	CodepointRange(0x0c82, 0x0c83),
	CodepointRange(0x0cbe, 0x0cc4),
	CodepointRange(0x0cc6, 0x0cc8),
	CodepointRange(0x0cca, 0x0ccd),
	CodepointRange(0x0cd5, 0x0cd6),
	CodepointRange(0x0d02, 0x0d03),
	CodepointRange(0x0d3e, 0x0d43),
	CodepointRange(0x0d46, 0x0d48),
	CodepointRange(0x0d4a, 0x0d4d),
	CodepointRange(0x0d57, 0x0d57),
	CodepointRange(0x0e31, 0x0e31),
	CodepointRange(0x0e34, 0x0e3a),
	CodepointRange(0x0e47, 0x0e4e),
	CodepointRange(0x0eb1, 0x0eb1),
	CodepointRange(0x0eb4, 0x0eb9),
	CodepointRange(0x0ebb, 0x0ebc),
	CodepointRange(0x0ec8, 0x0ecd),
	CodepointRange(0x0f18, 0x0f19),
	CodepointRange(0x0f35, 0x0f35),
	CodepointRange(0x0f37, 0x0f37),
	CodepointRange(0x0f39, 0x0f39),
	CodepointRange(0x0f3e, 0x0f3e),
	CodepointRange(0x0f3f, 0x0f3f),
	CodepointRange(0x0f71, 0x0f84),
	CodepointRange(0x0f86, 0x0f8b),
	CodepointRange(0x0f90, 0x0f95),
	CodepointRange(0x0f97, 0x0f97),
	CodepointRange(0x0f99, 0x0fad),
	CodepointRange(0x0fb1, 0x0fb7),
	CodepointRange(0x0fb9, 0x0fb9),
	CodepointRange(0x20d0, 0x20dc),
	CodepointRange(0x20e1, 0x20e1),
	CodepointRange(0x302a, 0x302f),
	CodepointRange(0x3099, 0x3099),
	CodepointRange(0x309a, 0x309a),
];

/// XML 1.0 Appendix B \[88\]
pub const XML_DIGIT_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x0030, 0x0039),
	CodepointRange(0x0660, 0x0669),
	CodepointRange(0x06f0, 0x06f9),
	CodepointRange(0x0966, 0x096f),
	CodepointRange(0x09e6, 0x09ef),
	CodepointRange(0x0a66, 0x0a6f),
	CodepointRange(0x0ae6, 0x0aef),
	CodepointRange(0x0b66, 0x0b6f),
	CodepointRange(0x0be7, 0x0bef),
	CodepointRange(0x0c66, 0x0c6f),
	CodepointRange(0x0ce6, 0x0cef),
	CodepointRange(0x0d66, 0x0d6f),
	CodepointRange(0x0e50, 0x0e59),
	CodepointRange(0x0ed0, 0x0ed9),
	CodepointRange(0x0f20, 0x0f29),
];

/// XML 1.0 Appendix B \[89\]
pub const XML_EXTENDER_RANGES: &'static [CodepointRange] = &[
	CodepointRange(0x00b7, 0x00b7),
	CodepointRange(0x02d0, 0x02d0),
	CodepointRange(0x02d1, 0x02d1),
	CodepointRange(0x0387, 0x0387),
	CodepointRange(0x0640, 0x0640),
	CodepointRange(0x0e46, 0x0e46),
	CodepointRange(0x0ec6, 0x0ec6),
	CodepointRange(0x3005, 0x3005),
	CodepointRange(0x3031, 0x3035),
	CodepointRange(0x309d, 0x309e),
	CodepointRange(0x30fc, 0x30fe),
];

/// Selects all chars from any of the contained ranges
#[derive(Copy, Clone)]
pub struct CodepointRanges(pub &'static [CodepointRange]);

/// Char (XML 1.0 § 2.2 \[2\])
pub static CLASS_XML_CHAR: CodepointRanges = CodepointRanges(XML_CHAR_RANGES);

/// BaseChar (XML 1.0 Appendix B \[85\])
pub static CLASS_XML_BASE_CHAR: CodepointRanges = CodepointRanges(XML_BASE_CHAR_RANGES);

/// Ideographic (XML 1.0 Appendix B \[86\])
pub static CLASS_XML_IDEOGRAPHIC: CodepointRanges = CodepointRanges(XML_IDEOGRAPHIC_RANGES);

/// CombiningChar (XML 1.0 Appendix B \[87\])
pub static CLASS_XML_COMBINING_CHAR: CodepointRanges = CodepointRanges(XML_COMBINING_CHAR_RANGES);

/// Digit (XML 1.0 Appendix B \[88\])
pub static CLASS_XML_DIGIT: CodepointRanges = CodepointRanges(XML_DIGIT_RANGES);

/// Extender (XML 1.0 Appendix B \[89\])
pub static CLASS_XML_EXTENDER: CodepointRanges = CodepointRanges(XML_EXTENDER_RANGES);

impl CodepointRanges {
	/// Test a raw codepoint, which does not have to be a valid rust char.
	pub fn contains(&self, cp: u32) -> bool {
		contained_in_ranges(cp, self.0)
	}
}

impl CharSelector for CodepointRange {
	fn select(&self, c: char) -> bool {
		self.contains(c as u32)
	}
}

impl CharSelector for CodepointRanges {
	fn select(&self, c: char) -> bool {
		contained_in_ranges(c as u32, self.0)
	}
}

/// Binary search for `cp` in a sorted, non-overlapping range table.
pub fn contained_in_ranges(cp: u32, rs: &[CodepointRange]) -> bool {
	rs.binary_search_by(|r| r.locate(cp)).is_ok()
}

impl fmt::Debug for CodepointRanges {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "CodepointRanges(<{} ranges>)", self.0.len())
	}
}

impl PartialEq for CodepointRanges {
	fn eq(&self, other: &CodepointRanges) -> bool {
		std::ptr::eq(self.0, other.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_sorted_and_disjoint(name: &str, rs: &[CodepointRange]) {
		for r in rs.iter() {
			assert!(r.0 <= r.1, "{}: inverted range {:x?}", name, r);
		}
		for pair in rs.windows(2) {
			assert!(
				pair[0].1 < pair[1].0,
				"{}: {:x?} and {:x?} overlap or are unsorted",
				name,
				pair[0],
				pair[1]
			);
		}
	}

	#[test]
	fn tables_are_sorted_and_disjoint() {
		assert_sorted_and_disjoint("char", XML_CHAR_RANGES);
		assert_sorted_and_disjoint("base char", XML_BASE_CHAR_RANGES);
		assert_sorted_and_disjoint("ideographic", XML_IDEOGRAPHIC_RANGES);
		assert_sorted_and_disjoint("combining char", XML_COMBINING_CHAR_RANGES);
		assert_sorted_and_disjoint("digit", XML_DIGIT_RANGES);
		assert_sorted_and_disjoint("extender", XML_EXTENDER_RANGES);
	}

	#[test]
	fn binary_search_agrees_with_linear_scan() {
		for cp in 0x0..=0x11000u32 {
			let linear = XML_BASE_CHAR_RANGES.iter().any(|r| r.contains(cp));
			if linear != CLASS_XML_BASE_CHAR.contains(cp) {
				panic!("binary and linear search disagree about U+{:x}", cp)
			}
		}
	}

	#[test]
	fn range_ends_are_inclusive() {
		assert!(CLASS_XML_IDEOGRAPHIC.contains(0x4e00));
		assert!(CLASS_XML_IDEOGRAPHIC.contains(0x9fa5));
		assert!(!CLASS_XML_IDEOGRAPHIC.contains(0x9fa6));
		assert!(CLASS_XML_EXTENDER.select('\u{b7}'));
		assert!(!CLASS_XML_EXTENDER.select('\u{b8}'));
	}
}

/*!
# Predefined entities and character references

[`encode`] escapes the five characters which have predefined entities,
[`decode`] expands those entities and numeric character references again.

Both functions borrow their input if there is nothing to do. Callers may rely
on that: a [`Cow::Borrowed`] result is the very same slice which was passed
in.
*/
use std::borrow::Cow;

use wfxml_validation::is_char;

use crate::error::{DecodeError, DecodeErrorKind};

/// How strictly [`decode`] treats text which does not form a valid
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
	/// Do not decode at all; the input is returned unchanged.
	None,
	/// Decode what can be decoded, leave everything else untouched.
	Loose,
	/// Decode, failing on any `&` which does not start a valid reference.
	Strict,
}

impl Default for DecodeMode {
	fn default() -> DecodeMode {
		DecodeMode::Strict
	}
}

static PREDEFINED: &'static [(&'static str, char)] = &[
	("&amp;", '&'),
	("&quot;", '"'),
	("&apos;", '\''),
	("&lt;", '<'),
	("&gt;", '>'),
];

/**
Escape `&`, `"`, `'`, `<` and `>` using the predefined entities.

```rust
use std::borrow::Cow;
use wfxml::encode;

assert_eq!(encode("a < b"), "a &lt; b");
assert!(matches!(encode("nothing to see"), Cow::Borrowed(_)));
```
*/
pub fn encode(s: &str) -> Cow<'_, str> {
	let mut out: Option<String> = None;
	let mut last_index = 0;
	for (i, b) in s.bytes().enumerate() {
		let replacement = match b {
			b'&' => "&amp;",
			b'"' => "&quot;",
			b'\'' => "&apos;",
			b'<' => "&lt;",
			b'>' => "&gt;",
			_ => continue,
		};
		let out = out.get_or_insert_with(|| String::with_capacity(s.len() + 16));
		out.push_str(&s[last_index..i]);
		out.push_str(replacement);
		last_index = i + 1;
	}
	match out {
		None => Cow::Borrowed(s),
		Some(mut out) => {
			out.push_str(&s[last_index..]);
			Cow::Owned(out)
		}
	}
}

/// Try to interpret the start of `s` (which starts with `&`) as a reference.
///
/// Returns the expanded char and the number of bytes making up the
/// reference.
fn recognize(s: &str) -> Result<(char, usize), DecodeErrorKind> {
	for (entity, ch) in PREDEFINED.iter() {
		if s.starts_with(entity) {
			return Ok((*ch, entity.len()));
		}
	}
	let (radix, prefix_len) = if s.starts_with("&#x") {
		(16, 3)
	} else if s.starts_with("&#") {
		(10, 2)
	} else {
		return Err(DecodeErrorKind::BareAmpersand);
	};
	let body = &s[prefix_len..];
	let ndigits = body
		.bytes()
		.take_while(|b| (*b as char).is_digit(radix))
		.count();
	if ndigits == 0 || body.as_bytes().get(ndigits) != Some(&b';') {
		return Err(DecodeErrorKind::InvalidReference);
	}
	let cp = u32::from_str_radix(&body[..ndigits], radix)
		.map_err(|_| DecodeErrorKind::InvalidReference)?;
	if !is_char(cp) {
		return Err(DecodeErrorKind::DisallowedCodepoint(cp));
	}
	match std::char::from_u32(cp) {
		Some(ch) => Ok((ch, prefix_len + ndigits + 1)),
		None => Err(DecodeErrorKind::DisallowedCodepoint(cp)),
	}
}

/**
Expand predefined entities and character references.

```rust
use wfxml::{decode, DecodeMode};

assert_eq!(decode("a &gt; b", DecodeMode::Strict).unwrap(), "a > b");
assert_eq!(decode("&#65;&#x42;", DecodeMode::Strict).unwrap(), "AB");
assert!(decode("cat & dog", DecodeMode::Strict).is_err());
assert_eq!(decode("cat & dog", DecodeMode::Loose).unwrap(), "cat & dog");
```
*/
pub fn decode(s: &str, mode: DecodeMode) -> Result<Cow<'_, str>, DecodeError> {
	if mode == DecodeMode::None {
		return Ok(Cow::Borrowed(s));
	}
	let mut out: Option<String> = None;
	let mut last_index = 0;
	let mut search_from = 0;
	while let Some(rel) = s[search_from..].find('&') {
		let start = search_from + rel;
		match recognize(&s[start..]) {
			Ok((ch, len)) => {
				let out = out.get_or_insert_with(|| String::with_capacity(s.len()));
				out.push_str(&s[last_index..start]);
				out.push(ch);
				last_index = start + len;
				search_from = last_index;
			}
			Err(kind) => {
				if mode == DecodeMode::Strict {
					return Err(DecodeError::new(start, kind));
				}
				search_from = start + 1;
			}
		}
	}
	match out {
		None => Ok(Cow::Borrowed(s)),
		Some(mut out) => {
			out.push_str(&s[last_index..]);
			Ok(Cow::Owned(out))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encode_escapes_all_five() {
		assert_eq!(encode("&\"'<>"), "&amp;&quot;&apos;&lt;&gt;");
	}

	#[test]
	fn encode_borrows_when_nothing_to_do() {
		let s = "plain text, ümlauts and all";
		match encode(s) {
			Cow::Borrowed(b) => assert!(std::ptr::eq(b, s)),
			Cow::Owned(_) => panic!("encode allocated without need"),
		}
	}

	#[test]
	fn decode_reverses_encode() {
		for s in &["", "x", "a & b", "<tag attr=\"v\">'q'</tag>", "&amp;", "ä<ö>ü"] {
			let encoded = encode(s);
			assert_eq!(decode(&encoded, DecodeMode::Strict).unwrap(), *s);
			assert_eq!(decode(&encoded, DecodeMode::Loose).unwrap(), *s);
		}
	}

	#[test]
	fn decode_borrows_when_nothing_to_do() {
		let s = "nothing & nothing";
		match decode(s, DecodeMode::Loose).unwrap() {
			Cow::Borrowed(b) => assert!(std::ptr::eq(b, s)),
			Cow::Owned(_) => panic!("decode allocated without need"),
		}
	}

	#[test]
	fn decode_mode_none_passes_through() {
		assert_eq!(decode("&amp; & &#;", DecodeMode::None).unwrap(), "&amp; & &#;");
	}

	#[test]
	fn decode_numeric_references() {
		assert_eq!(decode("&#60;", DecodeMode::Strict).unwrap(), "<");
		assert_eq!(decode("&#x3c;&#x3C;", DecodeMode::Strict).unwrap(), "<<");
		assert_eq!(decode("&#x1F600;", DecodeMode::Strict).unwrap(), "\u{1f600}");
	}

	#[test]
	fn decode_strict_rejects_partial_references() {
		for s in &["&#;", "&#x;", "&#2G;", "&#12", "&unknown;", "&"] {
			let err = decode(s, DecodeMode::Strict).unwrap_err();
			assert_eq!(err.offset(), 0, "{:?}", s);
		}
	}

	#[test]
	fn decode_loose_keeps_partial_references() {
		for s in &["&#;", "&#x;", "&#2G;", "&#12", "&unknown;", "&"] {
			assert_eq!(decode(s, DecodeMode::Loose).unwrap(), *s);
		}
		assert_eq!(decode("&#;&lt;", DecodeMode::Loose).unwrap(), "&#;<");
	}

	#[test]
	fn decode_strict_rejects_disallowed_codepoints() {
		let err = decode("ok &#x8;", DecodeMode::Strict).unwrap_err();
		assert_eq!(err.offset(), 3);
		assert_eq!(err.kind(), DecodeErrorKind::DisallowedCodepoint(8));
		assert_eq!(
			decode("&#xD800;", DecodeMode::Strict).unwrap_err().kind(),
			DecodeErrorKind::DisallowedCodepoint(0xd800)
		);
		assert_eq!(
			decode("&#99999999999;", DecodeMode::Strict).unwrap_err().kind(),
			DecodeErrorKind::InvalidReference
		);
		assert_eq!(decode("&#x8;", DecodeMode::Loose).unwrap(), "&#x8;");
	}

	#[test]
	fn decode_strict_reports_bare_ampersand() {
		let err = decode("cat & dog", DecodeMode::Strict).unwrap_err();
		assert_eq!(err.kind(), DecodeErrorKind::BareAmpersand);
		assert_eq!(err.offset(), 4);
	}
}

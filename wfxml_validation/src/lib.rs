/*!
# Character classes and validators for XML 1.0 strings

This is a supplementary crate for [`wfxml`](https://docs.rs/wfxml). It holds
the static codepoint tables of the XML 1.0 grammar and the predicates built on
top of them, so that they can be shared without pulling in the parser.

All predicates are pure functions over a single codepoint. ASCII input takes a
fast path; everything else is looked up by binary search in the tables of
[`selectors`].
*/
use std::fmt;

pub mod selectors;

use selectors::CharSelector;

/**
Error condition from validating an XML string.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// A Name was empty.
	EmptyName,
	/// An invalid character was encountered.
	///
	/// This variant contains the character as data.
	InvalidChar(char),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyName => f.write_str("Name must not be empty"),
			Self::InvalidChar(c) => write!(f, "character U+{:04x} is not allowed", *c as u32),
		}
	}
}

impl std::error::Error for Error {}

/**
Check whether a codepoint matches the XML 1.0 `Char` production.

This takes a raw `u32` so that surrogates and values above U+10FFFF can be
asked about (the answer is always no).

```rust
use wfxml_validation::is_char;

assert!(is_char(0x9));
assert!(!is_char(0x8));
assert!(!is_char(0xd800));
assert!(is_char(0x10ffff));
assert!(!is_char(0x110000));
```
*/
pub fn is_char(cp: u32) -> bool {
	match cp {
		0x20..=0x7f => true,
		0x9 | 0xa | 0xd => true,
		0x0..=0x1f => false,
		// surrogates and the two noncharacters at the end of the BMP
		0xd800..=0xdfff | 0xfffe | 0xffff => false,
		_ => selectors::CLASS_XML_CHAR.contains(cp),
	}
}

/// Whitespace as per XML 1.0 § 2.3 \[3\].
pub fn is_space(c: char) -> bool {
	matches!(c, '\x20' | '\x09' | '\x0a' | '\x0d')
}

/// Digit as per XML 1.0 Appendix B \[88\].
pub fn is_digit(c: char) -> bool {
	if c.is_ascii() {
		return c.is_ascii_digit();
	}
	selectors::CLASS_XML_DIGIT.select(c)
}

/// Letter as per XML 1.0 Appendix B \[84\]: a BaseChar or an Ideographic.
pub fn is_letter(c: char) -> bool {
	if c.is_ascii() {
		return c.is_ascii_alphabetic();
	}
	is_base_char(c) || is_ideographic(c)
}

/// BaseChar as per XML 1.0 Appendix B \[85\].
pub fn is_base_char(c: char) -> bool {
	selectors::CLASS_XML_BASE_CHAR.select(c)
}

/// Ideographic as per XML 1.0 Appendix B \[86\].
pub fn is_ideographic(c: char) -> bool {
	selectors::CLASS_XML_IDEOGRAPHIC.select(c)
}

/// CombiningChar as per XML 1.0 Appendix B \[87\].
pub fn is_combining_char(c: char) -> bool {
	if c.is_ascii() {
		return false;
	}
	selectors::CLASS_XML_COMBINING_CHAR.select(c)
}

/// Extender as per XML 1.0 Appendix B \[89\].
pub fn is_extender(c: char) -> bool {
	if c.is_ascii() {
		return false;
	}
	selectors::CLASS_XML_EXTENDER.select(c)
}

/// Whether `c` may start a Name.
pub fn is_name_start_char(c: char) -> bool {
	c == '_' || c == ':' || is_letter(c)
}

/// Whether `c` may continue a Name.
pub fn is_name_char(c: char) -> bool {
	is_name_start_char(c)
		|| c == '-'
		|| c == '.'
		|| is_digit(c)
		|| is_combining_char(c)
		|| is_extender(c)
}

/**
Check whether a str is a valid XML 1.0 Name

# Example

```rust
use wfxml_validation::{validate_name, Error};

assert!(validate_name("foobar").is_ok());
assert!(validate_name("foo:bar").is_ok());
assert!(matches!(validate_name("foo bar"), Err(Error::InvalidChar(' '))));
assert!(matches!(validate_name("1up"), Err(Error::InvalidChar('1'))));
assert!(matches!(validate_name(""), Err(Error::EmptyName)));
```
*/
pub fn validate_name(s: &str) -> Result<(), Error> {
	let mut chars = s.chars();
	match chars.next() {
		// must have at least one char
		None => return Err(Error::EmptyName),
		Some(c) => {
			if !is_name_start_char(c) {
				return Err(Error::InvalidChar(c));
			}
		}
	}
	for ch in chars {
		if !is_name_char(ch) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

/**
Check whether a str consists of XML 1.0 `Char`s only

# Example

```rust
use wfxml_validation::{validate_cdata, Error};

assert!(validate_cdata("foo bar baz <fnord!>").is_ok());
assert!(matches!(validate_cdata("\x01"), Err(Error::InvalidChar('\x01'))));
```
*/
pub fn validate_cdata(s: &str) -> Result<(), Error> {
	for ch in s.chars() {
		if !is_char(ch as u32) {
			return Err(Error::InvalidChar(ch));
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn char_boundaries() {
		assert!(is_char(0x9));
		assert!(is_char(0xa));
		assert!(is_char(0xd));
		assert!(!is_char(0x8));
		assert!(!is_char(0xb));
		assert!(!is_char(0x0));
		assert!(is_char(0x20));
		assert!(is_char(0xd7ff));
		assert!(!is_char(0xd800));
		assert!(!is_char(0xdfff));
		assert!(is_char(0xe000));
		assert!(is_char(0xfffd));
		assert!(!is_char(0xfffe));
		assert!(!is_char(0xffff));
		assert!(is_char(0x10000));
		assert!(is_char(0x10ffff));
		assert!(!is_char(0x110000));
	}

	#[test]
	fn ascii_fast_paths_match_tables() {
		for b in 0u8..0x80 {
			let c = b as char;
			assert_eq!(
				is_digit(c),
				selectors::CLASS_XML_DIGIT.select(c),
				"digit disagreement on {:?}",
				c
			);
			assert_eq!(
				is_letter(c),
				selectors::CLASS_XML_BASE_CHAR.select(c),
				"letter disagreement on {:?}",
				c
			);
			assert!(!selectors::CLASS_XML_COMBINING_CHAR.select(c));
			assert!(!selectors::CLASS_XML_EXTENDER.select(c));
		}
	}

	#[test]
	fn non_ascii_classes() {
		assert!(is_letter('é'));
		assert!(is_letter('\u{4e2d}'));
		assert!(is_ideographic('\u{3007}'));
		assert!(!is_letter('\u{3000}'));
		assert!(is_digit('\u{0661}'));
		assert!(is_combining_char('\u{0301}'));
		assert!(is_extender('\u{00b7}'));
		assert!(is_space('\r'));
		assert!(!is_space('\u{a0}'));
	}

	#[test]
	fn test_cdata_smoketest() {
		assert!(validate_cdata("foo bar baz http://<xyz>").is_ok());
		assert!(validate_cdata("\u{ffff}").is_err());
	}

	#[test]
	fn test_name_smoketest() {
		assert!(validate_name("foobar").is_ok());
		assert!(validate_name("foo:bar").is_ok());
		assert!(validate_name("_x-1.y").is_ok());
		assert!(validate_name("a\u{0301}").is_ok());
		assert!(validate_name("").is_err());
		assert!(validate_name("-a").is_err());
		assert!(validate_name(".a").is_err());
		assert!(validate_name("foo bar baz http://<xyz>").is_err());
		assert!(validate_name("\u{ffff}").is_err());
	}
}

/*!
# Start, end and empty-element tags
*/
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use smartstring::alias::String as SmartString;

use wfxml_validation::{is_space, validate_name};

use crate::entities::{decode, encode, DecodeMode};
use crate::error::{Error, TagError};

/// Kind of a [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagType {
	/// `<name ...>`
	Start,
	/// `</name>`
	End,
	/// `<name .../>`
	Empty,
}

/**
A single tag with its attributes.

The name and all attribute keys are guaranteed to match the XML Name
production. Attribute values are stored decoded; they are encoded again when
the tag is rendered.

```rust
use wfxml::{Tag, TagType};

let (tag, len) = Tag::parse("<book year='1996' title=\"A &amp; B\"/>rest").unwrap();
assert_eq!(len, 37);
assert_eq!(tag.tag_type(), TagType::Empty);
assert_eq!(tag.attribute("title"), Some("A & B"));
assert_eq!(tag.to_string(), "<book title=\"A &amp; B\" year=\"1996\"/>");
```
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
	name: SmartString,
	tag_type: TagType,
	attributes: BTreeMap<SmartString, String>,
}

fn skip_space(s: &str) -> &str {
	s.trim_start_matches(is_space)
}

impl Tag {
	/// Create a tag without attributes.
	///
	/// Fails if `name` is not a valid Name.
	pub fn new(name: &str, tag_type: TagType) -> Result<Tag, Error> {
		validate_name(name)?;
		Ok(Tag {
			name: name.into(),
			tag_type,
			attributes: BTreeMap::new(),
		})
	}

	/**
	Parse the tag at the beginning of `s`.

	On success, the tag and the number of bytes it occupies in `s` are
	returned. Attribute values may be quoted with either `"` or `'` and are
	decoded loosely.

	On failure, the returned [`TagError`] carries the text which had been
	consumed up to the point of failure.
	*/
	pub fn parse(s: &str) -> Result<(Tag, usize), TagError> {
		let fail = |rest: &str, message: &'static str| {
			TagError::new(&s[..s.len() - rest.len()], message)
		};

		let mut rest = match s.strip_prefix('<') {
			Some(rest) => rest,
			None => return Err(fail(s, "expected <")),
		};
		let mut tag_type = TagType::Start;
		if let Some(r) = rest.strip_prefix('/') {
			tag_type = TagType::End;
			rest = r;
		}

		let name_len = rest
			.find(|c: char| c == '>' || c == '/' || is_space(c))
			.unwrap_or(rest.len());
		let name = &rest[..name_len];
		if validate_name(name).is_err() {
			return Err(fail(rest, "invalid tag name"));
		}
		rest = skip_space(&rest[name_len..]);

		let mut attributes = BTreeMap::new();
		while !rest.is_empty() && !rest.starts_with('>') && !rest.starts_with('/') {
			if tag_type == TagType::End {
				return Err(fail(rest, "end tags cannot have attributes"));
			}
			let key_len = rest
				.find(|c: char| c == '=' || is_space(c))
				.unwrap_or(rest.len());
			let key = &rest[..key_len];
			if validate_name(key).is_err() {
				return Err(fail(rest, "invalid attribute name"));
			}
			rest = skip_space(&rest[key_len..]);
			rest = match rest.strip_prefix('=') {
				Some(r) => skip_space(r),
				None => return Err(fail(rest, "expected =")),
			};
			let quote = match rest.chars().next() {
				Some(q @ '"') | Some(q @ '\'') => q,
				_ => return Err(fail(rest, "attribute value requires quotes")),
			};
			rest = &rest[1..];
			let value_len = match rest.find(quote) {
				Some(n) => n,
				None => return Err(fail(rest, "unterminated attribute value")),
			};
			let raw = &rest[..value_len];
			let value = decode(raw, DecodeMode::Loose)
				.map(Cow::into_owned)
				.unwrap_or_else(|_| raw.to_string());
			if attributes.insert(SmartString::from(key), value).is_some() {
				return Err(fail(rest, "duplicate attribute"));
			}
			rest = skip_space(&rest[value_len + 1..]);
		}

		if let Some(r) = rest.strip_prefix('/') {
			if tag_type == TagType::End {
				return Err(fail(rest, "end tag cannot be empty"));
			}
			tag_type = TagType::Empty;
			rest = r;
		}
		rest = match rest.strip_prefix('>') {
			Some(r) => r,
			None => return Err(fail(rest, "expected >")),
		};

		Ok((
			Tag {
				name: name.into(),
				tag_type,
				attributes,
			},
			s.len() - rest.len(),
		))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn tag_type(&self) -> TagType {
		self.tag_type
	}

	pub(crate) fn set_tag_type(&mut self, tag_type: TagType) {
		self.tag_type = tag_type;
	}

	pub fn is_start(&self) -> bool {
		self.tag_type == TagType::Start
	}

	pub fn is_end(&self) -> bool {
		self.tag_type == TagType::End
	}

	pub fn is_empty(&self) -> bool {
		self.tag_type == TagType::Empty
	}

	/// Look up the (decoded) value of an attribute.
	pub fn attribute(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).map(|v| v.as_str())
	}

	/// All attributes, ordered by key.
	pub fn attributes(&self) -> &BTreeMap<SmartString, String> {
		&self.attributes
	}

	/// Set an attribute, returning the previous value.
	///
	/// Fails if `key` is not a valid Name.
	pub fn set_attribute<V: Into<String>>(&mut self, key: &str, value: V) -> Result<Option<String>, Error> {
		validate_name(key)?;
		Ok(self.attributes.insert(key.into(), value.into()))
	}

	pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
		self.attributes.remove(key)
	}

	fn write_head<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<{}", self.name)?;
		for (key, value) in self.attributes.iter() {
			write!(f, " {}=\"{}\"", key, encode(value))?;
		}
		Ok(())
	}

	/// Render as `<name attrs>` regardless of the tag type.
	pub fn to_start_string(&self) -> String {
		format!("{}", Rendered(self, TagType::Start))
	}

	/// Render as `</name>` regardless of the tag type.
	pub fn to_end_string(&self) -> String {
		format!("</{}>", self.name)
	}

	/// Render as `<name attrs/>` regardless of the tag type.
	pub fn to_empty_string(&self) -> String {
		format!("{}", Rendered(self, TagType::Empty))
	}
}

struct Rendered<'x>(&'x Tag, TagType);

impl fmt::Display for Rendered<'_> {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self.1 {
			TagType::Start => {
				self.0.write_head(f)?;
				f.write_str(">")
			}
			TagType::End => write!(f, "</{}>", self.0.name),
			TagType::Empty => {
				self.0.write_head(f)?;
				f.write_str("/>")
			}
		}
	}
}

impl fmt::Display for Tag {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		fmt::Display::fmt(&Rendered(self, self.tag_type), f)
	}
}

impl FromStr for Tag {
	type Err = TagError;

	/// Parse a string which consists of exactly one tag.
	fn from_str(s: &str) -> Result<Tag, TagError> {
		let (tag, len) = Tag::parse(s)?;
		if len != s.len() {
			return Err(TagError::new(&s[..len], "trailing text after tag"));
		}
		Ok(tag)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_start_tag() {
		let (tag, len) = Tag::parse("<a x=\"1\" y='2'>tail").unwrap();
		assert_eq!(len, 15);
		assert_eq!(tag.name(), "a");
		assert!(tag.is_start());
		assert_eq!(tag.attribute("x"), Some("1"));
		assert_eq!(tag.attribute("y"), Some("2"));
	}

	#[test]
	fn parse_end_tag() {
		let tag: Tag = "</a >".parse().unwrap();
		assert!(tag.is_end());
		assert_eq!(tag.name(), "a");
		assert_eq!(tag.to_string(), "</a>");
	}

	#[test]
	fn parse_empty_tag() {
		let tag: Tag = "<br/>".parse().unwrap();
		assert!(tag.is_empty());
		assert_eq!(tag.to_string(), "<br/>");
	}

	#[test]
	fn parse_allows_space_around_eq() {
		let tag: Tag = "<a\n x = 'v' \t/>".parse().unwrap();
		assert_eq!(tag.attribute("x"), Some("v"));
	}

	#[test]
	fn parse_decodes_values_loosely() {
		let tag: Tag = "<a v='&lt;&bogus; &amp;'>".parse().unwrap();
		assert_eq!(tag.attribute("v"), Some("<&bogus; &"));
		assert_eq!(tag.to_string(), "<a v=\"&lt;&amp;bogus; &amp;\">");
	}

	#[test]
	fn parse_rejects_empty_end_tag() {
		let err = Tag::parse("</a/>").unwrap_err();
		assert_eq!(err.consumed(), "</a");
	}

	#[test]
	fn parse_rejects_unquoted_value() {
		let err = Tag::parse("<a x=1>").unwrap_err();
		assert_eq!(err.consumed(), "<a x=");
		assert_eq!(err.message(), "attribute value requires quotes");
	}

	#[test]
	fn parse_rejects_invalid_name() {
		assert!(Tag::parse("<1a>").is_err());
		assert!(Tag::parse("< a>").is_err());
		assert!(Tag::parse("<a 1x='y'>").is_err());
	}

	#[test]
	fn parse_rejects_unterminated() {
		assert_eq!(Tag::parse("<a x='1'").unwrap_err().message(), "expected >");
		assert_eq!(
			Tag::parse("<a x='1>").unwrap_err().message(),
			"unterminated attribute value"
		);
	}

	#[test]
	fn parse_rejects_duplicate_attribute() {
		assert!(Tag::parse("<a x='1' x='2'>").is_err());
	}

	#[test]
	fn from_str_rejects_trailing_text() {
		assert!("<a>b".parse::<Tag>().is_err());
	}

	#[test]
	fn new_validates_name() {
		assert!(Tag::new("ok", TagType::Start).is_ok());
		assert!(matches!(
			Tag::new("not ok", TagType::Start),
			Err(Error::InvalidName(_))
		));
	}

	#[test]
	fn set_attribute_validates_key() {
		let mut tag = Tag::new("a", TagType::Start).unwrap();
		assert_eq!(tag.set_attribute("k", "v").unwrap(), None);
		assert_eq!(tag.set_attribute("k", "w").unwrap(), Some("v".to_string()));
		assert!(tag.set_attribute("", "v").is_err());
		assert_eq!(tag.remove_attribute("k"), Some("w".to_string()));
	}

	#[test]
	fn render_forms() {
		let mut tag = Tag::new("a", TagType::Start).unwrap();
		tag.set_attribute("q", "\"").unwrap();
		assert_eq!(tag.to_start_string(), "<a q=\"&quot;\">");
		assert_eq!(tag.to_end_string(), "</a>");
		assert_eq!(tag.to_empty_string(), "<a q=\"&quot;\"/>");
	}

	#[test]
	fn equality_ignores_attribute_order() {
		let a: Tag = "<a x='1' y='2'>".parse().unwrap();
		let b: Tag = "<a y='2' x='1'>".parse().unwrap();
		assert_eq!(a, b);
	}
}

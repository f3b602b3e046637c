/*!
# Leaf items

Each leaf is a thin wrapper around a `String` whose constructor rejects
content which could not be serialized back into the respective construct.
*/
use std::borrow::Cow;
use std::fmt;

use crate::entities::{decode, encode, DecodeMode};
use crate::error::{ContentError, DecodeError};

macro_rules! leaf_accessors {
	($name:ident) => {
		impl $name {
			/// The content as stored, without delimiters.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			pub fn is_empty(&self) -> bool {
				self.0.is_empty()
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

/**
Character data.

The content is stored with the predefined entities encoded, so that it can
be written out verbatim.

```rust
use wfxml::Text;

let text = Text::new("1 < 2");
assert_eq!(text.as_str(), "1 &lt; 2");
assert_eq!(text.to_string(), "1 &lt; 2");
```
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Text(String);

leaf_accessors!(Text);

impl Text {
	/// Create a text item from unencoded content.
	pub fn new(content: &str) -> Text {
		Text(encode(content).into_owned())
	}

	/// Decode the stored content.
	pub fn decode(&self, mode: DecodeMode) -> Result<Cow<'_, str>, DecodeError> {
		decode(&self.0, mode)
	}
}

impl fmt::Display for Text {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A CDATA section; may not contain `]]>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CData(String);

leaf_accessors!(CData);

impl CData {
	pub fn new<S: Into<String>>(content: S) -> Result<CData, ContentError> {
		let content = content.into();
		if content.contains("]]>") {
			return Err(ContentError::new("CData", "contains \"]]>\""));
		}
		Ok(CData(content))
	}
}

impl fmt::Display for CData {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<![CDATA[{}]]>", self.0)
	}
}

/**
A comment.

```rust
use wfxml::Comment;

assert!(Comment::new("a--b").is_err());
assert_eq!(Comment::new("fine").unwrap().to_string(), "<!--fine-->");
```
*/
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Comment(String);

leaf_accessors!(Comment);

impl Comment {
	/// Create a comment.
	///
	/// Fails if `content` contains `--` or ends with `-`, which would run
	/// into the closing delimiter.
	pub fn new<S: Into<String>>(content: S) -> Result<Comment, ContentError> {
		let content = content.into();
		if content.contains("--") {
			return Err(ContentError::new("Comment", "contains \"--\""));
		}
		if content.ends_with('-') {
			return Err(ContentError::new("Comment", "ends with \"-\""));
		}
		Ok(Comment(content))
	}
}

impl fmt::Display for Comment {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<!--{}-->", self.0)
	}
}

/// A processing instruction, stored as everything between `<?` and `?>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessingInstruction(String);

leaf_accessors!(ProcessingInstruction);

impl ProcessingInstruction {
	pub fn new<S: Into<String>>(content: S) -> Result<ProcessingInstruction, ContentError> {
		let content = content.into();
		if content.contains("?>") {
			return Err(ContentError::new("ProcessingInstruction", "contains \"?>\""));
		}
		Ok(ProcessingInstruction(content))
	}

	/// The target, i.e. everything up to the first whitespace.
	pub fn target(&self) -> &str {
		self.0
			.split(wfxml_validation::is_space)
			.next()
			.unwrap_or("")
	}
}

impl fmt::Display for ProcessingInstruction {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<?{}?>", self.0)
	}
}

/// A `<!...>` construct other than a comment or CDATA section, such as a
/// DOCTYPE declaration; may not contain `>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct XMLInstruction(String);

leaf_accessors!(XMLInstruction);

impl XMLInstruction {
	pub fn new<S: Into<String>>(content: S) -> Result<XMLInstruction, ContentError> {
		let content = content.into();
		if content.contains('>') {
			return Err(ContentError::new("XMLInstruction", "contains \">\""));
		}
		Ok(XMLInstruction(content))
	}
}

impl fmt::Display for XMLInstruction {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "<!{}>", self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_encodes_on_construction() {
		let text = Text::new("a & 'b'");
		assert_eq!(text.as_str(), "a &amp; &apos;b&apos;");
		assert_eq!(text.decode(DecodeMode::Strict).unwrap(), "a & 'b'");
		assert!(Text::new("").is_empty());
	}

	#[test]
	fn cdata_rejects_terminator() {
		assert!(CData::new("a ]] > b").is_ok());
		let err = CData::new("a ]]> b").unwrap_err();
		assert_eq!(err.construct(), "CData");
		assert_eq!(CData::new("<x>").unwrap().to_string(), "<![CDATA[<x>]]>");
	}

	#[test]
	fn comment_rejects_double_hyphen() {
		assert!(Comment::new("a--b").is_err());
		assert!(Comment::new("-").is_err());
		assert!(Comment::new("trailing-").is_err());
		assert!(Comment::new("-leading and - inner").is_ok());
		assert_eq!(Comment::new("fine").unwrap().to_string(), "<!--fine-->");
	}

	#[test]
	fn pi_rejects_terminator() {
		assert!(ProcessingInstruction::new("x ?> y").is_err());
		let pi = ProcessingInstruction::new("style href='x'").unwrap();
		assert_eq!(pi.target(), "style");
		assert_eq!(pi.to_string(), "<?style href='x'?>");
	}

	#[test]
	fn xml_instruction_rejects_gt() {
		assert!(XMLInstruction::new("DOCTYPE x>").is_err());
		assert_eq!(
			XMLInstruction::new("DOCTYPE html").unwrap().to_string(),
			"<!DOCTYPE html>"
		);
	}

	#[test]
	fn ordering_is_by_content() {
		assert!(Text::new("a") < Text::new("b"));
		assert!(Comment::new("x").unwrap() > Comment::new("w").unwrap());
	}
}

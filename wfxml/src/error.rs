/*!
# Error types

This module holds the error types returned by the various functions of this
crate. The crate-wide [`Error`] wraps all of them so that handlers and tree
builders can propagate any of them with `?`.
*/
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::result::Result as StdResult;

use smartstring::alias::String as SmartString;

use wfxml_validation::Error as ValidationError;

/**
Violation of the XML 1.0 grammar or a well-formedness constraint, as found by
[`crate::check()`].

A `WFError` is a link in a chain: every grammar production which fails wraps
the failure of the production it called into a new link carrying its own
name. The outermost link is the one returned to the caller; [`WFError::iter`]
walks from there towards the innermost, most specific failure.

Each link remembers where in the input it failed. Line and column are only
computed once the error leaves [`crate::check()`], because intermediate
failures are routinely discarded (for instance by optional productions).
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WFError {
	message: Cow<'static, str>,
	tail_len: usize,
	position: Option<(usize, usize)>,
	cause: Option<Box<WFError>>,
}

impl WFError {
	/// Create a new link which failed with `tail` left unconsumed.
	pub(crate) fn new<M: Into<Cow<'static, str>>>(tail: &str, message: M) -> WFError {
		WFError {
			message: message.into(),
			tail_len: tail.len(),
			position: None,
			cause: None,
		}
	}

	/// Attach `inner` as the cause of this link.
	pub(crate) fn caused_by(mut self, inner: WFError) -> WFError {
		self.cause = Some(Box::new(inner));
		self
	}

	/// Compute line and column of every link in the chain.
	///
	/// `entire` must be the text the error was produced from.
	pub(crate) fn finalize(&mut self, entire: &str) {
		let mut link = Some(self);
		while let Some(current) = link {
			let consumed = entire.len().saturating_sub(current.tail_len);
			let head = entire.get(..consumed).unwrap_or(entire);
			let line_start = head.rfind('\n').map(|i| i + 1).unwrap_or(0);
			let line = head.matches('\n').count() + 1;
			let column = head[line_start..].chars().count() + 1;
			current.position = Some((line, column));
			link = current.cause.as_deref_mut();
		}
	}

	/// The production name or specific message of this link.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// 1-based line of the failure point, if the error has been finalized.
	pub fn line(&self) -> Option<usize> {
		self.position.map(|(line, _)| line)
	}

	/// 1-based column (in chars) of the failure point, if the error has been
	/// finalized.
	pub fn column(&self) -> Option<usize> {
		self.position.map(|(_, column)| column)
	}

	/// Number of bytes of input which were left when this link failed.
	pub fn tail_len(&self) -> usize {
		self.tail_len
	}

	/// The next-inner link, if any.
	pub fn cause(&self) -> Option<&WFError> {
		self.cause.as_deref()
	}

	/// The most specific link of the chain.
	pub fn innermost(&self) -> &WFError {
		let mut current = self;
		while let Some(next) = current.cause.as_deref() {
			current = next;
		}
		current
	}

	/// Iterate the chain from this link towards the innermost one.
	pub fn iter(&self) -> Chain<'_> {
		Chain { next: Some(self) }
	}
}

/// Iterator over the links of a [`WFError`] chain, outermost first.
pub struct Chain<'x> {
	next: Option<&'x WFError>,
}

impl<'x> Iterator for Chain<'x> {
	type Item = &'x WFError;

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next?;
		self.next = current.cause.as_deref();
		Some(current)
	}
}

impl fmt::Display for WFError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		for link in self.iter() {
			match link.position {
				Some((line, column)) => {
					write!(f, "Line {}, column {}: {}\n", line, column, link.message)?
				}
				None => write!(f, "{}\n", link.message)?,
			}
		}
		Ok(())
	}
}

impl error::Error for WFError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self.cause.as_deref() {
			Some(inner) => Some(inner),
			None => None,
		}
	}
}

/// A single tag could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagError {
	consumed: String,
	message: &'static str,
}

impl TagError {
	pub(crate) fn new(consumed: &str, message: &'static str) -> TagError {
		TagError {
			consumed: consumed.to_string(),
			message,
		}
	}

	/// The text which had been consumed when parsing failed.
	pub fn consumed(&self) -> &str {
		&self.consumed
	}

	pub fn message(&self) -> &'static str {
		self.message
	}
}

impl fmt::Display for TagError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "malformed tag {:?}: {}", self.consumed, self.message)
	}
}

impl error::Error for TagError {}

/// Reason why a [`DecodeError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
	/// An `&` which does not start a recognized reference.
	BareAmpersand,
	/// A numeric reference which does not parse (no digits, bad digits,
	/// missing `;`, overflow).
	InvalidReference,
	/// A numeric reference which resolves to a codepoint which is not a
	/// `Char`.
	DisallowedCodepoint(u32),
}

/// Entity or character reference decoding failed in strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
	offset: usize,
	kind: DecodeErrorKind,
}

impl DecodeError {
	pub(crate) fn new(offset: usize, kind: DecodeErrorKind) -> DecodeError {
		DecodeError { offset, kind }
	}

	/// Byte offset of the offending `&` in the decoded text.
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn kind(&self) -> DecodeErrorKind {
		self.kind
	}
}

impl fmt::Display for DecodeError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self.kind {
			DecodeErrorKind::BareAmpersand => {
				write!(f, "unescaped & at offset {}", self.offset)
			}
			DecodeErrorKind::InvalidReference => {
				write!(f, "malformed character reference at offset {}", self.offset)
			}
			DecodeErrorKind::DisallowedCodepoint(cp) => write!(
				f,
				"character reference at offset {} expands to disallowed codepoint U+{:04X}",
				self.offset, cp
			),
		}
	}
}

impl error::Error for DecodeError {}

/// Content of a leaf item contains a sequence which it cannot represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentError {
	construct: &'static str,
	reason: &'static str,
}

impl ContentError {
	pub(crate) fn new(construct: &'static str, reason: &'static str) -> ContentError {
		ContentError { construct, reason }
	}

	/// Name of the item kind which rejected its content.
	pub fn construct(&self) -> &'static str {
		self.construct
	}
}

impl fmt::Display for ContentError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "invalid {} content: {}", self.construct, self.reason)
	}
}

impl error::Error for ContentError {}

/// Two items of different kinds were compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTypeError {
	left: &'static str,
	right: &'static str,
}

impl InvalidTypeError {
	pub(crate) fn new(left: &'static str, right: &'static str) -> InvalidTypeError {
		InvalidTypeError { left, right }
	}
}

impl fmt::Display for InvalidTypeError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "cannot compare {} with {}", self.left, self.right)
	}
}

impl error::Error for InvalidTypeError {}

/// Error types which may be returned by this crate.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
	/// [`crate::check()`] rejected the document.
	NotWellFormed(WFError),
	/// A tag could not be parsed.
	Tag(TagError),
	/// Strict decoding of entities or character references failed.
	Decode(DecodeError),
	/// A leaf item was constructed with content it cannot hold.
	Content(ContentError),
	/// Items of different kinds were compared.
	InvalidType(InvalidTypeError),
	/// An element or attribute name does not match the Name production.
	InvalidName(ValidationError),
	/// An end tag did not pair up with the open start tag.
	///
	/// This cannot happen on input accepted by [`crate::check()`]; it
	/// indicates that unchecked input was parsed.
	UnmatchedEndTag {
		expected: Option<SmartString>,
		found: SmartString,
	},
	/// A comment, CDATA section, processing instruction or other `<!`
	/// construct has no terminator.
	///
	/// The string names the construct and should not be interpreted by user
	/// code.
	Unterminated(&'static str),
	/// [`crate::Element::text()`] found a child which is not text.
	NonTextContent,
}

pub type Result<T> = StdResult<T, Error>;

impl From<WFError> for Error {
	fn from(e: WFError) -> Error {
		Error::NotWellFormed(e)
	}
}

impl From<TagError> for Error {
	fn from(e: TagError) -> Error {
		Error::Tag(e)
	}
}

impl From<DecodeError> for Error {
	fn from(e: DecodeError) -> Error {
		Error::Decode(e)
	}
}

impl From<ContentError> for Error {
	fn from(e: ContentError) -> Error {
		Error::Content(e)
	}
}

impl From<InvalidTypeError> for Error {
	fn from(e: InvalidTypeError) -> Error {
		Error::InvalidType(e)
	}
}

impl From<ValidationError> for Error {
	fn from(e: ValidationError) -> Error {
		Error::InvalidName(e)
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::NotWellFormed(e) => write!(f, "not-well-formed:\n{}", e),
			Error::Tag(e) => fmt::Display::fmt(e, f),
			Error::Decode(e) => write!(f, "decode error: {}", e),
			Error::Content(e) => fmt::Display::fmt(e, f),
			Error::InvalidType(e) => fmt::Display::fmt(e, f),
			Error::InvalidName(e) => write!(f, "invalid name: {}", e),
			Error::UnmatchedEndTag {
				expected: Some(expected),
				found,
			} => write!(f, "end tag </{}> does not match <{}>", found, expected),
			Error::UnmatchedEndTag {
				expected: None,
				found,
			} => write!(f, "end tag </{}> without start tag", found),
			Error::Unterminated(what) => write!(f, "unterminated {}", what),
			Error::NonTextContent => f.write_str("element has non-text content"),
		}
	}
}

impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match self {
			Error::NotWellFormed(e) => Some(e),
			Error::Tag(e) => Some(e),
			Error::Decode(e) => Some(e),
			Error::Content(e) => Some(e),
			Error::InvalidType(e) => Some(e),
			Error::InvalidName(e) => Some(e),
			Error::UnmatchedEndTag { .. } | Error::Unterminated(_) | Error::NonTextContent => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finalize_computes_positions_for_every_link() {
		let entire = "ab\ncd\nefg";
		// fails at "fg" (line 3, column 2), wrapped by a failure at "cd..."
		let inner = WFError::new(&entire[7..], "inner");
		let mut outer = WFError::new(&entire[3..], "outer").caused_by(inner);
		outer.finalize(entire);
		assert_eq!(outer.line(), Some(2));
		assert_eq!(outer.column(), Some(1));
		let inner = outer.cause().unwrap();
		assert_eq!(inner.line(), Some(3));
		assert_eq!(inner.column(), Some(2));
	}

	#[test]
	fn columns_count_chars_not_bytes() {
		let entire = "äöü<";
		let mut e = WFError::new(&entire[6..], "x");
		e.finalize(entire);
		assert_eq!(e.column(), Some(4));
	}

	#[test]
	fn display_renders_outermost_first() {
		let entire = "<a>";
		let mut e = WFError::new(entire, "Document")
			.caused_by(WFError::new(&entire[1..], "Name"));
		e.finalize(entire);
		assert_eq!(
			e.to_string(),
			"Line 1, column 1: Document\nLine 1, column 2: Name\n"
		);
	}

	#[test]
	fn innermost_and_iter_walk_the_chain() {
		let e = WFError::new("", "a")
			.caused_by(WFError::new("", "b").caused_by(WFError::new("", "c")));
		assert_eq!(e.innermost().message(), "c");
		let names: Vec<&str> = e.iter().map(|l| l.message()).collect();
		assert_eq!(names, vec!["a", "b", "c"]);
	}
}

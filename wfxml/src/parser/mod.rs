/*!
# Event-driven element and document parsing

An [`ElementParser`] walks the content of a single element and dispatches
what it finds to callbacks which have been registered on it. When it finds
a start tag, it creates a child parser for that element and hands it to the
start tag handler, which in turn may register handlers on the child and
[`parse`](ElementParser::parse) it. All parsers of one document share the
same cursor, so whatever a child consumes is consumed for its ancestors, too.

The parser assumes (but does not verify) well-formed input. Use
[`DocumentParser::new`], which runs [`crate::check()`] first, unless the
input is known to be well-formed. Malformed input still fails loudly, but
not necessarily at the offending position.

```rust
use std::cell::RefCell;
use wfxml::DocumentParser;

let titles = RefCell::new(Vec::new());
let mut parser = DocumentParser::new(
	"<library><book><title>Dune</title></book><book><title>Emma</title></book></library>"
).unwrap();
parser.on_end_tag(Some("title"), |el| {
	titles.borrow_mut().push(el.text(wfxml::DecodeMode::Strict)?);
	Ok(())
});
parser.parse().unwrap();
assert_eq!(*titles.borrow(), vec!["Dune", "Emma"]);
```
*/
use std::cell::Cell;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use smartstring::alias::String as SmartString;

use wfxml_validation::is_space;

use crate::checker::check;
use crate::dom::{Element, Text};
use crate::entities::{decode, DecodeMode};
use crate::error::{Error, Result};
use crate::tag::{Tag, TagType};

/// Handler for start tags; receives the parser for the new element.
pub type StartTagHandler<'a> = Box<dyn FnMut(&mut ElementParser<'a>) -> Result<()> + 'a>;
/// Handler for end tags; receives the tag and its decoded interior text.
pub type EndTagHandler<'a> = Box<dyn FnMut(&Element) -> Result<()> + 'a>;
/// Handler for text and the inner text of comments, CDATA sections,
/// processing instructions and other `<!` constructs.
pub type TextHandler<'a> = Box<dyn FnMut(&str) -> Result<()> + 'a>;

/// Position in the text of a document, shared between all parsers of that
/// document.
#[derive(Clone)]
struct Cursor<'a> {
	text: &'a str,
	pos: Rc<Cell<usize>>,
}

impl<'a> Cursor<'a> {
	fn new(text: &'a str) -> Cursor<'a> {
		Cursor {
			text,
			pos: Rc::new(Cell::new(0)),
		}
	}

	fn position(&self) -> usize {
		self.pos.get()
	}

	fn rest(&self) -> &'a str {
		&self.text[self.pos.get()..]
	}

	fn advance(&self, n: usize) {
		self.pos.set(self.pos.get() + n);
	}

	fn slice(&self, from: usize, to: usize) -> &'a str {
		&self.text[from..to]
	}
}

/// Handlers keyed by element name, with an optional fallback.
struct HandlerTable<H> {
	named: HashMap<SmartString, H>,
	wildcard: Option<H>,
}

impl<H> HandlerTable<H> {
	fn new() -> HandlerTable<H> {
		HandlerTable {
			named: HashMap::new(),
			wildcard: None,
		}
	}

	fn set(&mut self, name: Option<&str>, handler: H) {
		match name {
			Some(name) => {
				self.named.insert(name.into(), handler);
			}
			None => self.wildcard = Some(handler),
		}
	}

	fn get_mut(&mut self, name: &str) -> Option<&mut H> {
		match self.named.get_mut(name) {
			Some(handler) => Some(handler),
			None => self.wildcard.as_mut(),
		}
	}
}

/// Parser for the content of a single element.
///
/// Obtained from a start tag handler of the parent, from
/// [`ElementParser::new`] or (by dereferencing) from a [`DocumentParser`].
pub struct ElementParser<'a> {
	cursor: Cursor<'a>,
	tag: Tag,
	finished: bool,
	on_start: HandlerTable<StartTagHandler<'a>>,
	on_end: HandlerTable<EndTagHandler<'a>>,
	on_text: Option<TextHandler<'a>>,
	on_text_raw: Option<TextHandler<'a>>,
	on_comment: Option<TextHandler<'a>>,
	on_cdata: Option<TextHandler<'a>>,
	on_pi: Option<TextHandler<'a>>,
	on_xml_instruction: Option<TextHandler<'a>>,
}

impl<'a> ElementParser<'a> {
	/// Create a parser for the element whose start tag is at the very
	/// beginning of `text`.
	///
	/// The input is not checked for well-formedness.
	pub fn new(text: &'a str) -> Result<ElementParser<'a>> {
		ElementParser::at(Cursor::new(text))
	}

	fn at(cursor: Cursor<'a>) -> Result<ElementParser<'a>> {
		let (tag, len) = Tag::parse(cursor.rest())?;
		if tag.is_end() {
			return Err(Error::UnmatchedEndTag {
				expected: None,
				found: tag.name().into(),
			});
		}
		cursor.advance(len);
		Ok(ElementParser::with_cursor(cursor, tag))
	}

	fn with_cursor(cursor: Cursor<'a>, tag: Tag) -> ElementParser<'a> {
		ElementParser {
			cursor,
			tag,
			finished: false,
			on_start: HandlerTable::new(),
			on_end: HandlerTable::new(),
			on_text: None,
			on_text_raw: None,
			on_comment: None,
			on_cdata: None,
			on_pi: None,
			on_xml_instruction: None,
		}
	}

	/// The start (or empty-element) tag of the element being parsed.
	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	/// Text which has not been consumed yet.
	///
	/// After [`parse`](Self::parse) returned successfully on a document
	/// parser, this is the epilog.
	pub fn remaining(&self) -> &'a str {
		self.cursor.rest()
	}

	/// Whether the element has been parsed completely.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Register a handler for start tags named `name`, or for all start tags
	/// without a handler of their own if `name` is `None`.
	///
	/// The handler is called with the parser of the new element. If it does
	/// not parse it, the content of the new element is parsed by this parser
	/// instead, with events going to this parser's handlers.
	pub fn on_start_tag<F>(&mut self, name: Option<&str>, handler: F)
	where
		F: FnMut(&mut ElementParser<'a>) -> Result<()> + 'a,
	{
		self.on_start.set(name, Box::new(handler));
	}

	/// Register a handler for end tags named `name`, or for all end tags
	/// without a handler of their own if `name` is `None`.
	///
	/// The handler receives an element built from the start tag, holding
	/// the loosely decoded text between start and end tag (including any
	/// markup) as its only item.
	pub fn on_end_tag<F>(&mut self, name: Option<&str>, handler: F)
	where
		F: FnMut(&Element) -> Result<()> + 'a,
	{
		self.on_end.set(name, Box::new(handler));
	}

	/// Register a handler for loosely decoded text.
	pub fn on_text<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_text = Some(Box::new(handler));
	}

	/// Register a handler for text as it appears in the document.
	///
	/// If set, it takes precedence over the [`on_text`](Self::on_text)
	/// handler.
	pub fn on_text_raw<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_text_raw = Some(Box::new(handler));
	}

	/// Remove the raw text handler, so that text goes to the
	/// [`on_text`](Self::on_text) handler again.
	pub fn clear_text_raw(&mut self) {
		self.on_text_raw = None;
	}

	pub fn on_comment<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_comment = Some(Box::new(handler));
	}

	pub fn on_cdata<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_cdata = Some(Box::new(handler));
	}

	/// Register a handler for processing instructions.
	///
	/// The handler receives everything between `<?` and `?>`.
	pub fn on_pi<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_pi = Some(Box::new(handler));
	}

	/// Register a handler for `<!...>` constructs other than comments and
	/// CDATA sections.
	pub fn on_xml_instruction<F>(&mut self, handler: F)
	where
		F: FnMut(&str) -> Result<()> + 'a,
	{
		self.on_xml_instruction = Some(Box::new(handler));
	}

	/**
	Parse the element up to and including its end tag.

	Calling this on a parser which has already finished does nothing.

	# Errors

	Errors returned by handlers are passed through unchanged. Malformed
	input yields [`Error::Tag`], [`Error::UnmatchedEndTag`] or
	[`Error::Unterminated`].
	*/
	pub fn parse(&mut self) -> Result<()> {
		if self.finished {
			return Ok(());
		}
		if self.tag.is_empty() {
			self.finished = true;
			let tag = self.tag.clone();
			return self.dispatch_end(tag, "");
		}

		let content_start = self.cursor.position();
		// start tags nobody parsed, with the offset where their content
		// starts
		let mut open: Vec<(Tag, usize)> = Vec::new();
		loop {
			let rest = self.cursor.rest();
			if rest.is_empty() {
				return Err(Error::Unterminated("element"));
			}

			if rest.starts_with("<!--") {
				let (inner, len) = delimited(rest, "<!--", "-->", "comment")?;
				self.cursor.advance(len);
				if let Some(handler) = self.on_comment.as_mut() {
					handler(inner)?;
				}
			} else if rest.starts_with("<![CDATA[") {
				let (inner, len) = delimited(rest, "<![CDATA[", "]]>", "CDATA section")?;
				self.cursor.advance(len);
				if let Some(handler) = self.on_cdata.as_mut() {
					handler(inner)?;
				}
			} else if rest.starts_with("<!") {
				let (inner, len) = delimited(rest, "<!", ">", "markup declaration")?;
				self.cursor.advance(len);
				if let Some(handler) = self.on_xml_instruction.as_mut() {
					handler(inner)?;
				}
			} else if rest.starts_with("<?") {
				let (inner, len) = delimited(rest, "<?", "?>", "processing instruction")?;
				self.cursor.advance(len);
				if let Some(handler) = self.on_pi.as_mut() {
					handler(inner)?;
				}
			} else if rest.starts_with('<') {
				let tag_start = self.cursor.position();
				let (tag, len) = Tag::parse(rest)?;
				self.cursor.advance(len);
				match tag.tag_type() {
					TagType::Start => {
						let mut child = ElementParser::with_cursor(self.cursor.clone(), tag);
						self.dispatch_start(&mut child)?;
						if !child.finished {
							open.push((child.tag, self.cursor.position()));
						}
					}
					TagType::Empty => {
						// the child gets a cursor of its own, so that an empty
						// element looks exactly like a start/end pair without
						// content
						let mut child = ElementParser::with_cursor(Cursor::new(""), tag);
						self.dispatch_start(&mut child)?;
						if !child.finished {
							self.dispatch_end(child.tag, "")?;
						}
					}
					TagType::End => match open.pop() {
						Some((start, start_content)) => {
							if start.name() != tag.name() {
								return Err(Error::UnmatchedEndTag {
									expected: Some(start.name().into()),
									found: tag.name().into(),
								});
							}
							let interior = self.cursor.slice(start_content, tag_start);
							self.dispatch_end(start, interior)?;
						}
						None => {
							if self.tag.name() != tag.name() {
								return Err(Error::UnmatchedEndTag {
									expected: Some(self.tag.name().into()),
									found: tag.name().into(),
								});
							}
							self.finished = true;
							let interior = self.cursor.slice(content_start, tag_start);
							let own = self.tag.clone();
							return self.dispatch_end(own, interior);
						}
					},
				}
			} else {
				let len = rest.find('<').unwrap_or(rest.len());
				self.cursor.advance(len);
				self.dispatch_text(&rest[..len])?;
			}
		}
	}

	fn dispatch_start(&mut self, child: &mut ElementParser<'a>) -> Result<()> {
		match self.on_start.get_mut(child.tag.name()) {
			Some(handler) => {
				log::trace!("dispatching start tag <{}>", child.tag.name());
				handler(child)?;
				if !child.finished {
					log::trace!(
						"handler for <{}> did not parse it, continuing in <{}>",
						child.tag.name(),
						self.tag.name()
					);
				}
				Ok(())
			}
			None => {
				log::trace!(
					"no handler for start tag <{}>, continuing in <{}>",
					child.tag.name(),
					self.tag.name()
				);
				Ok(())
			}
		}
	}

	fn dispatch_end(&mut self, tag: Tag, interior: &str) -> Result<()> {
		let handler = match self.on_end.get_mut(tag.name()) {
			Some(handler) => handler,
			None => return Ok(()),
		};
		log::trace!("dispatching end tag </{}>", tag.name());
		let text = decode(interior, DecodeMode::Loose)?;
		let mut element = Element::from_tag(tag);
		element.push(Text::new(&text));
		handler(&element)
	}

	fn dispatch_text(&mut self, raw: &str) -> Result<()> {
		if let Some(handler) = self.on_text_raw.as_mut() {
			return handler(raw);
		}
		if let Some(handler) = self.on_text.as_mut() {
			let decoded = decode(raw, DecodeMode::Loose)?;
			return handler(&decoded);
		}
		Ok(())
	}
}

/// Split `<open...close` at the start of `rest` into the inner text and
/// the total length.
fn delimited<'t>(
	rest: &'t str,
	open: &str,
	close: &str,
	construct: &'static str,
) -> Result<(&'t str, usize)> {
	let body = &rest[open.len()..];
	match body.find(close) {
		Some(n) => Ok((&body[..n], open.len() + n + close.len())),
		None => Err(Error::Unterminated(construct)),
	}
}

/// Length of a DOCTYPE declaration at the start of `rest`.
///
/// An internal subset ends at the first `]`, even inside a quoted literal.
fn doctype_len(rest: &str) -> Result<usize> {
	let unterminated = Error::Unterminated("document type declaration");
	let open = match rest.find(|c: char| c == '[' || c == '>') {
		Some(n) => n,
		None => return Err(unterminated),
	};
	if rest[open..].starts_with('>') {
		return Ok(open + 1);
	}
	let subset_end = match rest[open..].find(']') {
		Some(n) => open + n,
		None => return Err(unterminated),
	};
	match rest[subset_end..].find('>') {
		Some(n) => Ok(subset_end + n + 1),
		None => Err(unterminated),
	}
}

/// Length of everything in front of the root element.
fn prolog_len(text: &str) -> Result<usize> {
	let mut rest = text;
	loop {
		rest = rest.trim_start_matches(is_space);
		let len = if rest.starts_with("<?") {
			delimited(rest, "<?", "?>", "processing instruction")?.1
		} else if rest.starts_with("<!--") {
			delimited(rest, "<!--", "-->", "comment")?.1
		} else if rest.starts_with("<!DOCTYPE") {
			doctype_len(rest)?
		} else {
			break;
		};
		rest = &rest[len..];
	}
	Ok(text.len() - rest.len())
}

/**
Parser for an entire document.

The prolog (everything in front of the root element) is consumed on
construction and is available via [`prolog`](Self::prolog). The parser
dereferences to the [`ElementParser`] of the root element.
*/
pub struct DocumentParser<'a> {
	prolog: &'a str,
	root: ElementParser<'a>,
}

impl<'a> DocumentParser<'a> {
	/// Check `text` for well-formedness and create a parser for it.
	///
	/// # Errors
	///
	/// [`Error::NotWellFormed`] if the check fails.
	pub fn new(text: &'a str) -> Result<DocumentParser<'a>> {
		check(text)?;
		DocumentParser::new_unchecked(text)
	}

	/// Create a parser for `text` without checking it first.
	pub fn new_unchecked(text: &'a str) -> Result<DocumentParser<'a>> {
		let prolog_len = prolog_len(text)?;
		let cursor = Cursor::new(text);
		cursor.advance(prolog_len);
		let root = ElementParser::at(cursor)?;
		Ok(DocumentParser {
			prolog: &text[..prolog_len],
			root,
		})
	}

	/// The raw text in front of the root element.
	pub fn prolog(&self) -> &'a str {
		self.prolog
	}
}

impl<'a> Deref for DocumentParser<'a> {
	type Target = ElementParser<'a>;

	fn deref(&self) -> &ElementParser<'a> {
		&self.root
	}
}

impl<'a> DerefMut for DocumentParser<'a> {
	fn deref_mut(&mut self) -> &mut ElementParser<'a> {
		&mut self.root
	}
}

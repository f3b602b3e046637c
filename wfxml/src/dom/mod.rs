/*!
# Document object model

A tree of [`Item`]s below an [`Element`], optionally wrapped in a
[`Document`] which keeps the text around the root element.

Trees are built from text with [`Document::from_text`] (which checks the
input first) or [`Element::from_parser`], or programmatically:

```rust
use wfxml::{Comment, Document, Element, Tag, TagType};

let mut doc = Document::from_tag(Tag::new("catalog", TagType::Start).unwrap());
let mut book = Element::new("book", Some("Dune")).unwrap();
book.set_attribute("year", "1965").unwrap();
doc.push(book);
doc.push(Comment::new(" more to come ").unwrap());

assert_eq!(
	doc.to_string(),
	"<?xml version=\"1.0\"?><catalog><book year=\"1965\">Dune</book><!-- more to come --></catalog>",
);
assert_eq!(doc.pretty(2), vec![
	"<catalog>",
	"  <book year=\"1965\">Dune</book>",
	"  <!-- more to come -->",
	"</catalog>",
]);
```
*/
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{AddAssign, Deref, DerefMut};
use std::rc::Rc;

mod leaf;

pub use self::leaf::{CData, Comment, ProcessingInstruction, Text, XMLInstruction};

use crate::entities::DecodeMode;
use crate::error::{Error, InvalidTypeError, Result};
use crate::parser::{DocumentParser, ElementParser};
use crate::tag::{Tag, TagType};

/// Prolog of documents which were not parsed from text.
pub const DEFAULT_PROLOG: &'static str = "<?xml version=\"1.0\"?>";

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
	Element(Element),
	Text(Text),
	CData(CData),
	Comment(Comment),
	ProcessingInstruction(ProcessingInstruction),
	XMLInstruction(XMLInstruction),
}

impl Item {
	/// Name of the variant, as used in [`InvalidTypeError`].
	pub fn kind(&self) -> &'static str {
		match self {
			Item::Element(_) => "Element",
			Item::Text(_) => "Text",
			Item::CData(_) => "CData",
			Item::Comment(_) => "Comment",
			Item::ProcessingInstruction(_) => "ProcessingInstruction",
			Item::XMLInstruction(_) => "XMLInstruction",
		}
	}

	/// Compare two items of the same kind.
	///
	/// # Errors
	///
	/// Items of different kinds cannot be compared.
	pub fn compare(&self, other: &Item) -> std::result::Result<Ordering, InvalidTypeError> {
		match (self, other) {
			(Item::Element(a), Item::Element(b)) => a.compare(b),
			(Item::Text(a), Item::Text(b)) => Ok(a.cmp(b)),
			(Item::CData(a), Item::CData(b)) => Ok(a.cmp(b)),
			(Item::Comment(a), Item::Comment(b)) => Ok(a.cmp(b)),
			(Item::ProcessingInstruction(a), Item::ProcessingInstruction(b)) => Ok(a.cmp(b)),
			(Item::XMLInstruction(a), Item::XMLInstruction(b)) => Ok(a.cmp(b)),
			(a, b) => Err(InvalidTypeError::new(a.kind(), b.kind())),
		}
	}

	/// Lines of a human-readable rendering.
	///
	/// Leaves render as their trimmed string form, or not at all if that
	/// is empty.
	pub fn pretty(&self, indent: usize) -> Vec<String> {
		if let Item::Element(el) = self {
			return el.pretty(indent);
		}
		let s = self.to_string();
		let s = s.trim();
		if s.is_empty() {
			Vec::new()
		} else {
			vec![s.to_string()]
		}
	}
}

impl PartialOrd for Item {
	fn partial_cmp(&self, other: &Item) -> Option<Ordering> {
		self.compare(other).ok()
	}
}

impl fmt::Display for Item {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Item::Element(v) => fmt::Display::fmt(v, f),
			Item::Text(v) => fmt::Display::fmt(v, f),
			Item::CData(v) => fmt::Display::fmt(v, f),
			Item::Comment(v) => fmt::Display::fmt(v, f),
			Item::ProcessingInstruction(v) => fmt::Display::fmt(v, f),
			Item::XMLInstruction(v) => fmt::Display::fmt(v, f),
		}
	}
}

macro_rules! item_from {
	($($variant:ident),*) => {
		$(
			impl From<$variant> for Item {
				fn from(other: $variant) -> Item {
					Item::$variant(other)
				}
			}
		)*
	};
}

item_from!(Element, Text, CData, Comment, ProcessingInstruction, XMLInstruction);

/**
An element with its tag and content.

The tag is of type [`TagType::Empty`] exactly as long as the element has no
items; pushing the first item turns it into a start tag.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element {
	tag: Tag,
	items: Vec<Item>,
}

impl Element {
	/// Create an element, optionally holding a single text item.
	///
	/// `text` is taken unencoded.
	pub fn new(name: &str, text: Option<&str>) -> Result<Element> {
		let mut element = Element::from_tag(Tag::new(name, TagType::Empty)?);
		if let Some(text) = text {
			element.push(Text::new(text));
		}
		Ok(element)
	}

	/// Create an element without items from a tag.
	///
	/// The type of `tag` is ignored.
	pub fn from_tag(mut tag: Tag) -> Element {
		tag.set_tag_type(TagType::Empty);
		Element {
			tag,
			items: Vec::new(),
		}
	}

	/**
	Build an element by parsing it with `parser`.

	This registers handlers on `parser` which collect all text, CDATA
	sections, comments, processing instructions and child elements, and
	then parses it. Handlers registered before are overwritten, and a raw
	text handler is removed.
	*/
	pub fn from_parser<'a>(parser: &mut ElementParser<'a>) -> Result<Element> {
		let items: Rc<RefCell<Vec<Item>>> = Rc::new(RefCell::new(Vec::new()));
		parser.clear_text_raw();
		{
			let items = items.clone();
			parser.on_text(move |s| {
				items.borrow_mut().push(Text::new(s).into());
				Ok(())
			});
		}
		{
			let items = items.clone();
			parser.on_cdata(move |s| {
				items.borrow_mut().push(CData::new(s)?.into());
				Ok(())
			});
		}
		{
			let items = items.clone();
			parser.on_comment(move |s| {
				items.borrow_mut().push(Comment::new(s)?.into());
				Ok(())
			});
		}
		{
			let items = items.clone();
			parser.on_pi(move |s| {
				items.borrow_mut().push(ProcessingInstruction::new(s)?.into());
				Ok(())
			});
		}
		{
			let items = items.clone();
			parser.on_xml_instruction(move |s| {
				items.borrow_mut().push(XMLInstruction::new(s)?.into());
				Ok(())
			});
		}
		{
			let items = items.clone();
			parser.on_start_tag(None, move |child: &mut ElementParser<'a>| {
				let element = Element::from_parser(child)?;
				items.borrow_mut().push(element.into());
				Ok(())
			});
		}
		parser.parse()?;

		let mut element = Element::from_tag(parser.tag().clone());
		element.extend(items.replace(Vec::new()));
		Ok(element)
	}

	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	pub fn name(&self) -> &str {
		self.tag.name()
	}

	/// Set an attribute on the tag, returning the previous value.
	pub fn set_attribute<V: Into<String>>(&mut self, key: &str, value: V) -> Result<Option<String>> {
		self.tag.set_attribute(key, value)
	}

	pub fn items(&self) -> &[Item] {
		&self.items
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Append an item.
	///
	/// Empty text is dropped.
	pub fn push<I: Into<Item>>(&mut self, item: I) {
		let item = item.into();
		if let Item::Text(text) = &item {
			if text.is_empty() {
				return;
			}
		}
		self.tag.set_tag_type(TagType::Start);
		self.items.push(item);
	}

	pub fn texts(&self) -> impl Iterator<Item = &Text> {
		self.items.iter().filter_map(|item| match item {
			Item::Text(v) => Some(v),
			_ => None,
		})
	}

	pub fn cdatas(&self) -> impl Iterator<Item = &CData> {
		self.items.iter().filter_map(|item| match item {
			Item::CData(v) => Some(v),
			_ => None,
		})
	}

	pub fn comments(&self) -> impl Iterator<Item = &Comment> {
		self.items.iter().filter_map(|item| match item {
			Item::Comment(v) => Some(v),
			_ => None,
		})
	}

	pub fn pis(&self) -> impl Iterator<Item = &ProcessingInstruction> {
		self.items.iter().filter_map(|item| match item {
			Item::ProcessingInstruction(v) => Some(v),
			_ => None,
		})
	}

	pub fn elements(&self) -> impl Iterator<Item = &Element> {
		self.items.iter().filter_map(|item| match item {
			Item::Element(v) => Some(v),
			_ => None,
		})
	}

	/**
	Concatenate the decoded text content.

	```rust
	use wfxml::{DecodeMode, Document};

	let doc = Document::from_text("<p>fish &amp; chips</p>").unwrap();
	assert_eq!(doc.text(DecodeMode::Strict).unwrap(), "fish & chips");
	assert_eq!(doc.text(DecodeMode::None).unwrap(), "fish &amp; chips");
	```

	# Errors

	[`Error::NonTextContent`] if any item is not text, and
	[`Error::Decode`] if decoding in strict mode fails.
	*/
	pub fn text(&self, mode: DecodeMode) -> Result<String> {
		let mut out = String::new();
		for item in self.items.iter() {
			match item {
				Item::Text(text) => out.push_str(&text.decode(mode)?),
				_ => return Err(Error::NonTextContent),
			}
		}
		Ok(out)
	}

	/// Compare names and attributes, then items in order.
	///
	/// # Errors
	///
	/// The first pair of differing items must be of the same kind.
	pub fn compare(&self, other: &Element) -> std::result::Result<Ordering, InvalidTypeError> {
		// the tag type only mirrors whether there are items, which is
		// covered by comparing those
		let tags = self
			.tag
			.name()
			.cmp(other.tag.name())
			.then_with(|| self.tag.attributes().cmp(other.tag.attributes()));
		match tags {
			Ordering::Equal => (),
			ordering => return Ok(ordering),
		}
		for (a, b) in self.items.iter().zip(other.items.iter()) {
			match a.compare(b)? {
				Ordering::Equal => (),
				ordering => return Ok(ordering),
			}
		}
		Ok(self.items.len().cmp(&other.items.len()))
	}

	/**
	Lines of a human-readable rendering.

	An element without items or with exactly one text item renders as a
	single line. Otherwise, the start tag, the lines of each item indented
	by `indent` spaces and the end tag are rendered on separate lines.
	*/
	pub fn pretty(&self, indent: usize) -> Vec<String> {
		match &self.items[..] {
			[] => return vec![self.tag.to_empty_string()],
			[Item::Text(text)] => {
				return vec![format!(
					"{}{}{}",
					self.tag.to_start_string(),
					text,
					self.tag.to_end_string()
				)]
			}
			_ => (),
		}
		let pad = " ".repeat(indent);
		let mut lines = vec![self.tag.to_start_string()];
		for item in self.items.iter() {
			for line in item.pretty(indent) {
				lines.push(format!("{}{}", pad, line));
			}
		}
		lines.push(self.tag.to_end_string());
		lines
	}
}

impl PartialOrd for Element {
	fn partial_cmp(&self, other: &Element) -> Option<Ordering> {
		self.compare(other).ok()
	}
}

impl<I: Into<Item>> AddAssign<I> for Element {
	fn add_assign(&mut self, item: I) {
		self.push(item);
	}
}

impl<I: Into<Item>> Extend<I> for Element {
	fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
		for item in iter {
			self.push(item);
		}
	}
}

impl fmt::Display for Element {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		if self.items.is_empty() {
			return write!(f, "{}", self.tag);
		}
		write!(f, "{}", self.tag)?;
		for item in self.items.iter() {
			write!(f, "{}", item)?;
		}
		f.write_str(&self.tag.to_end_string())
	}
}

/**
A root element together with the text in front of (prolog) and behind
(epilog) it.

The document dereferences to its root element.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
	prolog: String,
	root: Element,
	epilog: String,
}

impl Document {
	/**
	Check and parse a document.

	The prolog and epilog are kept verbatim.

	```rust
	use wfxml::Document;

	let doc = Document::from_text("<?xml version='1.0'?>\n<a><b/></a>\n").unwrap();
	assert_eq!(doc.prolog(), "<?xml version='1.0'?>\n");
	assert_eq!(doc.elements().count(), 1);
	assert_eq!(doc.epilog(), "\n");

	assert!(Document::from_text("<a><b></a>").is_err());
	```
	*/
	pub fn from_text(text: &str) -> Result<Document> {
		let mut parser = DocumentParser::new(text)?;
		let root = Element::from_parser(&mut parser)?;
		Ok(Document {
			prolog: parser.prolog().to_string(),
			root,
			epilog: parser.remaining().to_string(),
		})
	}

	/// Create a document with an empty root element built from `tag` and
	/// the [`DEFAULT_PROLOG`].
	pub fn from_tag(tag: Tag) -> Document {
		Document {
			prolog: DEFAULT_PROLOG.to_string(),
			root: Element::from_tag(tag),
			epilog: String::new(),
		}
	}

	pub fn prolog(&self) -> &str {
		&self.prolog
	}

	pub fn epilog(&self) -> &str {
		&self.epilog
	}

	pub fn root(&self) -> &Element {
		&self.root
	}

	pub fn into_root(self) -> Element {
		self.root
	}

	/// Compare prologs, then root elements, then epilogs.
	pub fn compare(&self, other: &Document) -> std::result::Result<Ordering, InvalidTypeError> {
		match self.prolog.cmp(&other.prolog) {
			Ordering::Equal => (),
			ordering => return Ok(ordering),
		}
		match self.root.compare(&other.root)? {
			Ordering::Equal => (),
			ordering => return Ok(ordering),
		}
		Ok(self.epilog.cmp(&other.epilog))
	}
}

impl Deref for Document {
	type Target = Element;

	fn deref(&self) -> &Element {
		&self.root
	}
}

impl DerefMut for Document {
	fn deref_mut(&mut self) -> &mut Element {
		&mut self.root
	}
}

impl PartialOrd for Document {
	fn partial_cmp(&self, other: &Document) -> Option<Ordering> {
		self.compare(other).ok()
	}
}

impl fmt::Display for Document {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}{}{}", self.prolog, self.root, self.epilog)
	}
}

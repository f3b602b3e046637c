/*!
# Well-formed XML

This crate checks, parses and writes XML 1.0 documents which are held in
memory as a whole.

## Features

* A grammar-driven well-formedness checker with positional diagnostics
  ([`check()`])
* A callback-driven element parser ([`DocumentParser`], [`ElementParser`])
* A tree model with structural equality and ordering ([`Document`],
  [`Element`], [`Item`])
* A streaming writer with indentation control ([`Writer`])

## Restrictions

* UTF-8 input only; input is a `&str`
* No DTD processing; a `<!DOCTYPE ...>` declaration is skipped as a whole
* No custom entities; only the predefined entities and character references
  are decoded
* No namespace processing

## Example

```
use wfxml::{check, Document};

let text = "<?xml version='1.0'?><catalog><book id='1'>Dune</book></catalog>";
check(text).unwrap();

let doc = Document::from_text(text).unwrap();
let book = doc.elements().next().unwrap();
assert_eq!(book.tag().attribute("id"), Some("1"));
assert_eq!(book.to_string(), "<book id=\"1\">Dune</book>");
```

## Diagnostics

When [`check()`] rejects a document, the returned [`WFError`] describes the
path through the grammar which led to the failure:

```
let err = wfxml::check("<a>\n  <b></c>\n</a>").unwrap_err();
print!("{}", err);
// Line 1, column 1: Document
// Line 1, column 1: Element
// Line 1, column 4: Content
// Line 2, column 3: Element
// Line 2, column 6: end tag name "c" differs from start tag name "b"
assert_eq!(err.innermost().line(), Some(2));
```
*/
pub mod checker;
pub mod dom;
pub mod entities;
pub mod error;
pub mod parser;
pub mod tag;
pub mod writer;


#[doc(inline)]
pub use checker::check;
#[doc(inline)]
pub use dom::{
	CData, Comment, Document, Element, Item, ProcessingInstruction, Text, XMLInstruction,
	DEFAULT_PROLOG,
};
#[doc(inline)]
pub use entities::{decode, encode, DecodeMode};
#[doc(inline)]
pub use error::{
	ContentError, DecodeError, DecodeErrorKind, Error, InvalidTypeError, Result, TagError,
	WFError,
};
#[doc(inline)]
pub use parser::{DocumentParser, ElementParser};
#[doc(inline)]
pub use tag::{Tag, TagType};
#[doc(inline)]
pub use writer::{AttributeValue, SkipPolicy, Writer, WriterOptions};

/// Package version
pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

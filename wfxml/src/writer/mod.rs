/*!
# Streaming writer

[`Writer`] produces indented XML into any [`BufMut`] without building a
tree first. Elements are written by [`Writer::tag`], which takes a callback
producing the content; nesting of callbacks determines nesting of elements
and the indentation.

```rust
use bytes::BytesMut;
use wfxml::Writer;

let mut w = Writer::new(BytesMut::new());
w.tag("book", &[("year", &1996)], |w| w.text("hi")).unwrap();
assert_eq!(&w.into_inner()[..], b"<book year=\"1996\">\n  hi\n</book>");

let mut w = Writer::new(BytesMut::new());
w.tight().tag("book", &[("year", &1996)], |w| w.text("hi")).unwrap();
assert_eq!(&w.into_inner()[..], b"<book year=\"1996\">hi</book>");
```
*/
use std::borrow::Cow;

use bytes::BufMut;

use wfxml_validation::validate_name;

use crate::dom::{CData, Comment, ProcessingInstruction};
use crate::error::Result;

const TEXT_SPECIALS: &'static [u8] = &[b'<', b'>', b'&'];

const ATTR_SPECIALS: &'static [u8] = &[b'"', b'\'', b'\r', b'\n', b'\t', b'<', b'>', b'&'];

fn escape<'a, B: BufMut>(out: &'a mut B, data: &'a [u8], specials: &'static [u8]) {
	let mut last_index = 0;
	for i in 0..data.len() {
		let ch = data[i];
		if !specials.contains(&ch) {
			continue;
		}
		if i > last_index {
			out.put_slice(&data[last_index..i]);
		}
		match ch {
			b'"' => out.put_slice(b"&quot;"),
			b'\'' => out.put_slice(b"&apos;"),
			b'<' => out.put_slice(b"&lt;"),
			b'>' => out.put_slice(b"&gt;"),
			b'&' => out.put_slice(b"&amp;"),
			b'\r' => out.put_slice(b"&#xd;"),
			b'\n' => out.put_slice(b"&#xa;"),
			b'\t' => out.put_slice(b"&#x9;"),
			_ => unreachable!("special character without replacement"),
		}
		last_index = i + 1;
	}
	out.put_slice(&data[last_index..data.len()]);
}

/// A value which can be written as attribute value.
///
/// Returning `None` marks the value as null; what happens to null
/// attributes is decided by the [`SkipPolicy`].
pub trait AttributeValue {
	fn format(&self) -> Option<Cow<'_, str>>;
}

impl AttributeValue for str {
	fn format(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(self))
	}
}

impl AttributeValue for String {
	fn format(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(self.as_str()))
	}
}

impl AttributeValue for bool {
	fn format(&self) -> Option<Cow<'_, str>> {
		Some(Cow::Borrowed(if *self { "true" } else { "false" }))
	}
}

macro_rules! attribute_value_via_display {
	($($t:ty),*) => {
		$(
			impl AttributeValue for $t {
				fn format(&self) -> Option<Cow<'_, str>> {
					Some(Cow::Owned(self.to_string()))
				}
			}
		)*
	};
}

attribute_value_via_display!(
	char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: AttributeValue> AttributeValue for Option<T> {
	fn format(&self) -> Option<Cow<'_, str>> {
		self.as_ref().and_then(|v| v.format())
	}
}

impl<T: AttributeValue + ?Sized> AttributeValue for &T {
	fn format(&self) -> Option<Cow<'_, str>> {
		(**self).format()
	}
}

/// Which attributes [`Writer`] leaves out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPolicy {
	/// Write all attributes; null values are written as empty values.
	Nothing,
	/// Leave out attributes with null values.
	Nulls,
	/// Leave out attributes with null or empty values.
	NullsAndEmpty,
}

impl Default for SkipPolicy {
	fn default() -> SkipPolicy {
		SkipPolicy::Nothing
	}
}

/// Configuration of a [`Writer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
	/// Number of spaces per nesting level.
	pub indent: usize,
	pub skip: SkipPolicy,
	/// Written between lines.
	pub line_separator: &'static str,
}

impl Default for WriterOptions {
	fn default() -> WriterOptions {
		WriterOptions {
			indent: 2,
			skip: SkipPolicy::Nothing,
			line_separator: "\n",
		}
	}
}

impl WriterOptions {
	pub fn with_indent(mut self, indent: usize) -> WriterOptions {
		self.indent = indent;
		self
	}

	pub fn with_skip(mut self, skip: SkipPolicy) -> WriterOptions {
		self.skip = skip;
		self
	}

	pub fn with_line_separator(mut self, line_separator: &'static str) -> WriterOptions {
		self.line_separator = line_separator;
		self
	}
}

/**
Writes XML into a buffer.

Every tag, text, comment and other construct starts on a new line,
indented according to its nesting level. Inside an element written after a
call to [`tight`](Self::tight), no line breaks or indentation are written.
*/
pub struct Writer<O> {
	out: O,
	options: WriterOptions,
	level: usize,
	// number of tight elements we are in
	tight_depth: usize,
	pending_tight: bool,
	started: bool,
	// lines begun so far, including those suppressed by tight mode
	emitted: usize,
}

impl<O: BufMut> Writer<O> {
	/// Create a writer with default options.
	pub fn new(out: O) -> Writer<O> {
		Writer::with_options(out, WriterOptions::default())
	}

	pub fn with_options(out: O, options: WriterOptions) -> Writer<O> {
		Writer {
			out,
			options,
			level: 0,
			tight_depth: 0,
			pending_tight: false,
			started: false,
			emitted: 0,
		}
	}

	pub fn options(&self) -> &WriterOptions {
		&self.options
	}

	pub fn get_ref(&self) -> &O {
		&self.out
	}

	pub fn get_mut(&mut self) -> &mut O {
		&mut self.out
	}

	pub fn into_inner(self) -> O {
		self.out
	}

	/// Write the next element without line breaks or indentation inside.
	///
	/// This only affects the next call to [`tag`](Self::tag) or
	/// [`empty_tag`](Self::empty_tag).
	pub fn tight(&mut self) -> &mut Self {
		self.pending_tight = true;
		self
	}

	fn begin_line(&mut self) {
		self.emitted += 1;
		if self.tight_depth > 0 {
			return;
		}
		if self.started {
			self.out.put_slice(self.options.line_separator.as_bytes());
		}
		self.started = true;
		for _ in 0..self.level * self.options.indent {
			self.out.put_u8(b' ');
		}
	}

	fn write_head(&mut self, name: &str, attributes: &[(&str, &dyn AttributeValue)]) -> Result<()> {
		validate_name(name)?;
		for (key, _) in attributes.iter() {
			validate_name(key)?;
		}

		self.begin_line();
		self.out.put_u8(b'<');
		self.out.put_slice(name.as_bytes());
		for (key, value) in attributes.iter() {
			let value = match value.format() {
				None => match self.options.skip {
					SkipPolicy::Nothing => Cow::Borrowed(""),
					SkipPolicy::Nulls | SkipPolicy::NullsAndEmpty => continue,
				},
				Some(v) if v.is_empty() && self.options.skip == SkipPolicy::NullsAndEmpty => {
					continue
				}
				Some(v) => v,
			};
			self.out.put_u8(b' ');
			self.out.put_slice(key.as_bytes());
			self.out.put_slice(b"=\"");
			escape(&mut self.out, value.as_bytes(), ATTR_SPECIALS);
			self.out.put_u8(b'"');
		}
		Ok(())
	}

	/**
	Write an element whose content is produced by `content`.

	The end tag goes on a line of its own unless `content` did not write
	anything.

	# Errors

	[`crate::Error::InvalidName`] if `name` or an attribute name is not a
	valid Name; errors from `content` are passed through.
	*/
	pub fn tag<F>(
		&mut self,
		name: &str,
		attributes: &[(&str, &dyn AttributeValue)],
		content: F,
	) -> Result<()>
	where
		F: FnOnce(&mut Self) -> Result<()>,
	{
		let tight = std::mem::replace(&mut self.pending_tight, false);
		self.write_head(name, attributes)?;
		self.out.put_u8(b'>');

		if tight {
			self.tight_depth += 1;
		}
		self.level += 1;
		let before = self.emitted;
		let result = content(self);
		self.level -= 1;
		if result.is_ok() {
			if self.emitted != before {
				self.begin_line();
			}
			self.out.put_slice(b"</");
			self.out.put_slice(name.as_bytes());
			self.out.put_u8(b'>');
		}
		if tight {
			self.tight_depth -= 1;
		}
		result
	}

	/// Write a self-closing element.
	pub fn empty_tag(&mut self, name: &str, attributes: &[(&str, &dyn AttributeValue)]) -> Result<()> {
		self.pending_tight = false;
		self.write_head(name, attributes)?;
		self.out.put_slice(b"/>");
		Ok(())
	}

	/// Write escaped text.
	pub fn text(&mut self, text: &str) -> Result<()> {
		self.begin_line();
		escape(&mut self.out, text.as_bytes(), TEXT_SPECIALS);
		Ok(())
	}

	/// Write a comment.
	///
	/// # Errors
	///
	/// [`crate::Error::Content`] if `content` cannot be held by a comment.
	pub fn comment(&mut self, content: &str) -> Result<()> {
		let comment = Comment::new(content)?;
		self.begin_line();
		self.out.put_slice(comment.to_string().as_bytes());
		Ok(())
	}

	/// Write a CDATA section; `content` is not escaped.
	pub fn cdata(&mut self, content: &str) -> Result<()> {
		let cdata = CData::new(content)?;
		self.begin_line();
		self.out.put_slice(cdata.to_string().as_bytes());
		Ok(())
	}

	/// Write a processing instruction.
	pub fn processing_instruction(&mut self, target: &str, data: Option<&str>) -> Result<()> {
		validate_name(target)?;
		let content = match data {
			Some(data) => format!("{} {}", target, data),
			None => target.to_string(),
		};
		let pi = ProcessingInstruction::new(content)?;
		self.begin_line();
		self.out.put_slice(pi.to_string().as_bytes());
		Ok(())
	}

	/// Write an XML declaration.
	pub fn xml_declaration(
		&mut self,
		version: &str,
		encoding: Option<&str>,
		standalone: Option<bool>,
	) -> Result<()> {
		self.begin_line();
		self.out.put_slice(b"<?xml version=\"");
		escape(&mut self.out, version.as_bytes(), ATTR_SPECIALS);
		self.out.put_u8(b'"');
		if let Some(encoding) = encoding {
			self.out.put_slice(b" encoding=\"");
			escape(&mut self.out, encoding.as_bytes(), ATTR_SPECIALS);
			self.out.put_u8(b'"');
		}
		match standalone {
			Some(true) => self.out.put_slice(b" standalone=\"yes\""),
			Some(false) => self.out.put_slice(b" standalone=\"no\""),
			None => (),
		}
		self.out.put_slice(b"?>");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use bytes::BytesMut;

	use crate::error::Error;

	fn render<F>(options: WriterOptions, f: F) -> String
	where
		F: FnOnce(&mut Writer<BytesMut>) -> Result<()>,
	{
		let mut w = Writer::with_options(BytesMut::new(), options);
		f(&mut w).unwrap();
		String::from_utf8(w.into_inner().to_vec()).unwrap()
	}

	fn render_default<F>(f: F) -> String
	where
		F: FnOnce(&mut Writer<BytesMut>) -> Result<()>,
	{
		render(WriterOptions::default(), f)
	}

	#[test]
	fn book_example() {
		assert_eq!(
			render_default(|w| w.tag("book", &[("year", &1996)], |w| w.text("hi"))),
			"<book year=\"1996\">\n  hi\n</book>"
		);
		assert_eq!(
			render_default(|w| w.tight().tag("book", &[("year", &1996)], |w| w.text("hi"))),
			"<book year=\"1996\">hi</book>"
		);
	}

	#[test]
	fn tight_only_affects_next_tag() {
		let out = render_default(|w| {
			w.tight().tag("a", &[], |w| w.text("x"))?;
			w.tag("b", &[], |w| w.text("y"))
		});
		assert_eq!(out, "<a>x</a>\n<b>\n  y\n</b>");
	}

	#[test]
	fn tight_applies_to_whole_subtree() {
		let out = render_default(|w| {
			w.tag("a", &[], |w| {
				w.tight().tag("b", &[], |w| {
					w.text("x")?;
					w.tag("c", &[], |w| w.text("y"))?;
					w.empty_tag("d", &[])
				})?;
				w.empty_tag("e", &[])
			})
		});
		assert_eq!(out, "<a>\n  <b>x<c>y</c><d/></b>\n  <e/>\n</a>");
	}

	#[test]
	fn nesting_indents() {
		let out = render_default(|w| {
			w.tag("a", &[], |w| {
				w.tag("b", &[], |w| w.empty_tag("c", &[("k", &"v")]))
			})
		});
		assert_eq!(out, "<a>\n  <b>\n    <c k=\"v\"/>\n  </b>\n</a>");
	}

	#[test]
	fn empty_content_closes_on_same_line() {
		assert_eq!(render_default(|w| w.tag("a", &[], |_| Ok(()))), "<a></a>");
		assert_eq!(render_default(|w| w.empty_tag("a", &[])), "<a/>");
	}

	#[test]
	fn skip_policies() {
		let none: Option<i32> = None;
		let write = |w: &mut Writer<BytesMut>| {
			w.empty_tag("x", &[("a", &none), ("b", &""), ("c", &Some(1))])
		};
		assert_eq!(render_default(write), "<x a=\"\" b=\"\" c=\"1\"/>");
		assert_eq!(
			render(WriterOptions::default().with_skip(SkipPolicy::Nulls), write),
			"<x b=\"\" c=\"1\"/>"
		);
		assert_eq!(
			render(
				WriterOptions::default().with_skip(SkipPolicy::NullsAndEmpty),
				write
			),
			"<x c=\"1\"/>"
		);
	}

	#[test]
	fn attribute_value_formats() {
		let out = render_default(|w| {
			w.empty_tag(
				"x",
				&[
					("b", &true),
					("c", &'q'),
					("f", &1.5f64),
					("n", &-3i64),
					("s", &String::from("str")),
				],
			)
		});
		assert_eq!(out, "<x b=\"true\" c=\"q\" f=\"1.5\" n=\"-3\" s=\"str\"/>");
	}

	#[test]
	fn escaping() {
		let out = render_default(|w| {
			w.tag("x", &[("v", &"a\"b<c\n'")], |w| w.text("1 < 2 & 3 > 'q'"))
		});
		assert_eq!(
			out,
			"<x v=\"a&quot;b&lt;c&#xa;&apos;\">\n  1 &lt; 2 &amp; 3 &gt; 'q'\n</x>"
		);
	}

	#[test]
	fn rejects_invalid_names() {
		let mut w = Writer::new(BytesMut::new());
		assert!(matches!(
			w.empty_tag("no good", &[]),
			Err(Error::InvalidName(_))
		));
		assert!(matches!(
			w.tag("x", &[("1", &"v")], |_| Ok(())),
			Err(Error::InvalidName(_))
		));
		assert!(matches!(
			w.processing_instruction("", None),
			Err(Error::InvalidName(_))
		));
		assert!(w.get_ref().is_empty());
	}

	#[test]
	fn other_constructs() {
		let out = render_default(|w| {
			w.xml_declaration("1.0", Some("UTF-8"), Some(true))?;
			w.tag("r", &[], |w| {
				w.comment(" c ")?;
				w.cdata("<x>")?;
				w.processing_instruction("pi", Some("data"))?;
				w.processing_instruction("bare", None)
			})
		});
		assert_eq!(
			out,
			"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
			<r>\n  <!-- c -->\n  <![CDATA[<x>]]>\n  <?pi data?>\n  <?bare?>\n</r>"
		);
	}

	#[test]
	fn rejects_unrepresentable_content() {
		let mut w = Writer::new(BytesMut::new());
		assert!(matches!(w.comment("a--b"), Err(Error::Content(_))));
		assert!(matches!(w.cdata("]]>"), Err(Error::Content(_))));
		assert!(matches!(
			w.processing_instruction("x", Some("?>")),
			Err(Error::Content(_))
		));
	}

	#[test]
	fn custom_options() {
		let options = WriterOptions::default()
			.with_indent(4)
			.with_line_separator("\r\n");
		let out = render(options, |w| w.tag("a", &[], |w| w.text("x")));
		assert_eq!(out, "<a>\r\n    x\r\n</a>");
	}

	#[test]
	fn content_errors_propagate() {
		let mut w = Writer::new(BytesMut::new());
		let result = w.tag("a", &[], |_| Err(Error::NonTextContent));
		assert_eq!(result, Err(Error::NonTextContent));
		// state is restored
		w.tag("b", &[], |w| w.text("x")).unwrap();
		assert!(String::from_utf8(w.into_inner().to_vec())
			.unwrap()
			.ends_with("\n<b>\n  x\n</b>"));
	}

	#[test]
	fn output_is_well_formed() {
		let out = render_default(|w| {
			w.xml_declaration("1.0", None, None)?;
			w.tag("doc", &[("title", &"A & B")], |w| {
				w.text("<not a tag>")?;
				w.tight().tag("p", &[], |w| w.text("inline"))?;
				w.comment("done")
			})
		});
		crate::check(&out).unwrap();
	}
}

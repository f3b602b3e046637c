/*!
# Well-formedness checker

A recursive-descent implementation of the XML 1.0 grammar. Every production
is one function taking a cursor (`&mut &str`) into the input. On success the
cursor is advanced past the production; on failure the cursor is left where
it was when the production started and a [`WFError`] link naming the
production is returned, wrapping whatever failure caused it.

The DOCTYPE declaration is only recognized as an opaque span, its content is
not checked.
*/
use std::borrow::Cow;

use wfxml_validation::{is_char, is_name_char, is_name_start_char, is_space};

use crate::error::WFError;

type CheckResult<T> = Result<T, WFError>;

/**
Check a complete document for well-formedness.

```rust
assert!(wfxml::check("<?xml version='1.0'?><doc>text</doc>").is_ok());

let err = wfxml::check("<a><b></a>").unwrap_err();
assert_eq!(
	err.innermost().message(),
	"end tag name \"a\" differs from start tag name \"b\"",
);
```

On failure, every link of the returned error carries the line and column at
which the respective production failed.
*/
pub fn check(text: &str) -> Result<(), WFError> {
	let mut s = text;
	let result = chars(&mut s)
		.and_then(|_| document(&mut s))
		.and_then(|_| {
			if s.is_empty() {
				Ok(())
			} else {
				Err(WFError::new(s, "Junk found after document"))
			}
		});
	match result {
		Ok(()) => Ok(()),
		Err(mut e) => {
			e.finalize(text);
			let inner = e.innermost();
			log::debug!(
				"document rejected at line {}, column {}: {}",
				inner.line().unwrap_or(0),
				inner.column().unwrap_or(0),
				inner.message(),
			);
			Err(e)
		}
	}
}

/// Bookkeeping for productions which fail with more than a plain rule link.
struct Rule<'s> {
	name: &'static str,
	old: &'s str,
}

impl<'s> Rule<'s> {
	fn enter(name: &'static str, s: &&'s str) -> Rule<'s> {
		Rule { name, old: *s }
	}

	/// Fail the production without further detail.
	fn fail(&self, s: &mut &'s str) -> WFError {
		*s = self.old;
		WFError::new(self.old, self.name)
	}

	/// Fail the production because of `inner`.
	fn fail_with(&self, s: &mut &'s str, inner: WFError) -> WFError {
		*s = self.old;
		WFError::new(self.old, self.name).caused_by(inner)
	}

	/// Fail the production with a specific message about the current
	/// position.
	fn fail_msg<M: Into<Cow<'static, str>>>(&self, s: &mut &'s str, msg: M) -> WFError {
		let inner = WFError::new(*s, msg);
		self.fail_with(s, inner)
	}
}

/// Run `f` as the production `name`.
fn rule<'s, T, F>(s: &mut &'s str, name: &'static str, f: F) -> CheckResult<T>
where
	F: FnOnce(&mut &'s str) -> CheckResult<T>,
{
	let r = Rule::enter(name, s);
	match f(s) {
		Ok(v) => Ok(v),
		Err(inner) => Err(r.fail_with(s, inner)),
	}
}

// Combinators. None of these produce diagnostics of their own; all of them
// restore the cursor when the wrapped production fails.

fn optional<'s, F>(s: &mut &'s str, f: F)
where
	F: FnOnce(&mut &'s str) -> CheckResult<()>,
{
	let old = *s;
	if f(s).is_err() {
		*s = old;
	}
}

fn zero_or_more<'s, F>(s: &mut &'s str, mut f: F)
where
	F: FnMut(&mut &'s str) -> CheckResult<()>,
{
	while !s.is_empty() {
		let old = *s;
		if f(s).is_err() {
			*s = old;
			return;
		}
		if s.len() == old.len() {
			return;
		}
	}
}

fn one_or_more<'s, F>(s: &mut &'s str, mut f: F) -> CheckResult<()>
where
	F: FnMut(&mut &'s str) -> CheckResult<()>,
{
	f(s)?;
	zero_or_more(s, f);
	Ok(())
}

fn quoted<'s, F>(s: &mut &'s str, f: F) -> CheckResult<()>
where
	F: FnOnce(&mut &'s str) -> CheckResult<()>,
{
	let quote = if s.starts_with('\'') { "'" } else { "\"" };
	literal(quote, s)?;
	f(s)?;
	literal(quote, s)
}

fn sequence<'s, F, G>(s: &mut &'s str, f: F, g: G) -> CheckResult<()>
where
	F: FnOnce(&mut &'s str) -> CheckResult<()>,
	G: FnOnce(&mut &'s str) -> CheckResult<()>,
{
	f(s)?;
	g(s)
}

// Helpers

fn literal(lit: &'static str, s: &mut &str) -> CheckResult<()> {
	match s.strip_prefix(lit) {
		Some(rest) => {
			*s = rest;
			Ok(())
		}
		None => Err(WFError::new(*s, "Literal")
			.caused_by(WFError::new(*s, format!("Expected literal \"{}\"", lit)))),
	}
}

/// Skip up to and including `terminator`.
fn end(terminator: &'static str, s: &mut &str) -> CheckResult<()> {
	match s.find(terminator) {
		Some(n) => {
			*s = &s[n..];
			literal(terminator, s)
		}
		None => Err(WFError::new(
			*s,
			format!("Unable to find terminating \"{}\"", terminator),
		)),
	}
}

/// Advance past the longest prefix whose chars all satisfy `pred`.
fn munch<F: Fn(char) -> bool>(s: &mut &str, pred: F) -> usize {
	let n = s.find(|c: char| !pred(c)).unwrap_or(s.len());
	*s = &s[n..];
	n
}

// Productions

/// Char* \[2\], over the whole input. Does not consume.
fn chars(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("Chars", s);
	if let Some((i, c)) = s.char_indices().find(|(_, c)| !is_char(*c as u32)) {
		*s = &s[i..];
		return Err(r.fail_msg(s, format!("invalid character: U+{:04X}", c as u32)));
	}
	Ok(())
}

/// S \[3\]
fn space(s: &mut &str) -> CheckResult<()> {
	if munch(s, is_space) == 0 {
		return Err(WFError::new(*s, "Whitespace"));
	}
	Ok(())
}

/// Name \[5\]
fn name<'s>(s: &mut &'s str) -> CheckResult<&'s str> {
	let mut iter = s.char_indices();
	match iter.next() {
		Some((_, c)) if is_name_start_char(c) => (),
		_ => return Err(WFError::new(*s, "Name")),
	}
	let n = iter
		.find(|(_, c)| !is_name_char(*c))
		.map(|(i, _)| i)
		.unwrap_or(s.len());
	let (name, rest) = s.split_at(n);
	*s = rest;
	Ok(name)
}

/// AttValue \[10\]
fn att_value(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("AttValue", s);
	let quote = match s.chars().next() {
		None => return Err(r.fail(s)),
		Some(q @ '"') | Some(q @ '\'') => q,
		Some(_) => return Err(r.fail_msg(s, "attribute value requires quotes")),
	};
	*s = &s[1..];
	loop {
		munch(s, |c| c != '<' && c != '&' && c != quote);
		match s.chars().next() {
			None => return Err(r.fail_msg(s, "unterminated attribute value")),
			Some('<') => return Err(r.fail_msg(s, "< found in attribute value")),
			Some(c) if c == quote => break,
			Some(_) => {
				if let Err(e) = reference(s) {
					return Err(r.fail_with(s, e));
				}
			}
		}
	}
	*s = &s[1..];
	Ok(())
}

/// CharData \[14\]
fn char_data(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("CharData", s);
	loop {
		munch(s, |c| c != '&' && c != '<' && c != ']');
		if !s.starts_with(']') {
			return Ok(());
		}
		if s.starts_with("]]>") {
			return Err(r.fail_msg(s, "]]> found within char data"));
		}
		*s = &s[1..];
	}
}

/// Comment \[15\]
fn comment(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("Comment", s);
	if let Err(e) = literal("<!--", s) {
		return Err(r.fail_with(s, e));
	}
	let n = match s.find("--") {
		Some(n) => n,
		None => return Err(r.fail_msg(s, "unterminated comment")),
	};
	*s = &s[n..];
	if let Err(e) = literal("-->", s) {
		return Err(r.fail_with(s, e));
	}
	Ok(())
}

/// PI \[16\]
fn pi(s: &mut &str) -> CheckResult<()> {
	rule(s, "PI", |s| {
		literal("<?", s)?;
		pi_target(s)?;
		if s.starts_with("?>") {
			return literal("?>", s);
		}
		space(s)?;
		end("?>", s)
	})
}

/// PITarget \[17\]
///
/// The XML declaration is not a processing instruction, so `xml` (in any
/// case) is rejected here wherever it appears.
fn pi_target(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("PITarget", s);
	let target = match name(s) {
		Ok(target) => target,
		Err(e) => return Err(r.fail_with(s, e)),
	};
	if target.eq_ignore_ascii_case("xml") {
		*s = r.old;
		return Err(r.fail_msg(
			s,
			format!("reserved processing instruction target \"{}\"", target),
		));
	}
	Ok(())
}

/// CDSect \[18\]
fn cd_sect(s: &mut &str) -> CheckResult<()> {
	rule(s, "CDSect", |s| {
		literal("<![CDATA[", s)?;
		end("]]>", s)
	})
}

/// prolog \[22\]
fn prolog(s: &mut &str) -> CheckResult<()> {
	rule(s, "Prolog", |s| {
		// `<?xml` followed by whitespace can only be the declaration; a
		// broken one must not be accepted as processing instruction
		let is_decl = s
			.strip_prefix("<?xml")
			.and_then(|rest| rest.chars().next())
			.map(is_space)
			.unwrap_or(false);
		if is_decl {
			xml_decl(s)?;
		}
		misc_star(s)?;
		if s.starts_with("<!DOCTYPE") {
			sequence(s, doctype_decl, misc_star)?;
		}
		Ok(())
	})
}

/// XMLDecl \[23\]
fn xml_decl(s: &mut &str) -> CheckResult<()> {
	rule(s, "XMLDecl", |s| {
		literal("<?xml", s)?;
		version_info(s)?;
		optional(s, encoding_decl);
		optional(s, sd_decl);
		optional(s, space);
		literal("?>", s)
	})
}

/// VersionInfo \[24\]
fn version_info(s: &mut &str) -> CheckResult<()> {
	rule(s, "VersionInfo", |s| {
		space(s)?;
		literal("version", s)?;
		eq(s)?;
		quoted(s, version_num)
	})
}

/// Eq \[25\]
fn eq(s: &mut &str) -> CheckResult<()> {
	rule(s, "Eq", |s| {
		optional(s, space);
		literal("=", s)?;
		optional(s, space);
		Ok(())
	})
}

/// VersionNum \[26\]
fn version_num(s: &mut &str) -> CheckResult<()> {
	rule(s, "VersionNum", |s| one_or_more(s, version_char))
}

fn version_char(s: &mut &str) -> CheckResult<()> {
	match s.chars().next() {
		Some(c) if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-') => {
			*s = &s[1..];
			Ok(())
		}
		_ => Err(WFError::new(*s, "version character")),
	}
}

/// Misc \[27\]
fn misc(s: &mut &str) -> CheckResult<()> {
	rule(s, "Misc", |s| {
		if s.starts_with("<!--") {
			comment(s)
		} else if s.starts_with("<?") {
			pi(s)
		} else {
			space(s)
		}
	})
}

/// Misc*
///
/// A comment or processing instruction which has been started must be
/// complete; its failure is not taken as the end of the sequence.
fn misc_star(s: &mut &str) -> CheckResult<()> {
	while s.starts_with("<!--") || s.starts_with("<?") || s.starts_with(is_space) {
		misc(s)?;
	}
	Ok(())
}

/// doctypedecl \[28\], as opaque span.
///
/// An internal subset is skipped up to the first `]`, without regard to
/// quoting, so a `]` inside a literal of the subset ends it early.
fn doctype_decl(s: &mut &str) -> CheckResult<()> {
	rule(s, "DocTypeDecl", |s| {
		literal("<!DOCTYPE", s)?;
		match s.find(|c: char| c == '[' || c == '>') {
			Some(n) if s[n..].starts_with('[') => {
				*s = &s[n..];
				end("]", s)?;
				optional(s, space);
				literal(">", s)
			}
			_ => end(">", s),
		}
	})
}

/// SDDecl \[32\]
fn sd_decl(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("SDDecl", s);
	let head = (|| {
		space(s)?;
		literal("standalone", s)?;
		eq(s)
	})();
	if let Err(e) = head {
		return Err(r.fail_with(s, e));
	}
	let n = if s.starts_with("'yes'") || s.starts_with("\"yes\"") {
		5
	} else if s.starts_with("'no'") || s.starts_with("\"no\"") {
		4
	} else {
		return Err(r.fail_msg(
			s,
			"standalone attribute value must be 'yes', \"yes\", 'no' or \"no\"",
		));
	};
	*s = &s[n..];
	Ok(())
}

/// element \[39\]
fn element(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("Element", s);
	let (kind, start_name) = match tag(s) {
		Ok(v) => v,
		Err(e) => return Err(r.fail_with(s, e)),
	};
	if kind == TagKind::Empty {
		return Ok(());
	}
	if let Err(e) = content(s) {
		return Err(r.fail_with(s, e));
	}
	let before_etag = *s;
	let end_name = match etag(s) {
		Ok(name) => name,
		Err(e) => return Err(r.fail_with(s, e)),
	};
	if end_name != start_name {
		*s = before_etag;
		return Err(r.fail_msg(
			s,
			format!(
				"end tag name \"{}\" differs from start tag name \"{}\"",
				end_name, start_name
			),
		));
	}
	Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
	Start,
	Empty,
}

/// STag \[40\] and EmptyElemTag \[44\]
///
/// Also enforces the XML 1.0 "Unique Att Spec" well-formedness constraint.
fn tag<'s>(s: &mut &'s str) -> CheckResult<(TagKind, &'s str)> {
	rule(s, "Tag", |s| {
		literal("<", s)?;
		let tag_name = name(s)?;
		let mut seen: Vec<(&'s str, &'s str)> = Vec::new();
		loop {
			let before = *s;
			if space(s).is_err() {
				break;
			}
			// whitespace followed by a name commits to an attribute
			match s.chars().next() {
				Some(c) if is_name_start_char(c) => (),
				_ => {
					*s = before;
					break;
				}
			}
			let at = *s;
			let attr_name = attribute(s)?;
			seen.push((attr_name, at));
		}
		for (i, (attr_name, at)) in seen.iter().enumerate() {
			if seen[..i].iter().any(|(other, _)| other == attr_name) {
				return Err(WFError::new(at, format!("duplicate attribute \"{}\"", attr_name)));
			}
		}
		optional(s, space);
		let kind = match s.strip_prefix('/') {
			Some(rest) => {
				*s = rest;
				TagKind::Empty
			}
			None => TagKind::Start,
		};
		literal(">", s)?;
		Ok((kind, tag_name))
	})
}

/// Attribute \[41\]
fn attribute<'s>(s: &mut &'s str) -> CheckResult<&'s str> {
	rule(s, "Attribute", |s| {
		let attr_name = name(s)?;
		eq(s)?;
		att_value(s)?;
		Ok(attr_name)
	})
}

/// ETag \[42\]
fn etag<'s>(s: &mut &'s str) -> CheckResult<&'s str> {
	rule(s, "ETag", |s| {
		literal("</", s)?;
		let tag_name = name(s)?;
		optional(s, space);
		literal(">", s)?;
		Ok(tag_name)
	})
}

/// content \[43\]
fn content(s: &mut &str) -> CheckResult<()> {
	rule(s, "Content", |s| {
		while !s.is_empty() {
			if s.starts_with('&') {
				reference(s)?;
			} else if s.starts_with("<!--") {
				comment(s)?;
			} else if s.starts_with("<?") {
				pi(s)?;
			} else if s.starts_with("<![CDATA[") {
				cd_sect(s)?;
			} else if s.starts_with("</") {
				break;
			} else if s.starts_with('<') {
				element(s)?;
			} else {
				char_data(s)?;
			}
		}
		Ok(())
	})
}

/// CharRef \[66\]
fn char_ref(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("CharRef", s);
	if let Err(e) = literal("&#", s) {
		return Err(r.fail_with(s, e));
	}
	let radix = match s.strip_prefix('x') {
		Some(rest) => {
			*s = rest;
			16
		}
		None => 10,
	};
	if s.is_empty() {
		return Err(r.fail_msg(s, "unterminated character reference"));
	}
	if s.starts_with(';') {
		return Err(r.fail_msg(s, "character reference must have at least one digit"));
	}
	let mut cp: u32 = 0;
	while let Some(d) = s.chars().next().and_then(|c| c.to_digit(radix)) {
		cp = cp.saturating_mul(radix).saturating_add(d);
		*s = &s[1..];
	}
	if !is_char(cp) {
		return Err(r.fail_msg(s, format!("U+{:04X} is not a legal character", cp)));
	}
	match s.strip_prefix(';') {
		Some(rest) => {
			*s = rest;
			Ok(())
		}
		None => Err(r.fail_msg(s, "expected ;")),
	}
}

/// Reference \[67\]
fn reference(s: &mut &str) -> CheckResult<()> {
	rule(s, "Reference", |s| {
		if s.starts_with("&#") {
			char_ref(s)
		} else {
			entity_ref(s)
		}
	})
}

/// EntityRef \[68\]
fn entity_ref(s: &mut &str) -> CheckResult<()> {
	rule(s, "EntityRef", |s| {
		literal("&", s)?;
		name(s)?;
		literal(";", s)
	})
}

/// EncodingDecl \[80\]
fn encoding_decl(s: &mut &str) -> CheckResult<()> {
	rule(s, "EncodingDecl", |s| {
		space(s)?;
		literal("encoding", s)?;
		eq(s)?;
		quoted(s, enc_name)
	})
}

/// EncName \[81\]
fn enc_name(s: &mut &str) -> CheckResult<()> {
	let r = Rule::enter("EncName", s);
	if munch(s, |c| c.is_ascii_alphabetic()) == 0 {
		return Err(r.fail(s));
	}
	munch(s, |c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
	Ok(())
}

/// document \[1\]
fn document(s: &mut &str) -> CheckResult<()> {
	rule(s, "Document", |s| {
		prolog(s)?;
		element(s)?;
		misc_star(s)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn messages(e: &WFError) -> Vec<String> {
		e.iter().map(|l| l.message().to_string()).collect()
	}

	#[test]
	fn accepts_minimal_documents() {
		assert!(check("<a/>").is_ok());
		assert!(check("<a></a>").is_ok());
		assert!(check("<a ></a >").is_ok());
		assert!(check("<ä/>").is_ok());
	}

	#[test]
	fn accepts_full_prolog_and_epilog() {
		let doc = "<?xml version=\"1.0\" encoding='UTF-8' standalone=\"yes\" ?>\n\
			<!-- leading -->\n\
			<?style sheet?>\n\
			<!DOCTYPE root SYSTEM \"root.dtd\">\n\
			<root a='1' b=\"&amp;&#x41;&#65;\">\n\
			  text &lt; more<![CDATA[ <raw> ]]><?pi data?><!--c--><e/>\n\
			</root>\n\
			<!-- trailing -->\n";
		check(doc).unwrap();
	}

	#[test]
	fn accepts_doctype_with_internal_subset() {
		check("<!DOCTYPE a [<!ELEMENT a ANY>]><a/>").unwrap();
		check("<!DOCTYPE a [ <!ENTITY x 'y'> ] ><a/>").unwrap();
		// the subset is not tokenized
		assert!(check("<!DOCTYPE a [<!ENTITY x \"]\">]><a/>").is_err());
	}

	#[test]
	fn rejects_empty_input() {
		let e = check("").unwrap_err();
		assert_eq!(messages(&e)[..2], ["Document".to_string(), "Element".to_string()]);
	}

	#[test]
	fn rejects_mismatched_end_tag() {
		let e = check("<a><b></a>").unwrap_err();
		let inner = e.innermost();
		assert!(inner.message().contains("differs from start tag name"));
		assert!(inner.message().contains("\"b\""));
		assert!(inner.message().contains("\"a\""));
		assert_eq!(inner.line(), Some(1));
		assert_eq!(inner.column(), Some(7));
		assert_eq!(
			messages(&e),
			vec![
				"Document",
				"Element",
				"Content",
				"Element",
				"end tag name \"a\" differs from start tag name \"b\"",
			]
		);
	}

	#[test]
	fn reports_positions_for_every_link() {
		let e = check("<a>\n\n  &#1;</a>").unwrap_err();
		let inner = e.innermost();
		assert_eq!(inner.message(), "U+0001 is not a legal character");
		assert_eq!((inner.line(), inner.column()), (Some(3), Some(6)));
		let char_ref = e.iter().find(|l| l.message() == "CharRef").unwrap();
		assert_eq!((char_ref.line(), char_ref.column()), (Some(3), Some(3)));
		assert_eq!((e.line(), e.column()), (Some(1), Some(1)));
	}

	#[test]
	fn display_renders_chain() {
		let e = check("<a>]]></a>").unwrap_err();
		let rendered = e.to_string();
		assert!(rendered.starts_with("Line 1, column 1: Document\n"));
		assert!(rendered.ends_with("Line 1, column 4: ]]> found within char data\n"));
	}

	#[test]
	fn rejects_invalid_characters() {
		let e = check("<a>\u{1}</a>").unwrap_err();
		assert_eq!(e.message(), "Chars");
		assert_eq!(e.innermost().message(), "invalid character: U+0001");
		assert_eq!(e.innermost().column(), Some(4));
	}

	#[test]
	fn rejects_junk_after_document() {
		let e = check("<a/>junk").unwrap_err();
		assert_eq!(e.message(), "Junk found after document");
		assert!(e.cause().is_none());
		assert_eq!(e.column(), Some(5));
	}

	#[test]
	fn rejects_double_hyphen_in_comment() {
		assert!(check("<a><!-- x -- y --></a>").is_err());
		assert!(check("<a><!-- x - y --></a>").is_ok());
	}

	#[test]
	fn rejects_unterminated_constructs() {
		assert!(check("<a><!-- x</a>").is_err());
		assert!(check("<a><![CDATA[ x</a>").is_err());
		assert!(check("<a><?pi x</a>").is_err());
		assert!(check("<a>").is_err());
		assert!(check("<a x='1></a>").is_err());
	}

	#[test]
	fn rejects_bad_references() {
		assert!(check("<a>a & b</a>").is_err());
		assert!(check("<a>&#;</a>").is_err());
		assert!(check("<a>&#x;</a>").is_err());
		assert!(check("<a>&#12</a>").is_err());
		assert!(check("<a>&#xD800;</a>").is_err());
		assert!(check("<a>&#99999999999;</a>").is_err());
		assert!(check("<a>&custom;</a>").is_ok());
	}

	#[test]
	fn rejects_bad_attribute_values() {
		let inner = |text: &str| check(text).unwrap_err().innermost().message().to_string();
		assert_eq!(inner("<a x=1/>"), "attribute value requires quotes");
		assert_eq!(inner("<a x='<'/>"), "< found in attribute value");
		assert_eq!(inner("<a x='1/>"), "unterminated attribute value");
		assert!(check("<a x='&'/>").is_err());
		assert!(check("<a x='&lt;'/>").is_ok());
		assert!(check("<a x='1' />").is_ok());
	}

	#[test]
	fn attribute_errors_point_into_the_value() {
		let e = check("<root>\n<a  x='1' y='<'/></root>").unwrap_err();
		let inner = e.innermost();
		assert_eq!((inner.line(), inner.column()), (Some(2), Some(14)));
		let names: Vec<&str> = e.iter().map(|l| l.message()).collect();
		assert!(names.contains(&"Attribute"));
		assert!(names.contains(&"AttValue"));
	}

	#[test]
	fn rejects_pi_without_target() {
		let e = check("<??><a/>").unwrap_err();
		assert!(e.iter().any(|l| l.message() == "PITarget"));
		assert!(check("<a><? ?></a>").is_err());
		assert!(check("<a><?1x?></a>").is_err());
		assert!(check("<a><?pi?></a>").is_ok());
		assert!(check("<a><?pi  some data ?></a>").is_ok());
		assert!(check("<a><?pi-data?></a>").is_ok());
	}

	#[test]
	fn rejects_reserved_pi_target() {
		let e = check("<a><?XmL data?></a>").unwrap_err();
		assert_eq!(
			e.innermost().message(),
			"reserved processing instruction target \"XmL\""
		);
		assert_eq!(e.innermost().column(), Some(6));
		assert!(check("<a><?xml-stylesheet href='x'?></a>").is_ok());
		assert!(check("<a><?xml2 x?></a>").is_ok());
	}

	#[test]
	fn xml_declaration_only_at_start() {
		assert!(check("<?xml version='1.0'?><a/>").is_ok());
		assert!(check(" <?xml version='1.0'?><a/>").is_err());
		assert!(check("<!-- c --><?xml version='1.0'?><a/>").is_err());
		assert!(check("<a><?xml version='1.0'?></a>").is_err());
		assert!(check("<a/><?xml version='1.0'?>").is_err());
		assert!(check("<?xml?><a/>").is_err());
	}

	#[test]
	fn rejects_duplicate_attributes() {
		let e = check("<a x='1' x='2'/>").unwrap_err();
		assert_eq!(e.innermost().message(), "duplicate attribute \"x\"");
		assert_eq!(e.innermost().column(), Some(10));
	}

	#[test]
	fn rejects_broken_xml_declaration() {
		let e = check("<?xml version='1.0' standalone='maybe'?><a/>").unwrap_err();
		assert!(e.iter().any(|l| l.message() == "XMLDecl"));
		assert!(check("<?xml encoding='utf-8'?><a/>").is_err());
		assert!(check("<?xml-stylesheet href='x'?><a/>").is_ok());
	}

	#[test]
	fn rejects_invalid_names() {
		assert!(check("<1a/>").is_err());
		assert!(check("<a/><b/>").is_err());
		assert!(check("<a></a b>").is_err());
	}

	#[test]
	fn combinators_restore_cursor() {
		let mut s = " x";
		optional(&mut s, |s| sequence(s, space, |s| literal("y", s)));
		assert_eq!(s, " x");
		let mut s = "   x";
		one_or_more(&mut s, space).unwrap();
		assert_eq!(s, "x");
		let mut s = "x";
		assert!(one_or_more(&mut s, space).is_err());
		assert_eq!(s, "x");
	}
}

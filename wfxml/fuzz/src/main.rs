#[macro_use]
extern crate afl;
extern crate wfxml;

use std::cell::Cell;

use wfxml::{check, Document, DocumentParser};

fn parse_unchecked(text: &str) -> wfxml::Result<usize> {
	let nevents = Cell::new(0usize);
	{
		let mut parser = DocumentParser::new_unchecked(text)?;
		parser.on_end_tag(None, |_| {
			nevents.set(nevents.get() + 1);
			Ok(())
		});
		parser.on_text_raw(|_| {
			nevents.set(nevents.get() + 1);
			Ok(())
		});
		parser.parse()?;
	}
	Ok(nevents.get())
}

fn main() {
	fuzz!(|data: &[u8]| {
		let text = match std::str::from_utf8(data) {
			Ok(text) => text,
			Err(_) => return,
		};

		// the parser must never panic, not even on garbage
		let _ = parse_unchecked(text);

		if check(text).is_ok() {
			let doc = match Document::from_text(text) {
				Ok(doc) => doc,
				Err(e) => panic!("checked document failed to parse: {}", e),
			};
			let serialized = doc.to_string();
			if let Err(e) = check(&serialized) {
				panic!("serialized document is not well-formed: {}", e);
			}
		}
	});
}

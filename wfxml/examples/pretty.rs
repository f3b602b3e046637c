use std::io;
use std::io::{Read, Write};
use std::process;

use wfxml::{check, Document};

fn main() {
	let mut text = String::new();
	io::stdin()
		.read_to_string(&mut text)
		.expect("failed to read stdin");

	if let Err(e) = check(&text) {
		eprint!("{}", e);
		process::exit(1);
	}

	let doc = Document::from_text(&text).expect("checked document failed to parse");
	let stdout = io::stdout();
	let mut stdout = stdout.lock();
	let prolog = doc.prolog().trim();
	if !prolog.is_empty() {
		writeln!(stdout, "{}", prolog).expect("failed to write to stdout");
	}
	for line in doc.pretty(2) {
		writeln!(stdout, "{}", line).expect("failed to write to stdout");
	}
}

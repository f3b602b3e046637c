use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bytes::BytesMut;

use wfxml::{check, Document, DocumentParser, Writer};

static SHORT_DOCUMENT: &'static str = "<?xml version='1.0'?>
<!DOCTYPE note SYSTEM 'note.dtd'>
<note priority='high'>
  <to>Tove</to>
  <from>Jani</from>
  <heading>Reminder</heading>
  <body>Don&apos;t forget me this weekend! &#x263A;</body>
  <!-- sent via relay -->
</note>
";

fn huge_document() -> String {
	let mut w = Writer::new(BytesMut::with_capacity(1 << 20));
	w.xml_declaration("1.0", Some("UTF-8"), None).unwrap();
	w.tag("catalog", &[], |w| {
		for i in 0..2000u32 {
			w.tag("book", &[("id", &i), ("available", &(i % 3 == 0))], |w| {
				w.tight()
					.tag("title", &[], |w| w.text(&format!("Volume {} & sequel", i)))?;
				w.tight().tag("price", &[("currency", &"EUR")], |w| {
					w.text(&format!("{}.{:02}", i / 7, i % 100))
				})?;
				if i % 10 == 0 {
					w.comment(" out of print ")?;
					w.cdata("<raw> markup")?;
				}
				w.empty_tag("cover", &[("src", &format!("covers/{}.png", i))])
			})?;
		}
		Ok(())
	})
	.unwrap();
	String::from_utf8(w.into_inner().to_vec()).unwrap()
}

fn short_document(c: &mut Criterion) {
	let mut group = c.benchmark_group("short_document");

	group.bench_function("check", |b| {
		b.iter(|| check(black_box(SHORT_DOCUMENT)).unwrap());
	});

	group.bench_function("dom", |b| {
		b.iter(|| Document::from_text(black_box(SHORT_DOCUMENT)).unwrap());
	});
}

fn large_document(c: &mut Criterion) {
	let text = huge_document();
	let mut group = c.benchmark_group("large_document");

	group.bench_function("check", |b| {
		b.iter(|| check(black_box(&text)).unwrap());
	});

	group.bench_function("parse_unchecked", |b| {
		b.iter(|| {
			let mut ntags = 0usize;
			{
				let mut parser = DocumentParser::new_unchecked(black_box(&text)).unwrap();
				parser.on_end_tag(None, |_| {
					ntags += 1;
					Ok(())
				});
				parser.parse().unwrap();
			}
			ntags
		});
	});

	group.bench_function("dom", |b| {
		b.iter(|| Document::from_text(black_box(&text)).unwrap());
	});

	let doc = Document::from_text(&text).unwrap();
	group.bench_function("serialize", |b| {
		b.iter(|| black_box(&doc).to_string());
	});
}

criterion_group! {
	name = benches;
	config = Criterion::default().sample_size(50);
	targets = short_document, large_document
}
criterion_main!(benches);

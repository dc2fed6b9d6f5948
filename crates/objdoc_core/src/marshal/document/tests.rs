use objdoc_testkit::{fixture_path, scratch_path};

use super::{Document, SaveOptions, load_first, load_items, load_keyed, save_items, save_one};
use crate::marshal::{Compression, DecodeOptions, MarshalError, Node, WriteOptions};

#[derive(Debug, Clone, Default, PartialEq)]
struct Entry {
	key: String,
	value: i64,
}

crate::marshal_record!(Entry { key as "Key", value as "Value" });

fn entry(key: &str, value: i64) -> Entry {
	Entry { key: key.to_owned(), value }
}

#[test]
fn save_then_load_preserves_items() {
	let path = scratch_path("entries.xml");
	let items = vec![entry("a", 1), entry("b", -2)];
	save_items(&path, &items).expect("save");

	let text = std::fs::read_to_string(&path).expect("read back");
	assert!(text.starts_with("<?xml"));
	assert!(text.contains("<Entry>"));

	let loaded: Vec<Entry> = load_items(&path, &DecodeOptions::default()).expect("load");
	assert_eq!(loaded, items);
}

#[test]
fn single_item_files_load_first() {
	let path = scratch_path("one.xml");
	save_one(&path, &entry("only", 7)).expect("save");
	let first: Option<Entry> = load_first(&path, &DecodeOptions::default()).expect("load");
	assert_eq!(first, Some(entry("only", 7)));
}

#[test]
fn keyed_load_indexes_by_field() {
	let path = scratch_path("keyed.xml");
	save_items(&path, &[entry("x", 1), entry("y", 2), entry("x", 3)]).expect("save");
	let keyed = load_keyed(&path, &DecodeOptions::default(), |item: &Entry| item.key.clone()).expect("load");
	assert_eq!(keyed.len(), 2);
	assert_eq!(keyed["x"].value, 3);
}

#[test]
fn compressed_documents_round_trip() {
	let path = scratch_path("entries.xml.zst");
	let document = Document::from_items(&[entry("z", 26)]).expect("encode");
	document.save(&path, &SaveOptions::compressed()).expect("save");

	let raw = std::fs::read(&path).expect("read raw");
	assert!(raw.starts_with(&crate::marshal::compression::ZSTD_MAGIC));

	let reopened = Document::open(&path).expect("open");
	assert_eq!(reopened.compression, Compression::Zstd);
	assert_eq!(reopened.root(), document.root());
	assert_eq!(reopened.first::<Entry>(&DecodeOptions::default()).expect("decode"), Some(entry("z", 26)));
}

#[test]
fn missing_file_is_io_error() {
	let err = Document::open(scratch_path("missing.xml")).expect_err("no file");
	assert!(matches!(err, MarshalError::Io(_)));
}

#[test]
fn non_utf8_file_is_rejected() {
	let path = scratch_path("latin1.xml");
	std::fs::write(&path, b"<root><A>\xff</A></root>").expect("write");
	let err = Document::open(&path).expect_err("bad utf-8");
	assert!(matches!(err, MarshalError::InvalidUtf8(_)));
}

#[test]
fn fixture_stats_count_node_kinds() {
	let document = Document::open(fixture_path("people.xml")).expect("open fixture");
	let stats = document.stats();

	assert_eq!(stats.item_count, 2);
	assert_eq!(stats.item_names.get("Person"), Some(&2));
	// root, 2 Person, 12 fields, 2 tags, 1 entry with key and value
	assert_eq!(stats.node_count, 20);
	assert_eq!(stats.empty_count, 3);
	assert_eq!(stats.leaf_count, 11);
	assert_eq!(stats.max_depth, 5);
}

#[test]
fn parse_and_render_are_inverse() {
	let document = Document::parse("<root><Entry><Key>k</Key><Value>1</Value></Entry></root>").expect("parse");
	assert_eq!(document.compression, Compression::None);

	let text = document.to_xml(&WriteOptions::compact()).expect("render");
	assert_eq!(text, "<root><Entry><Key>k</Key><Value>1</Value></Entry></root>");
	assert_eq!(document.into_root().children(), [Node::composite("Entry", vec![Node::leaf("Key", "k"), Node::leaf("Value", "1")])]);
}

#[test]
fn stats_handle_very_deep_documents() {
	let mut node = Node::empty("Tip");
	for _ in 1..100_000 {
		node = Node::composite("Link", vec![node]);
	}
	let stats = Document::from_root(Node::composite("root", vec![node])).stats();
	assert_eq!(stats.max_depth, 100_001);
	assert_eq!(stats.node_count, 100_001);
	assert_eq!(stats.empty_count, 1);
	assert_eq!(stats.item_names.get("Link"), Some(&1));
}

#[test]
fn saving_unconstructible_items_fails_without_writing() {
	struct Ticket {
		id: u32,
	}

	impl crate::marshal::Record for Ticket {
		fn type_name() -> &'static str {
			"Ticket"
		}

		fn constructor() -> Option<fn() -> Self> {
			None
		}

		fn fields() -> Vec<crate::marshal::Field<Self>> {
			vec![crate::marshal::Field::writable("Id", |ticket: &Self| &ticket.id, |ticket: &mut Self, value| ticket.id = value)]
		}
	}

	impl crate::marshal::Marshal for Ticket {
		fn descriptor() -> crate::marshal::TypeDescriptor {
			crate::marshal::record_descriptor::<Self>()
		}

		fn encode(&self, name: &str) -> Node {
			crate::marshal::encode_record(self, name)
		}

		fn decode(node: &Node, cx: &mut crate::marshal::DecodeContext<'_>) -> crate::marshal::Result<Self> {
			crate::marshal::decode_record(node, cx)
		}
	}

	let path = scratch_path("tickets.xml");
	let err = save_items(&path, &[Ticket { id: 1 }]).expect_err("must reject");
	assert!(matches!(err, MarshalError::UnsupportedType { .. }));
	assert!(!path.exists());
}

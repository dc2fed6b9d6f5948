use super::{Field, Record, decode_record, encode_record};
use crate::marshal::{DecodeContext, DecodeOptions, Marshal, MarshalError, Node, decode_value};

#[derive(Debug, Default, PartialEq)]
struct Window {
	title: String,
	width: u32,
	height: u32,
}

impl Window {
	fn area(&self) -> u32 {
		self.width * self.height
	}
}

impl Record for Window {
	fn type_name() -> &'static str {
		"Window"
	}

	fn constructor() -> Option<fn() -> Self> {
		Some(|| Self {
			title: "untitled".to_owned(),
			..Self::default()
		})
	}

	fn fields() -> Vec<Field<Self>> {
		vec![
			Field::writable("Title", |window: &Self| &window.title, |window: &mut Self, value| window.title = value),
			Field::writable("Width", |window: &Self| &window.width, |window: &mut Self, value| window.width = value),
			Field::writable("Height", |window: &Self| &window.height, |window: &mut Self, value| window.height = value),
			Field::read_only::<u32>("Area"),
		]
	}
}

struct Socket {
	port: u16,
}

impl Record for Socket {
	fn type_name() -> &'static str {
		"Socket"
	}

	fn constructor() -> Option<fn() -> Self> {
		None
	}

	fn fields() -> Vec<Field<Self>> {
		vec![Field::writable("Port", |socket: &Self| &socket.port, |socket: &mut Self, value| socket.port = value)]
	}
}

#[derive(Debug, Default, PartialEq)]
struct Pair {
	left: i8,
	right: Option<i8>,
}

crate::marshal_record!(Pair { left, right });

fn decode_window(node: &Node) -> crate::marshal::Result<Window> {
	let options = DecodeOptions::default();
	let mut cx = DecodeContext::new(&options, node.name());
	decode_record(node, &mut cx)
}

#[test]
fn fields_report_writability_in_declared_order() {
	let fields = Window::fields();
	let summary: Vec<_> = fields.iter().map(|field| (field.name(), field.is_writable())).collect();
	assert_eq!(summary, [("Title", true), ("Width", true), ("Height", true), ("Area", false)]);
	assert_eq!((fields[3].info().descriptor)().type_name, "u32");
}

#[test]
fn encode_writes_writable_fields_only() {
	let window = Window {
		title: "main".to_owned(),
		width: 4,
		height: 3,
	};
	assert_eq!(window.area(), 12);

	let node = encode_record(&window, "Window");
	let names: Vec<_> = node.children().iter().map(Node::name).collect();
	assert_eq!(names, ["Title", "Width", "Height"]);
}

#[test]
fn decode_starts_from_constructor_and_skips_read_only_nodes() {
	let node = Node::composite("Window", vec![Node::leaf("Width", "8"), Node::leaf("Area", "not a number")]);
	let window = decode_window(&node).expect("decode");
	assert_eq!(
		window,
		Window {
			title: "untitled".to_owned(),
			width: 8,
			height: 0,
		}
	);
}

#[test]
fn repeated_field_node_keeps_last_value() {
	let node = Node::composite("Window", vec![Node::leaf("Width", "1"), Node::leaf("Width", "2")]);
	assert_eq!(decode_window(&node).expect("decode").width, 2);
}

#[test]
fn field_names_match_exactly() {
	let node = Node::composite("Window", vec![Node::leaf("width", "1")]);
	let err = decode_window(&node).expect_err("case differs");
	assert!(matches!(err, MarshalError::MissingFieldMapping { ref field, .. } if field == "width"));
}

#[test]
fn record_without_constructor_encodes_but_does_not_decode() {
	let node = encode_record(&Socket { port: 8080 }, "Socket");
	assert_eq!(node.child("Port").and_then(Node::text), Some("8080"));

	let options = DecodeOptions::default();
	let mut cx = DecodeContext::new(&options, "Socket");
	let err = decode_record::<Socket>(&node, &mut cx).err().expect("no constructor");
	assert!(matches!(err, MarshalError::UnsupportedType { ref type_name, .. } if type_name == "Socket"));
}

#[test]
fn macro_registered_fields_default_to_identifier_names() {
	let pair = Pair { left: -3, right: None };
	let node = pair.encode("Pair");
	assert_eq!(node, Node::composite("Pair", vec![Node::leaf("left", "-3"), Node::empty("right")]));

	let decoded: Pair = decode_value(&node, &DecodeOptions::default()).expect("decode");
	assert_eq!(decoded, pair);
}

use super::{DecodeContext, DecodeOptions, UnknownFieldPolicy, decode_first, decode_items, decode_keyed, decode_value};
use crate::marshal::{
	Category, Field, Marshal, MarshalError, Node, Record, TypeDescriptor, classify, decode_record, encode_items, encode_record, record_descriptor,
};

#[derive(Debug, Clone, Default, PartialEq)]
struct Person {
	name: String,
	age: u32,
}

crate::marshal_record!(Person { name as "Name", age as "Age" });

#[derive(Debug, Clone, Default, PartialEq)]
struct Tree {
	label: String,
	children: Vec<Tree>,
}

crate::marshal_record!(Tree { label as "Label", children as "Children" });

/// Record with no zero-argument constructor.
#[derive(Debug)]
struct Token {
	secret: String,
}

impl Record for Token {
	fn type_name() -> &'static str {
		"Token"
	}

	fn constructor() -> Option<fn() -> Self> {
		None
	}

	fn fields() -> Vec<Field<Self>> {
		vec![Field::writable("Secret", |token: &Self| &token.secret, |token: &mut Self, value| token.secret = value)]
	}
}

impl Marshal for Token {
	fn descriptor() -> TypeDescriptor {
		record_descriptor::<Self>()
	}

	fn encode(&self, name: &str) -> Node {
		encode_record(self, name)
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> crate::marshal::Result<Self> {
		decode_record(node, cx)
	}
}

#[derive(Debug, Default)]
struct Wallet {
	tokens: Vec<Token>,
}

crate::marshal_record!(Wallet { tokens as "Tokens" });

fn person(name: &str, age: u32) -> Person {
	Person { name: name.to_owned(), age }
}

fn person_node(name: &str, age: &str) -> Node {
	Node::composite("Person", vec![Node::leaf("Name", name), Node::leaf("Age", age)])
}

#[test]
fn unknown_child_is_missing_field_mapping() {
	let node = Node::composite("Person", vec![Node::leaf("Name", "Ana"), Node::leaf("Unknown", "x")]);
	let root = Node::composite("root", vec![node]);

	let err = decode_first::<Person>(&root, &DecodeOptions::default()).expect_err("unknown field");
	let MarshalError::MissingFieldMapping { path, type_name, field } = err else {
		panic!("expected missing field mapping, got {err}");
	};
	assert_eq!(path, "root/Person/Unknown");
	assert_eq!(type_name, "Person");
	assert_eq!(field, "Unknown");
}

#[test]
fn skip_policy_ignores_unknown_children() {
	let node = Node::composite("Person", vec![Node::leaf("Unknown", "x"), Node::leaf("Age", "4")]);
	let options = DecodeOptions {
		unknown_fields: UnknownFieldPolicy::Skip,
		..DecodeOptions::default()
	};
	let decoded: Person = decode_value(&node, &options).expect("skip unknown");
	assert_eq!(decoded, person("", 4));
}

#[test]
fn absent_fields_keep_constructed_defaults() {
	let node = Node::composite("Person", vec![Node::leaf("Name", "Bo")]);
	let decoded: Person = decode_value(&node, &DecodeOptions::default()).expect("partial");
	assert_eq!(decoded, person("Bo", 0));

	let empty: Person = decode_value(&Node::empty("Person"), &DecodeOptions::default()).expect("empty record");
	assert_eq!(empty, Person::default());
}

#[test]
fn text_into_record_is_shape_mismatch() {
	let err = decode_value::<Person>(&Node::leaf("Person", "Ana"), &DecodeOptions::default()).expect_err("text record");
	assert!(matches!(err, MarshalError::ShapeMismatch { ref expected, .. } if expected == "Person"));
}

#[test]
fn format_error_names_the_leaf() {
	let root = Node::composite("root", vec![person_node("Ana", "30"), person_node("Bo", "old")]);
	let results: Vec<_> = decode_items::<Person>(&root, &DecodeOptions::default()).collect();
	assert_eq!(results.len(), 2);
	assert_eq!(*results[0].as_ref().expect("first item"), person("Ana", 30));

	let Err(MarshalError::Format { path, expected, text }) = &results[1] else {
		panic!("expected format error");
	};
	assert_eq!(path, "root/Person/Age");
	assert_eq!(expected, "u32");
	assert_eq!(text, "old");
}

#[test]
fn items_collect_stops_at_first_error() {
	let root = Node::composite("root", vec![person_node("Ana", "-1"), person_node("Bo", "x")]);
	let err = decode_items::<Person>(&root, &DecodeOptions::default())
		.collect::<crate::marshal::Result<Vec<_>>>()
		.expect_err("collect");
	assert!(matches!(err, MarshalError::Format { ref text, .. } if text == "-1"));
}

#[test]
fn first_of_empty_document_is_none() {
	let root = Node::empty("root");
	assert_eq!(decode_first::<Person>(&root, &DecodeOptions::default()).expect("empty root"), None);
	assert_eq!(decode_items::<Person>(&root, &DecodeOptions::default()).count(), 0);
}

#[test]
fn keyed_later_items_win() {
	let items = [person("Ana", 30), person("Bo", 41), person("Ana", 31)];
	let root = encode_items(&items).expect("encode");

	let keyed = decode_keyed(&root, &DecodeOptions::default(), |item: &Person| item.name.clone()).expect("keyed");
	assert_eq!(keyed.len(), 2);
	assert_eq!(keyed["Ana"].age, 31);
	assert_eq!(keyed["Bo"].age, 41);
}

fn tree_node(name: &str, height: usize) -> Node {
	let mut children = vec![Node::leaf("Label", height.to_string())];
	if height > 0 {
		children.push(Node::composite("Children", vec![tree_node("Element0", height - 1)]));
	}
	Node::composite(name, children)
}

#[test]
fn depth_guard_stops_deep_documents() {
	let node = tree_node("Tree", 6);
	let shallow = DecodeOptions {
		max_depth: 4,
		..DecodeOptions::default()
	};
	let err = decode_value::<Tree>(&node, &shallow).expect_err("too deep");
	let MarshalError::DepthExceeded { path, max_depth } = err else {
		panic!("expected depth error, got {err}");
	};
	assert_eq!(max_depth, 4);
	assert_eq!(path, "Tree/Children/Element0/Children/Element0/Label");

	let tree: Tree = decode_value(&node, &DecodeOptions::default()).expect("default depth");
	assert_eq!(tree.label, "6");
	assert_eq!(tree.children[0].label, "5");
	assert!(tree.children[0].children[0].children[0].children[0].children[0].children[0].children.is_empty());
}

#[test]
fn context_tracks_path_while_descending() {
	let options = DecodeOptions::default();
	let mut cx = DecodeContext::new(&options, "root");
	let child = Node::leaf("Item", "1");

	let seen = cx
		.descend(&child, |cx| {
			assert_eq!(cx.depth(), 1);
			Ok(cx.path())
		})
		.expect("descend");
	assert_eq!(seen, "root/Item");
	assert_eq!(cx.path(), "root");
	assert_eq!(cx.path_with("Other"), "root/Other");
}

#[test]
fn unconstructible_item_type_fails_before_reading_nodes() {
	// A text item would be a shape mismatch if it were ever visited.
	let root = Node::composite("root", vec![Node::leaf("Token", "not a record"), Node::leaf("Token", "x")]);
	let options = DecodeOptions::default();
	let mut items = decode_items::<Token>(&root, &options);
	assert_eq!(items.size_hint(), (1, Some(1)));

	let err = items.next().expect("one item").expect_err("must reject");
	assert!(matches!(err, MarshalError::UnsupportedType { ref type_name, .. } if type_name == "Token"));
	assert!(items.next().is_none());

	let err = decode_first::<Token>(&Node::empty("root"), &options).expect_err("empty root still rejects");
	assert!(matches!(err, MarshalError::UnsupportedType { .. }));
}

#[test]
fn unconstructible_field_type_fails_the_owner() {
	let node = Node::leaf("Wallet", "not a record");
	let err = decode_value::<Wallet>(&node, &DecodeOptions::default()).expect_err("must reject");
	assert!(matches!(err, MarshalError::UnsupportedType { ref type_name, .. } if type_name == "Token"));
}

#[test]
fn optional_collection_is_nullable_and_reads_empty_as_none() {
	let Category::Nullable(inner) = classify(&Option::<Vec<i32>>::descriptor()).expect("classify") else {
		panic!("expected nullable");
	};
	assert_eq!(inner.label(), "list");

	let options = DecodeOptions::default();
	let none = decode_value::<Option<Vec<i32>>>(&Node::empty("Lucky"), &options).expect("decode empty");
	assert_eq!(none, None);
	let some = decode_value::<Option<Vec<i32>>>(&Node::composite("Lucky", vec![Node::leaf("Element0", "4")]), &options).expect("decode list");
	assert_eq!(some, Some(vec![4]));
}

#[test]
fn nested_option_reads_inner_none_as_outer_none() {
	let node = Some(None::<i32>).encode("Value");
	assert!(node.is_empty());
	let decoded = decode_value::<Option<Option<i32>>>(&node, &DecodeOptions::default()).expect("decode");
	assert_eq!(decoded, None);
}

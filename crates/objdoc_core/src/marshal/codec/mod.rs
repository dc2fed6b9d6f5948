use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::marshal::{Body, DecodeContext, DuplicateKeyPolicy, MarshalError, Node, Result, Scalar, Shape, TypeDescriptor};

/// Name prefix for list items and dictionary entries (`Element0`, `Element1`, ...).
pub const ELEMENT_PREFIX: &str = "Element";
/// Dictionary entry child holding the key.
pub const KEY_NAME: &str = "Key";
/// Dictionary entry child holding the value.
pub const VALUE_NAME: &str = "Value";

/// A type that can be encoded to and decoded from a document [`Node`].
///
/// Each implementation is the statically dispatched branch for its category: scalars
/// encode as leaves, sequences and mappings as `Element{i}` composites, records as
/// field-named composites. Records and enums are normally registered through
/// [`marshal_record!`](crate::marshal_record) and [`marshal_enum!`](crate::marshal_enum).
pub trait Marshal: Sized {
	/// Describe this type for classification.
	fn descriptor() -> TypeDescriptor;

	/// Encode `self` into a node named `name`.
	fn encode(&self, name: &str) -> Node;

	/// Decode a value from `node`.
	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self>;
}

/// Text of a leaf targeted at a scalar; composites never decode into scalars.
pub(crate) fn leaf_text<'n>(node: &'n Node, cx: &DecodeContext<'_>, expected: &str) -> Result<Option<&'n str>> {
	match node.body() {
		Body::Text(text) => Ok(Some(text)),
		Body::Empty => Ok(None),
		Body::Children(_) => Err(cx.shape_mismatch(node, expected)),
	}
}

/// Children of a node targeted at a composite; text leaves never decode into composites.
pub(crate) fn composite_children<'n>(node: &'n Node, cx: &DecodeContext<'_>, expected: &str) -> Result<&'n [Node]> {
	if node.is_leaf() {
		return Err(cx.shape_mismatch(node, expected));
	}
	Ok(node.children())
}

fn decode_scalar<T: Scalar>(node: &Node, cx: &DecodeContext<'_>) -> Result<T> {
	// An empty node reads as "": strings accept it, every other scalar rejects it.
	let text = leaf_text(node, cx, T::TYPE_NAME)?.unwrap_or_default();
	T::from_text(text).ok_or_else(|| cx.format_error(T::TYPE_NAME, text))
}

macro_rules! impl_scalar_marshal {
	($($ty:ty),+ $(,)?) => {
		$(
			impl Marshal for $ty {
				fn descriptor() -> TypeDescriptor {
					TypeDescriptor {
						type_name: Cow::Borrowed(<$ty as Scalar>::TYPE_NAME),
						shape: Shape::Scalar(<$ty as Scalar>::KIND),
					}
				}

				fn encode(&self, name: &str) -> Node {
					Node::leaf(name, self.to_text())
				}

				fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
					decode_scalar(node, cx)
				}
			}
		)+
	};
}

impl_scalar_marshal!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String, Decimal);

impl<T: Marshal> Marshal for Option<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor {
			type_name: Cow::Owned(format!("Option<{}>", T::descriptor().type_name)),
			shape: Shape::Optional(T::descriptor),
		}
	}

	fn encode(&self, name: &str) -> Node {
		match self {
			Some(value) => value.encode(name),
			None => Node::empty(name),
		}
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
		if node.is_empty() {
			return Ok(None);
		}
		T::decode(node, cx).map(Some)
	}
}

impl<T: Marshal> Marshal for Vec<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor {
			type_name: Cow::Owned(format!("Vec<{}>", T::descriptor().type_name)),
			shape: Shape::Sequence(T::descriptor),
		}
	}

	fn encode(&self, name: &str) -> Node {
		let children = self
			.iter()
			.enumerate()
			.map(|(index, item)| item.encode(&element_name(index)))
			.collect();
		Node::composite(name, children)
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
		let children = composite_children(node, cx, "Vec")?;
		let mut out = Vec::with_capacity(children.len());
		// Document order is authoritative; element names are not checked.
		for child in children {
			out.push(cx.decode_child::<T>(child)?);
		}
		Ok(out)
	}
}

/// Backing mapping that can be filled entry by entry during decode.
trait MapSink<K, V> {
	fn insert_entry(&mut self, key: K, value: V) -> Option<V>;
}

impl<K: Eq + Hash, V, S: BuildHasher> MapSink<K, V> for HashMap<K, V, S> {
	fn insert_entry(&mut self, key: K, value: V) -> Option<V> {
		self.insert(key, value)
	}
}

impl<K: Ord, V> MapSink<K, V> for BTreeMap<K, V> {
	fn insert_entry(&mut self, key: K, value: V) -> Option<V> {
		self.insert(key, value)
	}
}

impl<K: Eq + Hash, V, S: BuildHasher> MapSink<K, V> for IndexMap<K, V, S> {
	fn insert_entry(&mut self, key: K, value: V) -> Option<V> {
		self.insert(key, value)
	}
}

fn encode_entries<'a, K, V>(name: &str, entries: impl Iterator<Item = (&'a K, &'a V)>) -> Node
where
	K: Marshal + 'a,
	V: Marshal + 'a,
{
	let children = entries
		.enumerate()
		.map(|(index, (key, value))| Node::composite(element_name(index), vec![key.encode(KEY_NAME), value.encode(VALUE_NAME)]))
		.collect();
	Node::composite(name, children)
}

fn decode_entries<K, V, M>(node: &Node, cx: &mut DecodeContext<'_>, mut map: M, type_name: &str) -> Result<M>
where
	K: Marshal,
	V: Marshal,
	M: MapSink<K, V>,
{
	for entry in composite_children(node, cx, type_name)? {
		let key_node = cx.entry_part(entry, KEY_NAME)?;
		let value_node = cx.entry_part(entry, VALUE_NAME)?;

		let (key, value) = cx.descend(entry, |cx| {
			let key = cx.decode_child::<K>(key_node)?;
			let value = cx.decode_child::<V>(value_node)?;
			Ok((key, value))
		})?;

		if map.insert_entry(key, value).is_some() {
			match cx.options().duplicate_keys {
				DuplicateKeyPolicy::Error => {
					return Err(MarshalError::DuplicateKey {
						path: cx.path_with(entry.name()),
						expected: type_name.to_owned(),
						key: render_key(key_node, cx),
					});
				}
				DuplicateKeyPolicy::LastWins => {
					tracing::warn!(path = %cx.path_with(entry.name()), key = %render_key(key_node, cx), "duplicate dictionary key overwritten");
				}
			}
		}
	}
	Ok(map)
}

fn render_key(key_node: &Node, cx: &DecodeContext<'_>) -> String {
	match key_node.text() {
		Some(text) => format!("{text:?}"),
		None => cx.path_with(key_node.name()),
	}
}

fn mapping_descriptor<K: Marshal, V: Marshal>(container: &str) -> TypeDescriptor {
	TypeDescriptor {
		type_name: Cow::Owned(format!("{container}<{}, {}>", K::descriptor().type_name, V::descriptor().type_name)),
		shape: Shape::Mapping {
			key: K::descriptor,
			value: V::descriptor,
		},
	}
}

impl<K, V, S> Marshal for HashMap<K, V, S>
where
	K: Marshal + Eq + Hash,
	V: Marshal,
	S: BuildHasher + Default,
{
	fn descriptor() -> TypeDescriptor {
		mapping_descriptor::<K, V>("HashMap")
	}

	fn encode(&self, name: &str) -> Node {
		encode_entries(name, self.iter())
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
		decode_entries(node, cx, HashMap::with_hasher(S::default()), "HashMap")
	}
}

impl<K, V> Marshal for BTreeMap<K, V>
where
	K: Marshal + Ord,
	V: Marshal,
{
	fn descriptor() -> TypeDescriptor {
		mapping_descriptor::<K, V>("BTreeMap")
	}

	fn encode(&self, name: &str) -> Node {
		encode_entries(name, self.iter())
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
		decode_entries(node, cx, BTreeMap::new(), "BTreeMap")
	}
}

impl<K, V, S> Marshal for IndexMap<K, V, S>
where
	K: Marshal + Eq + Hash,
	V: Marshal,
	S: BuildHasher + Default,
{
	fn descriptor() -> TypeDescriptor {
		mapping_descriptor::<K, V>("IndexMap")
	}

	fn encode(&self, name: &str) -> Node {
		encode_entries(name, self.iter())
	}

	fn decode(node: &Node, cx: &mut DecodeContext<'_>) -> Result<Self> {
		decode_entries(node, cx, IndexMap::with_hasher(S::default()), "IndexMap")
	}
}

/// Positional child name for list items and dictionary entries.
pub(crate) fn element_name(index: usize) -> String {
	format!("{ELEMENT_PREFIX}{index}")
}

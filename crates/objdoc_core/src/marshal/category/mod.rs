use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::marshal::{MarshalError, Result};

/// Flavor of a simple scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// `bool`.
	Bool,
	/// Signed integers.
	Int,
	/// Unsigned integers.
	UInt,
	/// `f32` and `f64`.
	Float,
	/// High-precision decimal.
	Decimal,
	/// `char`.
	Char,
	/// `String`.
	String,
}

impl ScalarKind {
	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::UInt => "uint",
			Self::Float => "float",
			Self::Decimal => "decimal",
			Self::Char => "char",
			Self::String => "string",
		}
	}
}

/// Registration-time description of a marshallable type.
#[derive(Clone)]
pub struct TypeDescriptor {
	/// Declared type name; root items are named after it.
	pub type_name: Cow<'static, str>,
	/// Structural shape.
	pub shape: Shape,
}

/// Structural shape of a [`TypeDescriptor`].
///
/// Nested types are referenced through descriptor functions so that recursive types
/// (a record holding a list of itself) can be described without infinite expansion.
#[derive(Clone)]
pub enum Shape {
	/// Atomic scalar.
	Scalar(ScalarKind),
	/// Unit-only enum with its member names in declaration order.
	Enum(&'static [&'static str]),
	/// Nullable wrapper.
	Optional(fn() -> TypeDescriptor),
	/// Homogeneous ordered sequence.
	Sequence(fn() -> TypeDescriptor),
	/// Key to value mapping with unique keys.
	Mapping {
		/// Key type.
		key: fn() -> TypeDescriptor,
		/// Value type.
		value: fn() -> TypeDescriptor,
	},
	/// Record with named fields.
	Record {
		/// All registered fields, writable or not, in declared order.
		fields: Vec<FieldInfo>,
		/// Whether a zero-argument constructor is registered.
		constructible: bool,
	},
}

/// Descriptor-level view of one record field.
#[derive(Clone)]
pub struct FieldInfo {
	/// Field name, used verbatim as the node name.
	pub name: &'static str,
	/// Declared field type.
	pub descriptor: fn() -> TypeDescriptor,
	/// Whether the field participates in encode and decode.
	pub writable: bool,
}

/// Marshalling category assigned by [`classify`].
#[derive(Debug, Clone)]
pub enum Category {
	/// Scalar leaf.
	Simple(ScalarKind),
	/// Enum leaf encoded by member name.
	Enum(&'static [&'static str]),
	/// Optional wrapper; an empty node reads as null.
	Nullable(Box<Category>),
	/// Ordered sequence of the element type.
	List(TypeDescriptor),
	/// Mapping from key type to value type.
	Dictionary(TypeDescriptor, TypeDescriptor),
	/// Record; only writable fields are listed.
	ComplexObject(Vec<FieldInfo>),
}

impl Category {
	/// Whether values of this category encode as a single text leaf.
	pub fn is_simple(&self) -> bool {
		match self {
			Self::Simple(_) | Self::Enum(_) => true,
			Self::Nullable(inner) => inner.is_simple(),
			Self::List(_) | Self::Dictionary(_, _) | Self::ComplexObject(_) => false,
		}
	}

	/// Render the category as a stable lowercase label.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Simple(_) => "simple",
			Self::Enum(_) => "enum",
			Self::Nullable(_) => "nullable",
			Self::List(_) => "list",
			Self::Dictionary(_, _) => "dictionary",
			Self::ComplexObject(_) => "complex",
		}
	}
}

/// Assign a marshalling category to a type.
///
/// First match wins: optional, simple, enum, list, dictionary, record. Every optional wrapper
/// is nullable, so an empty node reads back as null whatever the wrapped category is.
/// Records without a zero-argument constructor are rejected.
pub fn classify(descriptor: &TypeDescriptor) -> Result<Category> {
	match &descriptor.shape {
		Shape::Optional(inner) => Ok(Category::Nullable(Box::new(classify(&inner())?))),
		Shape::Scalar(kind) => Ok(Category::Simple(*kind)),
		Shape::Enum(members) => Ok(Category::Enum(*members)),
		Shape::Sequence(element) => Ok(Category::List(element())),
		Shape::Mapping { key, value } => Ok(Category::Dictionary(key(), value())),
		Shape::Record { fields, constructible } => {
			if !constructible {
				return Err(unsupported_record(&descriptor.type_name));
			}
			Ok(Category::ComplexObject(fields.iter().filter(|field| field.writable).cloned().collect()))
		}
	}
}

/// Classify `descriptor` and every type reachable from it through its category.
///
/// Each type name is classified once, so recursive records terminate. Read-only record fields
/// are not followed. Returns the category of `descriptor` itself.
pub fn classify_reachable(descriptor: &TypeDescriptor) -> Result<Category> {
	let root = classify(descriptor)?;
	let mut seen = HashSet::from([descriptor.type_name.clone().into_owned()]);
	let mut pending = reachable(descriptor);
	while let Some(next) = pending.pop() {
		if !seen.insert(next.type_name.clone().into_owned()) {
			continue;
		}
		classify(&next)?;
		pending.extend(reachable(&next));
	}
	Ok(root)
}

fn reachable(descriptor: &TypeDescriptor) -> Vec<TypeDescriptor> {
	match &descriptor.shape {
		Shape::Scalar(_) | Shape::Enum(_) => Vec::new(),
		Shape::Optional(inner) => vec![inner()],
		Shape::Sequence(element) => vec![element()],
		Shape::Mapping { key, value } => vec![key(), value()],
		Shape::Record { fields, .. } => fields
			.iter()
			.filter(|field| field.writable)
			.map(|field| (field.descriptor)())
			.collect(),
	}
}

pub(crate) fn unsupported_record(type_name: &str) -> MarshalError {
	MarshalError::UnsupportedType {
		type_name: type_name.to_owned(),
		reason: "record has no zero-argument constructor",
	}
}

/// Node name used for a document item of this type.
///
/// Leaves and records use their declared type name. Nullable wrappers take the wrapped
/// type's item name; lists and dictionaries use their category name, since generic type
/// names are not valid XML element names.
pub fn item_name(descriptor: &TypeDescriptor) -> Cow<'static, str> {
	match &descriptor.shape {
		Shape::Optional(inner) => item_name(&inner()),
		Shape::Sequence(_) => Cow::Borrowed("List"),
		Shape::Mapping { .. } => Cow::Borrowed("Dictionary"),
		Shape::Scalar(_) | Shape::Enum(_) | Shape::Record { .. } => descriptor.type_name.clone(),
	}
}

impl fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDescriptor")
			.field("type_name", &self.type_name)
			.field("shape", &self.shape)
			.finish()
	}
}

impl fmt::Debug for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
			Self::Enum(members) => f.debug_tuple("Enum").field(members).finish(),
			Self::Optional(inner) => f.debug_tuple("Optional").field(&inner().type_name).finish(),
			Self::Sequence(element) => f.debug_tuple("Sequence").field(&element().type_name).finish(),
			Self::Mapping { key, value } => f
				.debug_struct("Mapping")
				.field("key", &key().type_name)
				.field("value", &value().type_name)
				.finish(),
			Self::Record { fields, constructible } => f
				.debug_struct("Record")
				.field("fields", fields)
				.field("constructible", constructible)
				.finish(),
		}
	}
}

// Only the field type's name is rendered, so recursive records stay finite.
impl fmt::Debug for FieldInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldInfo")
			.field("name", &self.name)
			.field("type_name", &(self.descriptor)().type_name)
			.field("writable", &self.writable)
			.finish()
	}
}

use std::borrow::Cow;

use crate::marshal::category::unsupported_record;
use crate::marshal::codec::composite_children;
use crate::marshal::{DecodeContext, FieldInfo, Marshal, MarshalError, Node, Result, Shape, TypeDescriptor, UnknownFieldPolicy};

type EncodeFn<T> = Box<dyn Fn(&T, &str) -> Node + Send + Sync>;
type DecodeFn<T> = Box<dyn Fn(&mut T, &Node, &mut DecodeContext<'_>) -> Result<()> + Send + Sync>;

/// One registered field of a record, with its typed accessor pair.
pub struct Field<T> {
	name: &'static str,
	descriptor: fn() -> TypeDescriptor,
	access: Option<(EncodeFn<T>, DecodeFn<T>)>,
}

impl<T: 'static> Field<T> {
	/// Register a field that is both encoded and decoded.
	pub fn writable<F: Marshal + 'static>(name: &'static str, get: fn(&T) -> &F, set: fn(&mut T, F)) -> Self {
		let encode: EncodeFn<T> = Box::new(move |record: &T, node_name: &str| get(record).encode(node_name));
		let decode: DecodeFn<T> = Box::new(move |record: &mut T, node: &Node, cx: &mut DecodeContext<'_>| {
			let value = cx.decode_child::<F>(node)?;
			set(record, value);
			Ok(())
		});
		Self {
			name,
			descriptor: F::descriptor,
			access: Some((encode, decode)),
		}
	}

	/// Register a read-only field; it is described but never encoded or assigned.
	pub fn read_only<F: Marshal>(name: &'static str) -> Self {
		Self {
			name,
			descriptor: F::descriptor,
			access: None,
		}
	}

	/// Field name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Whether the field takes part in encode and decode.
	pub fn is_writable(&self) -> bool {
		self.access.is_some()
	}

	/// Descriptor-level view of this field.
	pub fn info(&self) -> FieldInfo {
		FieldInfo {
			name: self.name,
			descriptor: self.descriptor,
			writable: self.is_writable(),
		}
	}
}

/// A structured type encoded as one child node per writable field.
pub trait Record: Sized + 'static {
	/// Declared type name.
	fn type_name() -> &'static str;

	/// Zero-argument constructor; `None` makes the record encode-only.
	fn constructor() -> Option<fn() -> Self>;

	/// Registered fields in declared order.
	fn fields() -> Vec<Field<Self>>;
}

/// Build the descriptor of a record.
pub fn record_descriptor<T: Record>() -> TypeDescriptor {
	TypeDescriptor {
		type_name: Cow::Borrowed(T::type_name()),
		shape: Shape::Record {
			fields: T::fields().iter().map(Field::info).collect(),
			constructible: T::constructor().is_some(),
		},
	}
}

/// Encode a record as a composite with one child per writable field.
pub fn encode_record<T: Record>(record: &T, name: &str) -> Node {
	let children = T::fields()
		.iter()
		.filter_map(|field| field.access.as_ref().map(|(encode, _)| encode(record, field.name)))
		.collect();
	Node::composite(name, children)
}

/// Decode a record by default-constructing it and assigning each child to its field.
///
/// Fields absent from the document keep their constructed value. Nodes naming a
/// read-only field are skipped; nodes naming no field follow
/// [`DecodeOptions::unknown_fields`](crate::marshal::DecodeOptions::unknown_fields).
pub fn decode_record<T: Record>(node: &Node, cx: &mut DecodeContext<'_>) -> Result<T> {
	// Entry points reject the type during classification; this covers direct calls.
	let construct = T::constructor().ok_or_else(|| unsupported_record(T::type_name()))?;
	let children = composite_children(node, cx, T::type_name())?;

	let fields = T::fields();
	let mut record = construct();
	for child in children {
		let Some(field) = fields.iter().find(|field| field.name == child.name()) else {
			match cx.options().unknown_fields {
				UnknownFieldPolicy::Error => {
					return Err(MarshalError::MissingFieldMapping {
						path: cx.path_with(child.name()),
						type_name: T::type_name().to_owned(),
						field: child.name().to_owned(),
					});
				}
				UnknownFieldPolicy::Skip => {
					tracing::trace!(path = %cx.path_with(child.name()), "skipping node with no matching field");
					continue;
				}
			}
		};

		match &field.access {
			Some((_, decode)) => decode(&mut record, child, cx)?,
			None => tracing::trace!(path = %cx.path_with(child.name()), "skipping read-only field"),
		}
	}

	Ok(record)
}

/// Register a `Default` struct as a [`Record`] and implement [`Marshal`] for it.
///
/// Fields are listed by identifier; `field as "Name"` sets the node name explicitly.
///
/// ```
/// use objdoc::marshal_record;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Person {
/// 	name: String,
/// 	age: u32,
/// }
///
/// marshal_record!(Person { name as "Name", age as "Age" });
/// ```
#[macro_export]
macro_rules! marshal_record {
	($ty:ident { $($field:ident $(as $rename:literal)?),* $(,)? }) => {
		impl $crate::marshal::Record for $ty {
			fn type_name() -> &'static str {
				stringify!($ty)
			}

			fn constructor() -> ::core::option::Option<fn() -> Self> {
				::core::option::Option::Some(<$ty as ::core::default::Default>::default)
			}

			fn fields() -> ::std::vec::Vec<$crate::marshal::Field<Self>> {
				::std::vec![
					$(
						$crate::marshal::Field::writable(
							$crate::__marshal_field_name!($field $(, $rename)?),
							|this: &Self| &this.$field,
							|this: &mut Self, value| this.$field = value,
						),
					)*
				]
			}
		}

		impl $crate::marshal::Marshal for $ty {
			fn descriptor() -> $crate::marshal::TypeDescriptor {
				$crate::marshal::record_descriptor::<Self>()
			}

			fn encode(&self, name: &str) -> $crate::marshal::Node {
				$crate::marshal::encode_record(self, name)
			}

			fn decode(node: &$crate::marshal::Node, cx: &mut $crate::marshal::DecodeContext<'_>) -> $crate::marshal::Result<Self> {
				$crate::marshal::decode_record(node, cx)
			}
		}
	};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __marshal_field_name {
	($field:ident) => {
		stringify!($field)
	};
	($field:ident, $rename:literal) => {
		$rename
	};
}

#[cfg(test)]
mod tests;

use std::borrow::Cow;

use crate::marshal::codec::leaf_text;
use crate::marshal::{DecodeContext, MarshalError, Node, Result, Shape, TypeDescriptor};

/// A unit-only enum encoded by its symbolic member name.
pub trait SymbolicEnum: Sized + 'static {
	/// Declared type name.
	const TYPE_NAME: &'static str;
	/// Member names in declaration order.
	const MEMBERS: &'static [&'static str];

	/// Member name of `self`.
	fn symbol(&self) -> &'static str;

	/// Member with exactly this name.
	fn from_symbol(symbol: &str) -> Option<Self>;
}

/// Build the descriptor of a symbolic enum.
pub fn enum_descriptor<T: SymbolicEnum>() -> TypeDescriptor {
	TypeDescriptor {
		type_name: Cow::Borrowed(T::TYPE_NAME),
		shape: Shape::Enum(T::MEMBERS),
	}
}

/// Encode an enum member as a leaf holding its name.
pub fn encode_enum<T: SymbolicEnum>(value: &T, name: &str) -> Node {
	Node::leaf(name, value.symbol())
}

/// Decode an enum member by exact name match.
pub fn decode_enum<T: SymbolicEnum>(node: &Node, cx: &mut DecodeContext<'_>) -> Result<T> {
	let text = leaf_text(node, cx, T::TYPE_NAME)?.unwrap_or_default();
	T::from_symbol(text).ok_or_else(|| MarshalError::UnknownEnumValue {
		path: cx.path(),
		expected: T::TYPE_NAME.to_owned(),
		text: text.to_owned(),
	})
}

/// Register a unit-only enum as a [`SymbolicEnum`] and implement
/// [`Marshal`](crate::marshal::Marshal) for it.
///
/// ```
/// use objdoc::marshal_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level {
/// 	Low,
/// 	High,
/// }
///
/// marshal_enum!(Level { Low, High });
/// ```
#[macro_export]
macro_rules! marshal_enum {
	($ty:ident { $($variant:ident),+ $(,)? }) => {
		impl $crate::marshal::SymbolicEnum for $ty {
			const TYPE_NAME: &'static str = stringify!($ty);
			const MEMBERS: &'static [&'static str] = &[$(stringify!($variant)),+];

			fn symbol(&self) -> &'static str {
				match self {
					$(Self::$variant => stringify!($variant),)+
				}
			}

			fn from_symbol(symbol: &str) -> ::core::option::Option<Self> {
				match symbol {
					$(stringify!($variant) => ::core::option::Option::Some(Self::$variant),)+
					_ => ::core::option::Option::None,
				}
			}
		}

		impl $crate::marshal::Marshal for $ty {
			fn descriptor() -> $crate::marshal::TypeDescriptor {
				$crate::marshal::enum_descriptor::<Self>()
			}

			fn encode(&self, name: &str) -> $crate::marshal::Node {
				$crate::marshal::encode_enum(self, name)
			}

			fn decode(node: &$crate::marshal::Node, cx: &mut $crate::marshal::DecodeContext<'_>) -> $crate::marshal::Result<Self> {
				$crate::marshal::decode_enum(node, cx)
			}
		}
	};
}

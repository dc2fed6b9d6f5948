use std::str::FromStr;

use rust_decimal::Decimal;

use crate::marshal::ScalarKind;

/// Canonical, locale-invariant text form of a simple type.
///
/// `to_text` and `from_text` must round-trip: `from_text(&v.to_text()) == Some(v)` for
/// every finite value.
pub trait Scalar: Sized {
	/// Scalar flavor reported by classification.
	const KIND: ScalarKind;
	/// Declared type name used in diagnostics.
	const TYPE_NAME: &'static str;

	/// Render the canonical text form.
	fn to_text(&self) -> String;

	/// Parse text produced by [`Scalar::to_text`]; `None` when malformed.
	fn from_text(text: &str) -> Option<Self>;
}

macro_rules! impl_numeric_scalar {
	($kind:ident: $($ty:ty),+ $(,)?) => {
		$(
			impl Scalar for $ty {
				const KIND: ScalarKind = ScalarKind::$kind;
				const TYPE_NAME: &'static str = stringify!($ty);

				fn to_text(&self) -> String {
					self.to_string()
				}

				fn from_text(text: &str) -> Option<Self> {
					text.trim().parse().ok()
				}
			}
		)+
	};
}

impl_numeric_scalar!(Int: i8, i16, i32, i64, i128, isize);
impl_numeric_scalar!(UInt: u8, u16, u32, u64, u128, usize);
// `Display` for floats is the shortest form that parses back to the same bits and never
// groups digits or switches to an exponent.
impl_numeric_scalar!(Float: f32, f64);

impl Scalar for bool {
	const KIND: ScalarKind = ScalarKind::Bool;
	const TYPE_NAME: &'static str = "bool";

	fn to_text(&self) -> String {
		if *self { "True".to_owned() } else { "False".to_owned() }
	}

	fn from_text(text: &str) -> Option<Self> {
		let text = text.trim();
		if text.eq_ignore_ascii_case("true") {
			Some(true)
		} else if text.eq_ignore_ascii_case("false") {
			Some(false)
		} else {
			None
		}
	}
}

impl Scalar for char {
	const KIND: ScalarKind = ScalarKind::Char;
	const TYPE_NAME: &'static str = "char";

	fn to_text(&self) -> String {
		self.to_string()
	}

	fn from_text(text: &str) -> Option<Self> {
		let mut chars = text.chars();
		let first = chars.next()?;
		chars.next().is_none().then_some(first)
	}
}

impl Scalar for String {
	const KIND: ScalarKind = ScalarKind::String;
	const TYPE_NAME: &'static str = "String";

	fn to_text(&self) -> String {
		self.clone()
	}

	fn from_text(text: &str) -> Option<Self> {
		Some(text.to_owned())
	}
}

impl Scalar for Decimal {
	const KIND: ScalarKind = ScalarKind::Decimal;
	const TYPE_NAME: &'static str = "Decimal";

	fn to_text(&self) -> String {
		self.to_string()
	}

	fn from_text(text: &str) -> Option<Self> {
		let text = text.trim();
		Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)).ok()
	}
}

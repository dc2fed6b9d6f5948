mod category;
mod codec;
mod compression;
mod decode;
mod document;
mod encode;
mod enums;
mod error;
mod node;
mod record;
mod scalar;
mod xml;

/// Type descriptors and the classification cascade.
pub use category::{Category, FieldInfo, ScalarKind, Shape, TypeDescriptor, classify, classify_reachable, item_name};
/// Core marshalling trait and collection node names.
pub use codec::{ELEMENT_PREFIX, KEY_NAME, Marshal, VALUE_NAME};
/// Compression detection and (de)compression helpers.
pub use compression::{Compression, decode_bytes, encode_bytes};
/// Decode context, options, and top-level decode entry points.
pub use decode::{DecodeContext, DecodeItems, DecodeOptions, DuplicateKeyPolicy, UnknownFieldPolicy, decode_first, decode_items, decode_keyed, decode_value};
/// File-backed documents and the save/load convenience functions.
pub use document::{Document, DocumentStats, SaveOptions, load_first, load_items, load_keyed, save_items, save_one};
/// Top-level encode entry points.
pub use encode::{ROOT_NAME, encode_items, encode_one, encode_value};
/// Symbolic enum registration.
pub use enums::{SymbolicEnum, decode_enum, encode_enum, enum_descriptor};
/// Error and result aliases.
pub use error::{MarshalError, Result};
/// Document tree model.
pub use node::{Body, Node};
/// Record registration and typed field accessors.
pub use record::{Field, Record, decode_record, encode_record, record_descriptor};
/// Canonical scalar text forms.
pub use scalar::Scalar;
/// XML text syntax for document trees.
pub use xml::{WriteOptions, from_xml_str, is_element_name, to_xml_string};

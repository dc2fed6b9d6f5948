use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MarshalError>;

/// Errors produced while marshalling values, reading documents, and writing documents.
#[derive(Debug, Error)]
pub enum MarshalError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// XML text could not be read or written.
	#[error("xml error at byte {position}: {message}")]
	Xml {
		/// Reader or writer message.
		message: String,
		/// Byte offset reported by the reader (0 for write failures).
		position: u64,
	},
	/// Document bytes were not valid UTF-8.
	#[error("document is not valid utf-8: {0}")]
	InvalidUtf8(#[from] std::string::FromUtf8Error),
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// A node would hold both text and child nodes.
	#[error("mixed content in node {name}: a node holds either text or children")]
	MixedContent {
		/// Offending node name.
		name: String,
	},
	/// A node name cannot be written as an XML element name.
	#[error("node name {name:?} is not a valid XML element name")]
	InvalidName {
		/// Offending node name.
		name: String,
	},
	/// Leaf text could not be parsed as the target scalar type.
	#[error("format error at {path}: cannot parse {text:?} as {expected}")]
	Format {
		/// Node path of the offending leaf.
		path: String,
		/// Target type name.
		expected: String,
		/// Literal text that failed to parse.
		text: String,
	},
	/// Leaf text names no member of the target enum.
	#[error("unknown enum value at {path}: {text:?} is not a member of {expected}")]
	UnknownEnumValue {
		/// Node path of the offending leaf.
		path: String,
		/// Target enum type name.
		expected: String,
		/// Literal member name that failed to match.
		text: String,
	},
	/// Target type cannot take part in marshalling.
	#[error("unsupported type {type_name}: {reason}")]
	UnsupportedType {
		/// Offending type name.
		type_name: String,
		/// Why the type was rejected.
		reason: &'static str,
	},
	/// A document child names no writable field on the target record.
	#[error("missing field mapping at {path}: {type_name} has no field named {field}")]
	MissingFieldMapping {
		/// Node path of the unmatched child.
		path: String,
		/// Target record type name.
		type_name: String,
		/// Unmatched child node name.
		field: String,
	},
	/// A decoded dictionary would contain two equal keys.
	#[error("duplicate key at {path}: {key} already present in {expected}")]
	DuplicateKey {
		/// Node path of the offending entry.
		path: String,
		/// Target mapping type name.
		expected: String,
		/// Rendered key node (leaf text or node path).
		key: String,
	},
	/// A dictionary entry lacks its `Key` or `Value` child.
	#[error("dictionary entry at {path} has no {part} node")]
	MissingEntryPart {
		/// Node path of the entry node.
		path: String,
		/// Missing part name.
		part: &'static str,
	},
	/// Node body does not fit the target category.
	#[error("shape mismatch at {path}: {expected} cannot be decoded from {found}")]
	ShapeMismatch {
		/// Node path of the offending node.
		path: String,
		/// Target type name.
		expected: String,
		/// Body kind that was found.
		found: &'static str,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded at {path} (max={max_depth})")]
	DepthExceeded {
		/// Node path where the limit was hit.
		path: String,
		/// Configured depth ceiling.
		max_depth: u32,
	},
}

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::marshal::{Marshal, MarshalError, Node, Result, classify_reachable};

/// What the decoder does with a child node that matches no record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
	/// Fail with [`MarshalError::MissingFieldMapping`].
	#[default]
	Error,
	/// Ignore the node.
	Skip,
}

/// What the decoder does when a dictionary key appears twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
	/// Fail with [`MarshalError::DuplicateKey`].
	#[default]
	Error,
	/// Keep the later entry.
	LastWins,
}

/// Runtime limits and behavior switches for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Handling of document nodes with no matching record field.
	pub unknown_fields: UnknownFieldPolicy,
	/// Handling of repeated dictionary keys.
	pub duplicate_keys: DuplicateKeyPolicy,
	/// Maximum node nesting depth below the document root; defaults to 256.
	///
	/// Decoding recurses once per nesting level, so documents deeper than this fail with
	/// [`MarshalError::DepthExceeded`] instead of exhausting the stack. Raise it for
	/// legitimately deep object graphs.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			unknown_fields: UnknownFieldPolicy::Error,
			duplicate_keys: DuplicateKeyPolicy::Error,
			max_depth: 256,
		}
	}
}

impl DecodeOptions {
	/// Preset that tolerates documents written by a newer or looser producer.
	pub fn lenient() -> Self {
		Self {
			unknown_fields: UnknownFieldPolicy::Skip,
			duplicate_keys: DuplicateKeyPolicy::LastWins,
			..Self::default()
		}
	}
}

/// Per-call decode state: options plus the path of node names being visited.
///
/// The path is used for depth limiting and error reporting only. A context never outlives
/// the decode call that created it.
pub struct DecodeContext<'a> {
	options: &'a DecodeOptions,
	path: Vec<String>,
}

impl<'a> DecodeContext<'a> {
	/// Create a context positioned at a node named `root`.
	pub fn new(options: &'a DecodeOptions, root: &str) -> Self {
		Self {
			options,
			path: vec![root.to_owned()],
		}
	}

	/// Active decode options.
	pub fn options(&self) -> &'a DecodeOptions {
		self.options
	}

	/// Slash-joined path of the node currently being decoded.
	pub fn path(&self) -> String {
		self.path.join("/")
	}

	/// Path of a direct child of the current node.
	pub fn path_with(&self, child: &str) -> String {
		let mut path = self.path();
		path.push('/');
		path.push_str(child);
		path
	}

	/// Current depth below the context root.
	pub fn depth(&self) -> u32 {
		u32::try_from(self.path.len().saturating_sub(1)).unwrap_or(u32::MAX)
	}

	/// Run `f` positioned at `node`, a direct child of the current node.
	pub fn descend<R>(&mut self, node: &Node, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
		if self.depth() >= self.options.max_depth {
			return Err(MarshalError::DepthExceeded {
				path: self.path_with(node.name()),
				max_depth: self.options.max_depth,
			});
		}
		self.path.push(node.name().to_owned());
		let out = f(self);
		self.path.pop();
		out
	}

	/// Decode a direct child of the current node as `T`.
	pub fn decode_child<T: Marshal>(&mut self, node: &Node) -> Result<T> {
		self.descend(node, |cx| T::decode(node, cx))
	}

	/// Locate the `Key` or `Value` part of a dictionary entry.
	pub(crate) fn entry_part<'n>(&self, entry: &'n Node, part: &'static str) -> Result<&'n Node> {
		entry.child(part).ok_or_else(|| MarshalError::MissingEntryPart {
			path: self.path_with(entry.name()),
			part,
		})
	}

	/// Build a format error for the current node.
	pub fn format_error(&self, expected: &str, text: &str) -> MarshalError {
		MarshalError::Format {
			path: self.path(),
			expected: expected.to_owned(),
			text: text.to_owned(),
		}
	}

	/// Build a shape mismatch error for the current node.
	pub fn shape_mismatch(&self, node: &Node, expected: &str) -> MarshalError {
		MarshalError::ShapeMismatch {
			path: self.path(),
			expected: expected.to_owned(),
			found: node.kind_label(),
		}
	}
}

/// Decode a single node as `T`.
///
/// `T` is classified before the node is read.
pub fn decode_value<T: Marshal>(node: &Node, options: &DecodeOptions) -> Result<T> {
	classify_reachable(&T::descriptor())?;
	let mut cx = DecodeContext::new(options, node.name());
	T::decode(node, &mut cx)
}

/// Lazy, one-shot iterator decoding the items under a document root.
///
/// Items are produced in document order. The first error is returned as an item; callers
/// that collect into `Result<Vec<T>>` stop there. A type that fails classification yields
/// that error once and then ends, without visiting any node.
pub struct DecodeItems<'a, T> {
	rejected: Option<MarshalError>,
	items: std::slice::Iter<'a, Node>,
	cx: DecodeContext<'a>,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Marshal> Iterator for DecodeItems<'_, T> {
	type Item = Result<T>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(err) = self.rejected.take() {
			return Some(Err(err));
		}
		let node = self.items.next()?;
		Some(self.cx.decode_child::<T>(node))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if self.rejected.is_some() {
			return (1, Some(1));
		}
		self.items.size_hint()
	}
}

/// Decode every child of `root` as `T`, lazily and in document order.
pub fn decode_items<'a, T: Marshal>(root: &'a Node, options: &'a DecodeOptions) -> DecodeItems<'a, T> {
	let descriptor = T::descriptor();
	let (rejected, items) = match classify_reachable(&descriptor) {
		Ok(category) => {
			tracing::debug!(
				root = root.name(),
				type_name = %descriptor.type_name,
				category = category.label(),
				items = root.children().len(),
				"decoding document items"
			);
			(None, root.children().iter())
		}
		Err(err) => (Some(err), Default::default()),
	};
	DecodeItems {
		rejected,
		items,
		cx: DecodeContext::new(options, root.name()),
		_marker: PhantomData,
	}
}

/// Decode only the first child of `root`, or `None` for a document without items.
pub fn decode_first<T: Marshal>(root: &Node, options: &DecodeOptions) -> Result<Option<T>> {
	decode_items::<T>(root, options).next().transpose()
}

/// Decode every child of `root` and index the results by `key_of`.
///
/// Later items replace earlier ones with the same key.
pub fn decode_keyed<T, K, F>(root: &Node, options: &DecodeOptions, mut key_of: F) -> Result<HashMap<K, T>>
where
	T: Marshal,
	K: Eq + Hash,
	F: FnMut(&T) -> K,
{
	let mut out = HashMap::with_capacity(root.children().len());
	for item in decode_items::<T>(root, options) {
		let item = item?;
		out.insert(key_of(&item), item);
	}
	Ok(out)
}

#[cfg(test)]
mod tests;

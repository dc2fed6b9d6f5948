use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::hash::Hash;
use std::path::Path;

use crate::marshal::{
	Body, Compression, DecodeItems, DecodeOptions, Marshal, Node, Result, WriteOptions, decode_bytes, decode_first, decode_items, decode_keyed, encode_bytes, encode_items,
	from_xml_str, to_xml_string,
};

/// Output settings for [`Document::save`].
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
	/// XML layout.
	pub write: WriteOptions,
	/// Compression applied to the XML text.
	pub compression: Compression,
}

impl SaveOptions {
	/// Preset for compact, zstd-compressed output.
	pub fn compressed() -> Self {
		Self {
			write: WriteOptions::compact(),
			compression: Compression::Zstd,
		}
	}
}

/// A parsed document tree together with how it was stored.
#[derive(Debug, Clone)]
pub struct Document {
	/// Compression detected on open, or requested for new documents.
	pub compression: Compression,
	root: Node,
}

impl Document {
	/// Read, decompress, and parse a document file.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read(path)?;
		let (compression, bytes) = decode_bytes(raw)?;
		let text = String::from_utf8(bytes)?;
		let root = from_xml_str(&text)?;
		tracing::debug!(path = %path.display(), compression = compression.as_str(), items = root.children().len(), "opened document");
		Ok(Self { compression, root })
	}

	/// Parse uncompressed XML text.
	pub fn parse(text: &str) -> Result<Self> {
		Ok(Self::from_root(from_xml_str(text)?))
	}

	/// Wrap an existing root node.
	pub fn from_root(root: Node) -> Self {
		Self {
			compression: Compression::None,
			root,
		}
	}

	/// Encode `items` into a new document.
	pub fn from_items<'a, T, I>(items: I) -> Result<Self>
	where
		T: Marshal + 'a,
		I: IntoIterator<Item = &'a T>,
	{
		Ok(Self::from_root(encode_items(items)?))
	}

	/// Root node.
	pub fn root(&self) -> &Node {
		&self.root
	}

	/// Consume the document, returning its root node.
	pub fn into_root(self) -> Node {
		self.root
	}

	/// Render the document as XML text.
	pub fn to_xml(&self, options: &WriteOptions) -> Result<String> {
		to_xml_string(&self.root, options)
	}

	/// Write the document to `path`, replacing any existing file.
	pub fn save(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
		let path = path.as_ref();
		let text = self.to_xml(&options.write)?;
		let bytes = encode_bytes(text.into_bytes(), options.compression)?;
		fs::write(path, &bytes)?;
		tracing::debug!(path = %path.display(), compression = options.compression.as_str(), bytes = bytes.len(), "saved document");
		Ok(())
	}

	/// Decode the root's items as `T`, lazily and in document order.
	pub fn items<'a, T: Marshal>(&'a self, options: &'a DecodeOptions) -> DecodeItems<'a, T> {
		decode_items(&self.root, options)
	}

	/// Decode the first item, if any.
	pub fn first<T: Marshal>(&self, options: &DecodeOptions) -> Result<Option<T>> {
		decode_first(&self.root, options)
	}

	/// Decode every item and index it by `key_of`; later items win.
	pub fn keyed<T, K, F>(&self, options: &DecodeOptions, key_of: F) -> Result<HashMap<K, T>>
	where
		T: Marshal,
		K: Eq + Hash,
		F: FnMut(&T) -> K,
	{
		decode_keyed(&self.root, options, key_of)
	}

	/// Summarize the shape of the document tree in one pass.
	pub fn stats(&self) -> DocumentStats {
		let mut stats = DocumentStats {
			item_count: self.root.children().len(),
			node_count: 0,
			leaf_count: 0,
			empty_count: 0,
			max_depth: 0,
			item_names: BTreeMap::new(),
		};
		self.root.walk(|node, depth| {
			stats.node_count += 1;
			stats.max_depth = stats.max_depth.max(depth);
			match node.body() {
				Body::Empty => stats.empty_count += 1,
				Body::Text(_) => stats.leaf_count += 1,
				Body::Children(_) => {}
			}
			if depth == 2 {
				*stats.item_names.entry(node.name().to_owned()).or_insert(0) += 1;
			}
		});
		stats
	}
}

/// Shape summary of a document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
	/// Direct children of the root.
	pub item_count: usize,
	/// All nodes including the root.
	pub node_count: usize,
	/// Text leaves.
	pub leaf_count: usize,
	/// Empty (null) nodes.
	pub empty_count: usize,
	/// Tree height; a lone root has depth 1.
	pub max_depth: usize,
	/// Item counts per item node name.
	pub item_names: BTreeMap<String, usize>,
}

/// Encode `items` and write them to `path` as indented, uncompressed XML.
pub fn save_items<T: Marshal>(path: impl AsRef<Path>, items: &[T]) -> Result<()> {
	Document::from_items(items)?.save(path, &SaveOptions::default())
}

/// Encode a single item and write it to `path`.
pub fn save_one<T: Marshal>(path: impl AsRef<Path>, item: &T) -> Result<()> {
	save_items(path, std::slice::from_ref(item))
}

/// Read `path` and decode every item as `T`.
pub fn load_items<T: Marshal>(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Vec<T>> {
	Document::open(path)?.items(options).collect()
}

/// Read `path` and decode only its first item.
pub fn load_first<T: Marshal>(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Option<T>> {
	Document::open(path)?.first(options)
}

/// Read `path` and index its items by `key_of`; later items win.
pub fn load_keyed<T, K, F>(path: impl AsRef<Path>, options: &DecodeOptions, key_of: F) -> Result<HashMap<K, T>>
where
	T: Marshal,
	K: Eq + Hash,
	F: FnMut(&T) -> K,
{
	Document::open(path)?.keyed(options, key_of)
}

#[cfg(test)]
mod tests;

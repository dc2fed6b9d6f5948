use crate::marshal::{Marshal, Node, Result, classify_reachable, item_name};

/// Name of the document root node.
pub const ROOT_NAME: &str = "root";

/// Encode one value into a node named `name`.
pub fn encode_value<T: Marshal>(value: &T, name: &str) -> Node {
	value.encode(name)
}

/// Encode a homogeneous sequence as a document root.
///
/// `T` is classified before any item is encoded, so a type the decoder would reject is
/// rejected here too. Each item becomes a child of `root` named by [`item_name`], and item
/// identity on decode relies on document order alone.
pub fn encode_items<'a, T, I>(items: I) -> Result<Node>
where
	T: Marshal + 'a,
	I: IntoIterator<Item = &'a T>,
{
	let descriptor = T::descriptor();
	let category = classify_reachable(&descriptor)?;
	let name = item_name(&descriptor);
	let children: Vec<Node> = items.into_iter().map(|item| item.encode(&name)).collect();
	tracing::debug!(
		type_name = %descriptor.type_name,
		category = category.label(),
		items = children.len(),
		"encoded document items"
	);
	Ok(Node::composite(ROOT_NAME, children))
}

/// Encode a single value as a one-item document root.
pub fn encode_one<T: Marshal>(item: &T) -> Result<Node> {
	encode_items(std::iter::once(item))
}

use crate::marshal::{MarshalError, Result};

/// One named node of a document tree.
///
/// A node is exactly one of: empty (null marker), a text leaf, or a composite with at least
/// one child. A composite built from zero children collapses to empty, so the two are never
/// distinguishable in memory or in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	name: String,
	body: Body,
}

/// Content held by a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
	/// No text and no children; represents null or absence.
	Empty,
	/// Text leaf. Zero-length text is still a leaf, distinct from [`Body::Empty`].
	Text(String),
	/// Non-empty ordered child list.
	Children(Vec<Node>),
}

impl Node {
	/// Create an empty node.
	pub fn empty(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			body: Body::Empty,
		}
	}

	/// Create a text leaf.
	pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			body: Body::Text(text.into()),
		}
	}

	/// Create a composite node; an empty child list yields an empty node.
	pub fn composite(name: impl Into<String>, children: Vec<Node>) -> Self {
		let body = if children.is_empty() { Body::Empty } else { Body::Children(children) };
		Self { name: name.into(), body }
	}

	/// Node name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Node body.
	pub fn body(&self) -> &Body {
		&self.body
	}

	/// Leaf text, if this node is a leaf.
	pub fn text(&self) -> Option<&str> {
		match &self.body {
			Body::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Child nodes in document order; empty for leaves and empty nodes.
	pub fn children(&self) -> &[Node] {
		match &self.body {
			Body::Children(children) => children,
			_ => &[],
		}
	}

	/// First child with the given name.
	pub fn child(&self, name: &str) -> Option<&Node> {
		self.children().iter().find(|child| child.name == name)
	}

	/// Whether the node carries neither text nor children.
	pub fn is_empty(&self) -> bool {
		matches!(self.body, Body::Empty)
	}

	/// Whether the node is a text leaf.
	pub fn is_leaf(&self) -> bool {
		matches!(self.body, Body::Text(_))
	}

	/// Whether the node has at least one child.
	pub fn is_composite(&self) -> bool {
		matches!(self.body, Body::Children(_))
	}

	/// Short label for the body kind, used in diagnostics.
	pub fn kind_label(&self) -> &'static str {
		match self.body {
			Body::Empty => "empty node",
			Body::Text(_) => "text leaf",
			Body::Children(_) => "composite node",
		}
	}

	/// Append a child, turning an empty node into a composite.
	pub fn push(&mut self, child: Node) -> Result<()> {
		match &mut self.body {
			Body::Empty => {
				self.body = Body::Children(vec![child]);
				Ok(())
			}
			Body::Children(children) => {
				children.push(child);
				Ok(())
			}
			Body::Text(_) => Err(MarshalError::MixedContent { name: self.name.clone() }),
		}
	}

	/// Set leaf text, turning an empty node into a leaf.
	pub fn set_text(&mut self, text: impl Into<String>) -> Result<()> {
		if self.is_composite() {
			return Err(MarshalError::MixedContent { name: self.name.clone() });
		}
		self.body = Body::Text(text.into());
		Ok(())
	}

	/// Consume the node, returning its children.
	pub fn into_children(mut self) -> Vec<Node> {
		match std::mem::replace(&mut self.body, Body::Empty) {
			Body::Children(children) => children,
			_ => Vec::new(),
		}
	}

	/// Visit every node of this subtree in pre-order along with its depth, `self` at 1.
	///
	/// Uses an explicit stack, so arbitrarily deep trees are safe to walk.
	pub fn walk(&self, mut visit: impl FnMut(&Node, usize)) {
		let mut stack = vec![(self, 1)];
		while let Some((node, depth)) = stack.pop() {
			visit(node, depth);
			stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
		}
	}

	/// Number of nodes in this subtree, including `self`.
	pub fn count_nodes(&self) -> usize {
		let mut count = 0;
		self.walk(|_, _| count += 1);
		count
	}

	/// Height of this subtree; a node without children has depth 1.
	pub fn depth(&self) -> usize {
		let mut deepest = 0;
		self.walk(|_, depth| deepest = deepest.max(depth));
		deepest
	}
}

// Children are detached onto a heap stack so dropping a deep tree does not recurse.
impl Drop for Node {
	fn drop(&mut self) {
		let Body::Children(children) = &mut self.body else {
			return;
		};
		let mut stack = std::mem::take(children);
		while let Some(mut node) = stack.pop() {
			if let Body::Children(children) = &mut node.body {
				stack.append(children);
			}
		}
	}
}

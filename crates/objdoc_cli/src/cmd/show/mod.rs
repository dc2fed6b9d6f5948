use std::path::PathBuf;

use objdoc::marshal::{Body, Document, Node, Result};

use crate::cmd::util::{emit_json, truncate_text};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<usize>,
	#[arg(long = "max-children")]
	pub max_children: Option<usize>,
	#[arg(long = "max-text")]
	pub max_text: Option<usize>,
}

/// Output truncation limits for printed trees.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Nodes deeper than this are summarized instead of printed.
	pub max_depth: usize,
	/// Maximum number of children printed per node.
	pub max_children: usize,
	/// Maximum number of Unicode scalar values printed for leaf text.
	pub max_text: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_depth: 16,
			max_children: 64,
			max_text: 200,
		}
	}
}

/// Print a document tree as indented text or JSON.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		max_depth,
		max_children,
		max_text,
	} = args;

	let defaults = PrintOptions::default();
	let options = PrintOptions {
		max_depth: max_depth.unwrap_or(defaults.max_depth),
		max_children: max_children.unwrap_or(defaults.max_children),
		max_text: max_text.unwrap_or(defaults.max_text),
	};

	let document = Document::open(&path)?;
	if json {
		emit_json(&ShowJson {
			path: path.display().to_string(),
			compression: document.compression.as_str(),
			root: node_json(document.root(), &options, 1),
		});
		return Ok(());
	}

	let mut out = String::new();
	render_tree(document.root(), &options, 0, &mut out);
	print!("{out}");
	Ok(())
}

/// Append an indented rendering of `node` to `out`.
pub(crate) fn render_tree(node: &Node, options: &PrintOptions, level: usize, out: &mut String) {
	let indent = "  ".repeat(level);
	match node.body() {
		Body::Empty => out.push_str(&format!("{indent}{} = null\n", node.name())),
		Body::Text(text) => out.push_str(&format!("{indent}{} = {:?}\n", node.name(), truncate_text(text, options.max_text))),
		Body::Children(children) => {
			if level + 1 >= options.max_depth {
				out.push_str(&format!("{indent}{} {{ {} children }}\n", node.name(), children.len()));
				return;
			}
			out.push_str(&format!("{indent}{}\n", node.name()));
			for child in children.iter().take(options.max_children) {
				render_tree(child, options, level + 1, out);
			}
			if children.len() > options.max_children {
				out.push_str(&format!("{indent}  ... {} more\n", children.len() - options.max_children));
			}
		}
	}
}

fn node_json(node: &Node, options: &PrintOptions, depth: usize) -> NodeJson {
	let mut out = NodeJson {
		name: node.name().to_owned(),
		text: None,
		children: None,
		omitted: 0,
	};
	match node.body() {
		Body::Empty => {}
		Body::Text(text) => out.text = Some(truncate_text(text, options.max_text)),
		Body::Children(children) => {
			if depth >= options.max_depth {
				out.omitted = children.len();
				return out;
			}
			let shown = children.len().min(options.max_children);
			out.children = Some(children[..shown].iter().map(|child| node_json(child, options, depth + 1)).collect());
			out.omitted = children.len() - shown;
		}
	}
	out
}

#[derive(serde::Serialize)]
struct ShowJson {
	path: String,
	compression: &'static str,
	root: NodeJson,
}

#[derive(serde::Serialize)]
struct NodeJson {
	name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	text: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	children: Option<Vec<NodeJson>>,
	#[serde(skip_serializing_if = "is_zero")]
	omitted: usize,
}

fn is_zero(value: &usize) -> bool {
	*value == 0
}

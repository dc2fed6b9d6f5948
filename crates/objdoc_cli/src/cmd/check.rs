use std::path::PathBuf;

use objdoc::marshal::{Document, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Read and parse a document, failing on the first syntax or encoding error.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let document = Document::open(&path)?;
	let stats = document.stats();
	tracing::debug!(path = %path.display(), nodes = stats.node_count, "document parsed");

	if json {
		emit_json(&CheckJson {
			path: path.display().to_string(),
			status: "ok",
			item_count: stats.item_count,
			node_count: stats.node_count,
		});
		return Ok(());
	}

	println!("ok: {} ({} items, {} nodes)", path.display(), stats.item_count, stats.node_count);
	Ok(())
}

#[derive(serde::Serialize)]
struct CheckJson {
	path: String,
	status: &'static str,
	item_count: usize,
	node_count: usize,
}

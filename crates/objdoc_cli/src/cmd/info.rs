use std::path::PathBuf;

use objdoc::marshal::{Document, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print compression, root, and node statistics of a document.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let document = Document::open(&path)?;
	let stats = document.stats();

	let mut names: Vec<_> = stats.item_names.iter().collect();
	names.sort_by(|left, right| right.1.cmp(left.1).then_with(|| left.0.cmp(right.0)));

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			compression: document.compression.as_str(),
			root: document.root().name().to_owned(),
			item_count: stats.item_count,
			node_count: stats.node_count,
			leaf_count: stats.leaf_count,
			empty_count: stats.empty_count,
			max_depth: stats.max_depth,
			item_names: names
				.iter()
				.map(|(name, count)| NameCountJson {
					name: (*name).clone(),
					count: **count,
				})
				.collect(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", document.compression.as_str());
	println!("root: {}", document.root().name());
	println!("item_count: {}", stats.item_count);
	println!("node_count: {}", stats.node_count);
	println!("leaf_count: {}", stats.leaf_count);
	println!("empty_count: {}", stats.empty_count);
	println!("max_depth: {}", stats.max_depth);

	println!("item_names:");
	for (name, count) in names {
		println!("  {name}: {count}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	root: String,
	item_count: usize,
	node_count: usize,
	leaf_count: usize,
	empty_count: usize,
	max_depth: usize,
	item_names: Vec<NameCountJson>,
}

#[derive(serde::Serialize)]
struct NameCountJson {
	name: String,
	count: usize,
}

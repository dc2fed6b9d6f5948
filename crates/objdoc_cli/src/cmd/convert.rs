use std::path::PathBuf;

use objdoc::marshal::{Compression, Document, Result, SaveOptions, WriteOptions};

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum CompressionArg {
	None,
	Zstd,
}

impl From<CompressionArg> for Compression {
	fn from(value: CompressionArg) -> Self {
		match value {
			CompressionArg::None => Compression::None,
			CompressionArg::Zstd => Compression::Zstd,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	pub input: PathBuf,
	pub output: PathBuf,
	/// Output compression; defaults to the input's.
	#[arg(long, value_enum)]
	pub compression: Option<CompressionArg>,
	#[arg(long = "no-indent")]
	pub no_indent: bool,
	#[arg(long = "no-declaration")]
	pub no_declaration: bool,
}

/// Re-write a document with a different layout or compression.
pub fn run(args: Args) -> Result<()> {
	let Args {
		input,
		output,
		compression,
		no_indent,
		no_declaration,
	} = args;

	let document = Document::open(&input)?;
	let options = SaveOptions {
		write: WriteOptions {
			indent: if no_indent { None } else { WriteOptions::default().indent },
			declaration: !no_declaration,
		},
		compression: compression.map_or(document.compression, Compression::from),
	};
	document.save(&output, &options)?;

	println!(
		"converted: {} -> {} (compression: {})",
		input.display(),
		output.display(),
		options.compression.as_str()
	);
	Ok(())
}

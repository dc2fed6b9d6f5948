#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod cmd;

#[derive(Parser)]
#[command(name = "objdoc", about = "Object document inspection tools")]
struct Cli {
	/// Raise log verbosity (`-v` debug, `-vv` trace). `RUST_LOG` overrides.
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Show(cmd::show::Args),
	Check(cmd::check::Args),
	Convert(cmd::convert::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> objdoc::marshal::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Show(args) => cmd::show::run(args),
		Commands::Check(args) => cmd::check::run(args),
		Commands::Convert(args) => cmd::convert::run(args),
	}
}

fn init_logging(verbose: u8) {
	let fallback = match verbose {
		0 => "objdoc=warn",
		1 => "objdoc=debug,objdoc_cli=debug",
		_ => "objdoc=trace,objdoc_cli=trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
	fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

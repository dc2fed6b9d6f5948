use std::path::PathBuf;
use std::process::Command;
use std::sync::OnceLock;

use objdoc_testkit::{fixture_path as shared_fixture_path, run_json, target_dir as workspace_target_dir};

static OBJDOC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> String {
	shared_fixture_path(name).to_string_lossy().into_owned()
}

pub(crate) fn run_objdoc_json(args: &[&str]) -> serde_json::Value {
	run_json(objdoc_bin(), args)
}

fn objdoc_bin() -> &'static PathBuf {
	OBJDOC_BIN.get_or_init(resolve_objdoc_bin)
}

fn resolve_objdoc_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_objdoc") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let mut bin = workspace_target_dir().join("debug");
	bin.push(if cfg!(windows) { "objdoc.exe" } else { "objdoc" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "objdoc"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build objdoc binary at {}", bin.display());

	bin
}

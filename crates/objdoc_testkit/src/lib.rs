//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Unique, not-yet-existing file path under `<target>/objdoc-scratch`.
///
/// The directory is created on demand; files are left behind for inspection.
pub fn scratch_path(name: &str) -> PathBuf {
	let dir = target_dir().join("objdoc-scratch");
	std::fs::create_dir_all(&dir).expect("scratch directory is creatable");
	let serial = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
	dir.join(format!("{}-{serial}-{name}", std::process::id()))
}

/// Run a binary and return its raw output.
pub fn run(bin: &Path, args: &[&str]) -> Output {
	Command::new(bin).args(args).output().expect("command executes")
}

/// Run a binary that must succeed and parse its stdout as JSON.
pub fn run_json(bin: &Path, args: &[&str]) -> serde_json::Value {
	let output = run(bin, args);
	assert!(
		output.status.success(),
		"command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

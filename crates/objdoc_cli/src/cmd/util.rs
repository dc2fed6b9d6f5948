use serde::Serialize;

/// Print a JSON payload to stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json encode failed: {err}"),
	}
}

/// Truncate text to at most `max_chars` Unicode scalar values.
pub(crate) fn truncate_text(text: &str, max_chars: usize) -> String {
	let mut chars = text.chars();
	let mut out: String = chars.by_ref().take(max_chars).collect();
	if chars.next().is_some() {
		out.push_str("...");
	}
	out
}

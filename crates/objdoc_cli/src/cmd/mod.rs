/// Document validation command.
pub mod check;
/// Re-encode a document with different layout or compression.
pub mod convert;
/// File-level information command.
pub mod info;
/// Tree printing command.
pub mod show;
/// Shared CLI helpers.
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;

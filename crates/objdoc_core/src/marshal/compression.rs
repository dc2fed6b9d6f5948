use std::io::Read;

use crate::marshal::{MarshalError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;
const ZSTD_LEVEL: i32 = 3;
/// zstd frame magic used by compressed documents.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode of a stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
	/// Plain XML text.
	#[default]
	None,
	/// zstd-compressed XML text.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if raw.starts_with(&ZSTD_MAGIC) {
		let out = decode_zstd(&raw)?;
		return Ok((Compression::Zstd, out));
	}
	Ok((Compression::None, raw))
}

/// Apply `compression` to document bytes.
pub fn encode_bytes(bytes: Vec<u8>, compression: Compression) -> Result<Vec<u8>> {
	match compression {
		Compression::None => Ok(bytes),
		Compression::Zstd => Ok(zstd::stream::encode_all(bytes.as_slice(), ZSTD_LEVEL)?),
	}
}

fn decode_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf)?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(MarshalError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}

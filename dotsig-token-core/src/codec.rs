//! Payload codec: turns payload bytes into the URL-safe payload segment of a
//! token, compressing with zlib when that makes the segment shorter.

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

use crate::error::TokenError;
use crate::utils::{b64_decode, b64_encode};

/// Leading character of a payload segment whose bytes were compressed.
pub const COMPRESSION_MARKER: char = '.';

/// Largest payload a compressed segment may inflate to.
pub const MAX_DECOMPRESSED_LEN: usize = 16 * 1024 * 1024;

/// The encoded payload segment together with the compression decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub text: String,
    pub compressed: bool,
}

/// Encodes `payload` as base64url, zlib-compressing it first when the
/// compressed form is more than one byte shorter.
pub fn encode_payload(payload: &[u8]) -> EncodedPayload {
    let compressed = compress(payload)
        .ok()
        .filter(|candidate| candidate.len() + 1 < payload.len());

    match compressed {
        Some(bytes) => {
            let mut text = String::with_capacity(1 + bytes.len() * 4 / 3 + 4);
            text.push(COMPRESSION_MARKER);
            text.push_str(&b64_encode(&bytes));
            EncodedPayload {
                text,
                compressed: true,
            }
        }
        None => EncodedPayload {
            text: b64_encode(payload),
            compressed: false,
        },
    }
}

/// Reverses [`encode_payload`].
///
/// Only call this on authenticated text: the caller must have verified the
/// token signature first.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, TokenError> {
    match encoded.strip_prefix(COMPRESSION_MARKER) {
        Some(rest) => {
            let bytes = b64_decode(rest)?;
            decompress(&bytes)
        }
        None => b64_decode(encoded),
    }
}

/// Whether a payload segment carries the compression marker.
pub fn is_compressed(encoded: &str) -> bool {
    encoded.starts_with(COMPRESSION_MARKER)
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn decompress(data: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut decoder = ZlibDecoder::new(data).take(MAX_DECOMPRESSED_LEN as u64 + 1);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| TokenError::corrupt_payload(format!("zlib decompress: {e}")))?;
    if out.len() > MAX_DECOMPRESSED_LEN {
        return Err(TokenError::corrupt_payload(format!(
            "decompressed payload exceeds {MAX_DECOMPRESSED_LEN} bytes"
        )));
    }
    Ok(out)
}

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::TokenError;

/// base64url without padding on encode, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes bytes as unpadded base64url.
pub fn b64_encode(data: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(data)
}

/// Decodes base64url text, with or without trailing `=` padding.
pub fn b64_decode(text: &str) -> Result<Vec<u8>, TokenError> {
    Ok(URL_SAFE_LENIENT.decode(text)?)
}

/// Minimal big-endian encoding of `n`; zero encodes to no bytes at all.
pub fn int_to_bytes(n: u64) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    bytes[first..].to_vec()
}

/// Reads a big-endian unsigned integer of at most eight bytes.
pub fn bytes_to_int(bytes: &[u8]) -> Result<u64, TokenError> {
    if bytes.len() > 8 {
        return Err(TokenError::malformed(format!(
            "timestamp is {} bytes wide, at most 8 are allowed",
            bytes.len()
        )));
    }
    Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
}

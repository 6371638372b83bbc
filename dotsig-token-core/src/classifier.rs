//! Token classification utilities for analyzing token structure
//!
//! Classification works without a key and verifies nothing: it reports what a
//! token *claims* to be, for audit logging. Never use its output to make an
//! authorization decision.

use crate::codec::COMPRESSION_MARKER;
use crate::error::TokenError;
use crate::time::TokenTimeConfig;
use crate::utils::{b64_decode, bytes_to_int};
use std::fmt;

/// The apparent kind of a token, by segment count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    /// `payload.signature`
    Untimed,
    /// `payload.timestamp.signature`; carries the unverified timestamp
    Timed { signed_at: Option<i64> },
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Untimed => write!(f, "untimed"),
            TokenType::Timed {
                signed_at: Some(ts),
            } => write!(f, "timed(signed_at={ts})"),
            TokenType::Timed { signed_at: None } => write!(f, "timed(signed_at=invalid)"),
        }
    }
}

/// Complete classification of a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClassification {
    /// The apparent token kind
    pub token_type: TokenType,
    /// Whether the payload segment carries the compression marker
    pub compressed: bool,
    /// Length of the payload segment, marker excluded
    pub payload_len: usize,
    /// The signature bytes as hex, if the segment is valid base64url
    pub signature_hex: Option<String>,
}

impl fmt::Display for TokenClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} token, compressed={}, payload_len={}, signature={}",
            self.token_type,
            self.compressed,
            self.payload_len,
            self.signature_hex.as_deref().unwrap_or("<invalid>")
        )
    }
}

/// Classifies a token without verifying it.
///
/// With the default separator the compression marker is indistinguishable
/// from an empty payload segment, so a leading `.` is only read as the marker
/// when the segment after it holds a zlib stream or the token has four
/// segments. An empty payload never compresses, so `.x.y` is either a
/// compressed untimed token or an empty timed one.
///
/// # Arguments
/// * `token` - The token to classify
/// * `separator` - The segment separator the token was produced with
/// * `time_config` - Epoch used to interpret a timestamp segment
pub fn classify_token(
    token: &str,
    separator: char,
    time_config: &TokenTimeConfig,
) -> Result<TokenClassification, TokenError> {
    let mut segments: Vec<&str> = token.split(separator).collect();

    let compressed = if separator == COMPRESSION_MARKER {
        let marked = match segments.as_slice() {
            ["", _, _, _] => true,
            ["", candidate, _] => is_zlib_segment(candidate),
            _ => false,
        };
        if marked {
            segments.remove(0);
        }
        marked
    } else if let Some(rest) = segments[0].strip_prefix(COMPRESSION_MARKER) {
        segments[0] = rest;
        true
    } else {
        false
    };

    let (payload, timestamp, signature) = match segments.as_slice() {
        [payload, signature] => (*payload, None, *signature),
        [payload, timestamp, signature] => (*payload, Some(*timestamp), *signature),
        other => {
            return Err(TokenError::malformed(format!(
                "expected 2 or 3 segments, found {}",
                other.len()
            )));
        }
    };

    let token_type = match timestamp {
        None => TokenType::Untimed,
        Some(segment) => TokenType::Timed {
            signed_at: b64_decode(segment)
                .and_then(|bytes| bytes_to_int(&bytes))
                .and_then(|stored| time_config.from_token_timestamp(stored))
                .ok(),
        },
    };

    Ok(TokenClassification {
        token_type,
        compressed,
        payload_len: payload.len(),
        signature_hex: b64_decode(signature).ok().map(hex::encode),
    })
}

/// A zlib stream is at least 8 bytes and opens with a valid CMF/FLG pair.
/// Timestamps are at most 8 bytes and fail the header check.
fn is_zlib_segment(segment: &str) -> bool {
    let Ok(bytes) = b64_decode(segment) else {
        return false;
    };
    match bytes.as_slice() {
        [cmf, flg, ..] if bytes.len() >= 8 => {
            cmf & 0x0f == 8 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0
        }
        _ => false,
    }
}

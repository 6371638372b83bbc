//! # Dotsig Token Core
//!
//! Core utilities and types shared across dotsig token implementations.
//!
//! This crate provides common functionality used by both untimed URL-safe
//! tokens and timed tokens, including:
//!
//! - Key derivation from a secret and a salt
//! - HMAC signing and constant-time verification
//! - The payload codec (base64url with optional zlib compression)
//! - Signer and time configuration
//! - Common error types
//! - Token classification for audit logging
//!
//! ## Wire format
//!
//! ```text
//! untimed:  [.]<b64(payload)>.<b64(signature)>
//! timed:    [.]<b64(payload)>.<b64(timestamp)>.<b64(signature)>
//! ```
//!
//! The leading `.` marks a compressed payload. Each signature covers every
//! segment before it.

pub mod algorithm;
pub mod classifier;
pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod serializer;
pub mod signer;
pub mod time;
pub mod utils;

pub use algorithm::{DigestMethod, HmacSigner};
pub use classifier::{TokenClassification, TokenType, classify_token};
pub use codec::{
    COMPRESSION_MARKER, EncodedPayload, MAX_DECOMPRESSED_LEN, decode_payload, encode_payload,
};
pub use config::{DEFAULT_SALT, DEFAULT_SEPARATOR, SignerConfig};
pub use error::TokenError;
pub use key::{DerivedKey, KeyDerivation, derive_key};
pub use serializer::{JsonSerializer, PayloadSerializer};
pub use signer::SigningKey;
pub use time::{LEGACY_EPOCH, TokenTimeConfig, unix_now};
pub use utils::{b64_decode, b64_encode};

//! # Dotsig Timed Token
//!
//! URL-safe signed tokens that embed their creation time, for password reset
//! links, email confirmations and other values that must go stale.
//!
//! ## Token layout
//!
//! ```text
//! [.]<b64(payload)>.<b64(timestamp)>.<b64(signature)>
//! ```
//!
//! The timestamp is a minimal big-endian integer counting seconds since the
//! configured epoch. The signature covers the payload and timestamp segments,
//! so neither can be changed without the secret.
//!
//! ## Expiry
//!
//! A verifier configured with `max_age` accepts a token whose age is at most
//! `max_age` seconds; one second more is [`TokenError::Expired`]. An expired
//! token's payload can still be read through [`inspect_timed_token`].
//!
//! ## Example
//!
//! ```rust
//! use dotsig_timed_token::{
//!     SigningKey, TimedToken, TimedTokenVerifier, TokenTimeConfig, inspect_timed_token,
//! };
//!
//! let key = SigningKey::with_salt("super secret 1", "email-confirm");
//! let signed_at = 1_700_000_000;
//!
//! let token = TimedToken::new(b"alice@example.com".to_vec())
//!     .issue(&key, signed_at)
//!     .expect("Failed to create timed token");
//!
//! // A day later, with a one hour limit
//! let err = TimedTokenVerifier::new(token.clone(), &key, signed_at + 86_400)
//!     .with_max_age(3_600)
//!     .verify()
//!     .unwrap_err();
//! assert!(err.is_expired());
//!
//! // The signature is still good, so the payload can be read on purpose
//! let inspected = inspect_timed_token(&token, &key, &TokenTimeConfig::default(), signed_at + 86_400)
//!     .expect("signature valid");
//! assert_eq!(inspected.payload, b"alice@example.com");
//! ```

mod inspect;
mod mint;
mod serializer;
mod verify;

pub use inspect::{TimedInspectResult, inspect_timed_token};
pub use mint::{TimedToken, sign_with_timestamp};
pub use serializer::UrlSafeTimedSerializer;
pub use verify::{TimedTokenVerifier, check_age};

// Re-export commonly needed types from core
pub use dotsig_token_core::{
    DigestMethod, JsonSerializer, KeyDerivation, LEGACY_EPOCH, PayloadSerializer, SignerConfig,
    SigningKey, TokenError, TokenTimeConfig, unix_now,
};

//! # Dotsig URL-safe Token
//!
//! Untimed signed tokens for cookies, links and other URL-bound values.
//!
//! A token is `[.]<b64(payload)>.<b64(signature)>`: the payload is
//! base64url-encoded, zlib-compressed first when that makes it shorter (the
//! leading `.` records this), and signed with an HMAC keyed by a key derived
//! from `(secret, salt)`.
//!
//! ## Example
//!
//! ```rust
//! use dotsig_url_token::{SigningKey, UrlSafeToken, UrlTokenVerifier};
//!
//! let key = SigningKey::with_salt("super secret 1", "cookie-session");
//! let token = UrlSafeToken::new(b"hello".to_vec()).issue(&key);
//!
//! let payload = UrlTokenVerifier::new(token.clone(), &key)
//!     .verify()
//!     .expect("valid token");
//! assert_eq!(payload, b"hello");
//!
//! // Any other salt rejects the token
//! let other = SigningKey::with_salt("super secret 1", "password-reset");
//! assert!(UrlTokenVerifier::new(token, &other).verify().is_err());
//! ```

mod mint;
mod serializer;
mod verify;

pub use mint::UrlSafeToken;
pub use serializer::UrlSafeSerializer;
pub use verify::{UrlTokenVerifier, verify_url_token};

// Re-export commonly needed types from core
pub use dotsig_token_core::{
    DigestMethod, JsonSerializer, KeyDerivation, PayloadSerializer, SignerConfig, SigningKey,
    TokenError,
};

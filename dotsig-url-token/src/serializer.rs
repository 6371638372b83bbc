use dotsig_token_core::{JsonSerializer, PayloadSerializer, SigningKey, TokenError};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::mint::UrlSafeToken;
use crate::verify::verify_url_token;

/// Signs and verifies structured values as URL-safe tokens.
///
/// Intended for a session or authentication layer that owns the secret and
/// hands it in at construction.
///
/// # Example
/// ```rust
/// use dotsig_url_token::{SigningKey, UrlSafeSerializer};
///
/// let serializer = UrlSafeSerializer::new(SigningKey::with_salt("secret", "cookie-session"));
/// let token = serializer.dumps(&("alice", 7)).expect("serializable");
/// let (name, visits): (String, u32) = serializer.loads(&token).expect("valid token");
/// assert_eq!((name.as_str(), visits), ("alice", 7));
/// ```
#[derive(Debug, Clone)]
pub struct UrlSafeSerializer<S = JsonSerializer> {
    key: SigningKey,
    serializer: S,
}

impl UrlSafeSerializer<JsonSerializer> {
    /// Creates a serializer using compact JSON payloads.
    pub fn new(key: SigningKey) -> Self {
        Self::with_serializer(key, JsonSerializer)
    }
}

impl<S: PayloadSerializer> UrlSafeSerializer<S> {
    /// Creates a serializer using a custom payload serializer.
    pub fn with_serializer(key: SigningKey, serializer: S) -> Self {
        Self { key, serializer }
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    /// Serializes and signs `value`.
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, TokenError> {
        Ok(UrlSafeToken::from_value(value, &self.serializer)?.issue(&self.key))
    }

    /// Verifies `token` and deserializes its payload.
    pub fn loads<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let payload = verify_url_token(token, &self.key)?;
        self.serializer.deserialize(&payload)
    }
}

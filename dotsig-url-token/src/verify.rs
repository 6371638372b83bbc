use dotsig_token_core::{PayloadSerializer, SigningKey, TokenError, decode_payload};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Verifier for URL-safe signed tokens.
///
/// The signature is checked before the payload segment is decoded, so no
/// unauthenticated bytes are ever decompressed or deserialized.
pub struct UrlTokenVerifier<'a> {
    token: String,
    key: &'a SigningKey,
}

impl<'a> UrlTokenVerifier<'a> {
    /// Creates a new verifier.
    ///
    /// # Arguments
    /// * `token` - The URL-safe token to verify
    /// * `key` - The signing key (secret and salt) the token must be signed with
    pub fn new(token: String, key: &'a SigningKey) -> Self {
        Self { token, key }
    }

    /// Verifies the token and returns the payload bytes.
    ///
    /// # Returns
    /// * `Ok(payload)` - If the signature matches and the payload decodes
    /// * `Err(TokenError::MalformedToken)` - No separator or invalid base64url
    /// * `Err(TokenError::BadSignature)` - The signature does not match
    /// * `Err(TokenError::CorruptPayload)` - Decompression failed
    pub fn verify(self) -> Result<Vec<u8>, TokenError> {
        verify_url_token(&self.token, self.key)
    }

    /// Verifies the token and deserializes the payload.
    ///
    /// # Arguments
    /// * `serializer` - Turns the payload bytes back into a value
    pub fn verify_value<T, S>(self, serializer: &S) -> Result<T, TokenError>
    where
        T: DeserializeOwned,
        S: PayloadSerializer,
    {
        let payload = self.verify()?;
        serializer.deserialize(&payload)
    }
}

/// Verifies a URL-safe token and returns its payload bytes.
pub fn verify_url_token(token: &str, key: &SigningKey) -> Result<Vec<u8>, TokenError> {
    let result = key.unsign(token).and_then(decode_payload);
    if let Err(e) = &result {
        debug!(kind = e.kind(), "url-safe token rejected");
    }
    result
}

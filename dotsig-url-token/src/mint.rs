use dotsig_token_core::{PayloadSerializer, SigningKey, TokenError, encode_payload};
use serde::Serialize;
use tracing::debug;

/// Builder for URL-safe signed tokens.
///
/// The payload is base64url-encoded (zlib-compressed first when that is
/// shorter) and signed, giving `[.]payload.signature`.
///
/// # Example
/// ```rust
/// use dotsig_url_token::{SigningKey, UrlSafeToken, UrlTokenVerifier};
///
/// let key = SigningKey::with_salt("super secret 1", "cookie-session");
///
/// let token = UrlSafeToken::new(br#"{"user":42}"#.to_vec()).issue(&key);
///
/// let payload = UrlTokenVerifier::new(token, &key)
///     .verify()
///     .expect("valid token");
/// assert_eq!(payload, br#"{"user":42}"#);
/// ```
#[derive(Debug, Clone)]
pub struct UrlSafeToken {
    payload: Vec<u8>,
}

impl UrlSafeToken {
    /// Creates a token builder for already-serialized payload bytes.
    ///
    /// # Arguments
    /// * `payload` - The payload bytes to sign
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Creates a token builder by serializing `value`.
    ///
    /// # Arguments
    /// * `value` - The value to carry in the token
    /// * `serializer` - Turns `value` into payload bytes
    pub fn from_value<T, S>(value: &T, serializer: &S) -> Result<Self, TokenError>
    where
        T: Serialize + ?Sized,
        S: PayloadSerializer,
    {
        Ok(Self::new(serializer.serialize(value)?))
    }

    /// Issues (encodes and signs) the token.
    ///
    /// # Arguments
    /// * `key` - The signing key (secret and salt) to sign with
    ///
    /// # Returns
    /// The URL-safe token string
    pub fn issue(&self, key: &SigningKey) -> String {
        let encoded = encode_payload(&self.payload);
        let token = key.sign(&encoded.text);
        debug!(
            compressed = encoded.compressed,
            payload_len = self.payload.len(),
            token_len = token.len(),
            "issued url-safe token"
        );
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotsig_token_core::{COMPRESSION_MARKER, JsonSerializer};

    fn key() -> SigningKey {
        SigningKey::with_salt("super secret 1", "cookie-session")
    }

    #[test]
    fn test_issue_short_payload() {
        let token = UrlSafeToken::new(
            br#"{"some_number":1,"some_words":"Some short payload"}"#.to_vec(),
        )
        .issue(&key());
        assert_eq!(
            token,
            "eyJzb21lX251bWJlciI6MSwic29tZV93b3JkcyI6IlNvbWUgc2hvcnQgcGF5bG9hZCJ9.TL62k75bxcUt2C4JcX6okzoMNWk"
        );
    }

    #[test]
    fn test_issue_long_payload_is_marked() {
        let payload = "a fairly repetitive sentence, ".repeat(10);
        let token = UrlSafeToken::new(payload.into_bytes()).issue(&key());
        assert!(token.starts_with(COMPRESSION_MARKER));
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_empty_payload() {
        let token = UrlSafeToken::new(Vec::new()).issue(&key());
        assert_eq!(token, ".xLpkJUSJsUzWD7IIVzBIDFA18Js");
    }

    #[test]
    fn test_from_value_uses_serializer() {
        let token = UrlSafeToken::from_value(&vec![1, 2, 3], &JsonSerializer)
            .expect("serialize")
            .issue(&key());
        let (payload, _) = token.split_once('.').expect("two segments");
        assert_eq!(payload, dotsig_token_core::b64_encode(b"[1,2,3]"));
    }
}

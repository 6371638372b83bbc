use dotsig_token_core::utils::int_to_bytes;
use dotsig_token_core::{
    PayloadSerializer, SigningKey, TokenError, TokenTimeConfig, b64_encode, encode_payload,
};
use serde::Serialize;
use tracing::debug;

/// Builder for timed URL-safe tokens.
///
/// The token is `[.]payload.timestamp.signature`, where the signature covers
/// both the payload and the timestamp segment.
///
/// # Example
/// ```rust
/// use dotsig_timed_token::{SigningKey, TimedToken, TimedTokenVerifier};
///
/// let key = SigningKey::with_salt("super secret 1", "password-reset");
/// let now = 1_700_000_000;
///
/// let token = TimedToken::new(b"user:42".to_vec())
///     .issue(&key, now)
///     .expect("Failed to create timed token");
///
/// // Still fresh ten minutes later with a one hour limit
/// let payload = TimedTokenVerifier::new(token, &key, now + 600)
///     .with_max_age(3600)
///     .verify()
///     .expect("fresh token");
/// assert_eq!(payload, b"user:42");
/// ```
#[derive(Debug, Clone)]
pub struct TimedToken {
    payload: Vec<u8>,
    time_config: TokenTimeConfig,
}

impl TimedToken {
    /// Creates a timed token builder for already-serialized payload bytes.
    ///
    /// # Arguments
    /// * `payload` - The payload bytes to sign
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            payload,
            time_config: TokenTimeConfig::default(),
        }
    }

    /// Creates a timed token builder by serializing `value`.
    pub fn from_value<T, S>(value: &T, serializer: &S) -> Result<Self, TokenError>
    where
        T: Serialize + ?Sized,
        S: PayloadSerializer,
    {
        Ok(Self::new(serializer.serialize(value)?))
    }

    /// Sets the epoch the embedded timestamp counts from.
    pub fn with_time_config(mut self, time_config: TokenTimeConfig) -> Self {
        self.time_config = time_config;
        self
    }

    /// Issues (encodes, timestamps and signs) the token.
    ///
    /// # Arguments
    /// * `key` - The signing key (secret and salt) to sign with
    /// * `now` - The signing time as a Unix timestamp
    ///
    /// # Returns
    /// The timed token string
    pub fn issue(&self, key: &SigningKey, now: i64) -> Result<String, TokenError> {
        let encoded = encode_payload(&self.payload);
        let token = sign_with_timestamp(key, &encoded.text, now, &self.time_config)?;
        debug!(
            compressed = encoded.compressed,
            payload_len = self.payload.len(),
            token_len = token.len(),
            signed_at = now,
            "issued timed token"
        );
        Ok(token)
    }
}

/// Signs arbitrary text together with a timestamp:
/// `value + sep + b64(timestamp) + sep + signature`.
///
/// No payload codec is applied to `value`.
///
/// # Arguments
/// * `key` - The signing key
/// * `value` - Text to sign, used verbatim
/// * `now` - The signing time as a Unix timestamp
/// * `time_config` - Epoch the stored timestamp counts from
pub fn sign_with_timestamp(
    key: &SigningKey,
    value: &str,
    now: i64,
    time_config: &TokenTimeConfig,
) -> Result<String, TokenError> {
    let stored = time_config.to_token_timestamp(now)?;
    let timestamp = b64_encode(&int_to_bytes(stored));
    let sep = key.separator();
    Ok(key.sign(&format!("{value}{sep}{timestamp}")))
}

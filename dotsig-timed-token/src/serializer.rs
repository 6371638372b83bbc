use dotsig_token_core::{JsonSerializer, PayloadSerializer, SigningKey, TokenError, TokenTimeConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::mint::TimedToken;
use crate::verify::TimedTokenVerifier;

/// Signs and verifies structured values as timed URL-safe tokens.
#[derive(Debug, Clone)]
pub struct UrlSafeTimedSerializer<S = JsonSerializer> {
    key: SigningKey,
    serializer: S,
    time_config: TokenTimeConfig,
}

impl UrlSafeTimedSerializer<JsonSerializer> {
    /// Creates a serializer using compact JSON payloads and Unix-epoch timestamps.
    pub fn new(key: SigningKey) -> Self {
        Self::with_serializer(key, JsonSerializer)
    }
}

impl<S: PayloadSerializer> UrlSafeTimedSerializer<S> {
    /// Creates a serializer using a custom payload serializer.
    pub fn with_serializer(key: SigningKey, serializer: S) -> Self {
        Self {
            key,
            serializer,
            time_config: TokenTimeConfig::default(),
        }
    }

    /// Sets the epoch embedded timestamps count from.
    pub fn with_time_config(mut self, time_config: TokenTimeConfig) -> Self {
        self.time_config = time_config;
        self
    }

    pub fn key(&self) -> &SigningKey {
        &self.key
    }

    /// Serializes `value` and signs it with `now` as the creation time.
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T, now: i64) -> Result<String, TokenError> {
        TimedToken::from_value(value, &self.serializer)?
            .with_time_config(self.time_config)
            .issue(&self.key, now)
    }

    /// Verifies `token` at time `now`, enforcing `max_age` when given, and
    /// deserializes its payload.
    pub fn loads<T: DeserializeOwned>(
        &self,
        token: &str,
        now: i64,
        max_age: Option<u64>,
    ) -> Result<T, TokenError> {
        self.loads_with_timestamp(token, now, max_age)
            .map(|(value, _)| value)
    }

    /// Like [`loads`](Self::loads), also returning the signing time.
    pub fn loads_with_timestamp<T: DeserializeOwned>(
        &self,
        token: &str,
        now: i64,
        max_age: Option<u64>,
    ) -> Result<(T, i64), TokenError> {
        let mut verifier = TimedTokenVerifier::new(token.to_string(), &self.key, now)
            .with_time_config(self.time_config);
        if let Some(max_age) = max_age {
            verifier = verifier.with_max_age(max_age);
        }
        let (payload, signed_at) = verifier.verify_with_timestamp()?;
        Ok((self.serializer.deserialize(&payload)?, signed_at))
    }
}

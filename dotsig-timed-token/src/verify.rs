use dotsig_token_core::utils::bytes_to_int;
use dotsig_token_core::{
    PayloadSerializer, SigningKey, TokenError, TokenTimeConfig, b64_decode, decode_payload,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Verifier for timed URL-safe tokens.
///
/// Verification order: signature, then timestamp structure, then age, then
/// payload decoding. Payload bytes are never decoded before the signature has
/// been checked.
///
/// `now` is always supplied by the caller, which keeps verification
/// reproducible.
pub struct TimedTokenVerifier<'a> {
    token: String,
    key: &'a SigningKey,
    now: i64,
    max_age: Option<u64>,
    time_config: TokenTimeConfig,
}

impl<'a> TimedTokenVerifier<'a> {
    /// Creates a new timed token verifier.
    ///
    /// # Arguments
    /// * `token` - The timed token to verify
    /// * `key` - The signing key (secret and salt) the token must be signed with
    /// * `now` - The verification time as a Unix timestamp
    pub fn new(token: String, key: &'a SigningKey, now: i64) -> Self {
        Self {
            token,
            key,
            now,
            max_age: None,
            time_config: TokenTimeConfig::default(),
        }
    }

    /// Rejects tokens older than `max_age` seconds.
    ///
    /// A token exactly `max_age` seconds old is still accepted.
    pub fn with_max_age(mut self, max_age: u64) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Sets the epoch the embedded timestamp counts from.
    pub fn with_time_config(mut self, time_config: TokenTimeConfig) -> Self {
        self.time_config = time_config;
        self
    }

    /// Verifies the token and returns the payload bytes.
    ///
    /// # Returns
    /// * `Ok(payload)` - Signature valid, token fresh, payload decoded
    /// * `Err(TokenError::BadSignature)` - The signature does not match
    /// * `Err(TokenError::MalformedToken)` - Missing or undecodable segments
    /// * `Err(TokenError::Expired)` - Older than the configured maximum age
    /// * `Err(TokenError::CorruptPayload)` - Decompression failed
    pub fn verify(self) -> Result<Vec<u8>, TokenError> {
        self.verify_with_timestamp().map(|(payload, _)| payload)
    }

    /// Like [`verify`](Self::verify), also returning the signing time as a
    /// Unix timestamp.
    pub fn verify_with_timestamp(self) -> Result<(Vec<u8>, i64), TokenError> {
        let result = self.unsign_checked().and_then(|(value, signed_at)| {
            decode_payload(value).map(|payload| (payload, signed_at))
        });
        if let Err(e) = &result {
            debug!(kind = e.kind(), now = self.now, "timed token rejected");
        }
        result
    }

    /// Verifies the token and deserializes the payload.
    pub fn verify_value<T, S>(self, serializer: &S) -> Result<T, TokenError>
    where
        T: DeserializeOwned,
        S: PayloadSerializer,
    {
        let payload = self.verify()?;
        serializer.deserialize(&payload)
    }

    /// Verifies a token produced by
    /// [`sign_with_timestamp`](crate::sign_with_timestamp) and returns the
    /// signed text verbatim, without payload decoding.
    pub fn verify_raw(self) -> Result<String, TokenError> {
        let result = self
            .unsign_checked()
            .map(|(value, _)| value.to_string());
        if let Err(e) = &result {
            debug!(kind = e.kind(), now = self.now, "timed value rejected");
        }
        result
    }

    fn unsign_checked(&self) -> Result<(&str, i64), TokenError> {
        let (value, signed_at) = unsign_timestamped(&self.token, self.key, &self.time_config)?;
        check_age(signed_at, self.now, self.max_age)?;
        Ok((value, signed_at))
    }
}

/// Checks the signature of a timed token and splits off its timestamp.
///
/// Does not look at the token's age.
///
/// # Returns
/// The signed value (payload segment) and the signing time as a Unix timestamp
pub(crate) fn unsign_timestamped<'t>(
    token: &'t str,
    key: &SigningKey,
    time_config: &TokenTimeConfig,
) -> Result<(&'t str, i64), TokenError> {
    let signed = key.unsign(token)?;

    let sep = key.separator();
    let (value, timestamp) = signed
        .rsplit_once(sep)
        .ok_or_else(|| TokenError::malformed("timestamp missing"))?;

    let stored = b64_decode(timestamp)
        .and_then(|bytes| bytes_to_int(&bytes))
        .map_err(|e| TokenError::malformed(format!("invalid timestamp segment: {e}")))?;
    let signed_at = time_config.from_token_timestamp(stored)?;

    Ok((value, signed_at))
}

/// Enforces the maximum age, if one is set.
///
/// `age == max_age` is fresh. A negative age (signed after `now`) is expired.
pub fn check_age(signed_at: i64, now: i64, max_age: Option<u64>) -> Result<(), TokenError> {
    let Some(max_age) = max_age else {
        return Ok(());
    };

    let age = now.saturating_sub(signed_at);
    let fresh = u64::try_from(age).is_ok_and(|age| age <= max_age);
    if fresh {
        Ok(())
    } else {
        Err(TokenError::Expired {
            signed_at,
            age,
            max_age,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::{TimedToken, sign_with_timestamp};
    use dotsig_token_core::{JsonSerializer, KeyDerivation, SignerConfig, b64_encode};
    use serde::Deserialize;

    const T: i64 = 1_700_000_000;
    const SHORT_TOKEN: &str = "eyJzb21lX251bWJlciI6Mywic29tZV93b3JkcyI6IlNvbWUgVElNRUQgc2hvcnQgcGF5bG9hZCJ9.ZVPxAA.yHgDqBctky4yK272YW2IMRLddS4";

    fn key() -> SigningKey {
        SigningKey::with_salt("super secret 1", "cookie-session")
    }

    #[test]
    fn test_verify_reference_token() {
        let (payload, signed_at) = TimedTokenVerifier::new(SHORT_TOKEN.to_string(), &key(), T)
            .with_max_age(60)
            .verify_with_timestamp()
            .expect("reference token verifies");
        assert_eq!(
            payload,
            br#"{"some_number":3,"some_words":"Some TIMED short payload"}"#
        );
        assert_eq!(signed_at, T);
    }

    #[test]
    fn test_max_age_boundary_is_inclusive() {
        let key = key();
        let max_age = 300;
        let token = TimedToken::new(b"session".to_vec())
            .issue(&key, T)
            .expect("issue");

        let at_limit = TimedTokenVerifier::new(token.clone(), &key, T + max_age as i64)
            .with_max_age(max_age)
            .verify()
            .expect("age == max_age is fresh");
        assert_eq!(at_limit, b"session");

        let err = TimedTokenVerifier::new(token, &key, T + max_age as i64 + 1)
            .with_max_age(max_age)
            .verify()
            .expect_err("age > max_age is expired");
        assert_eq!(
            err,
            TokenError::Expired {
                signed_at: T,
                age: 301,
                max_age: 300,
            }
        );
    }

    #[test]
    fn test_no_max_age_never_expires() {
        let key = key();
        let token = TimedToken::new(b"old".to_vec()).issue(&key, 0).expect("issue");
        assert!(TimedTokenVerifier::new(token, &key, T).verify().is_ok());
    }

    #[test]
    fn test_future_timestamp_is_expired() {
        let key = key();
        let token = TimedToken::new(b"x".to_vec()).issue(&key, T).expect("issue");
        let err = TimedTokenVerifier::new(token, &key, T - 1)
            .with_max_age(10)
            .verify()
            .expect_err("negative age");
        assert!(err.is_expired());
        assert!(matches!(err, TokenError::Expired { age: -1, .. }));
    }

    #[test]
    fn test_bad_signature_wins_over_expiry() {
        let key = key();
        let mut token = TimedToken::new(b"x".to_vec()).issue(&key, 0).expect("issue");
        token.insert(0, 'A');
        let err = TimedTokenVerifier::new(token, &key, T)
            .with_max_age(1)
            .verify()
            .expect_err("tampered");
        assert!(err.is_signature_error());
    }

    #[test]
    fn test_every_single_character_flip_is_rejected() {
        let key = key();
        let long_token = ".eJxNjrFuwzAMRH_loLnIFHTw3AwBmqVt5oKW6VgoLRkk3dQJ-u9VYgToeLy7x7sGKyN_5nlsWUOzfVr1uWhnoQnvVeBjf9i9QEo-YaJFCnXwgRznJAKKnr7JuZ4YF0kteiaflRsc0g93SLkGfQBB-TQLKYw1kaQLK9KD4s7j5PCyMmIZJ2WzO9VcU_1dvZG--Naxoajf6j0yx5ojXTbA_kETK2jJ-HkLzrF0_J9Tvfv8yomUYdSzLGgZk1BcBxOOb6-b8PsHcyNlmg.ZVPxAA.LWqimRj4SlQQtEy8-Ql3EQAYauw";
        for token in [SHORT_TOKEN, long_token] {
            assert!(TimedTokenVerifier::new(token.to_string(), &key, T).verify().is_ok());
            for (i, original) in token.char_indices() {
                // Separators stay put; a leading compression marker does not
                if original == '.' && i != 0 {
                    continue;
                }
                let replacement = if original == 'A' { 'B' } else { 'A' };
                let mut tampered = token.to_string();
                tampered.replace_range(i..i + 1, &replacement.to_string());

                let err = TimedTokenVerifier::new(tampered, &key, T)
                    .verify()
                    .expect_err("tampered token");
                assert!(
                    err.is_signature_error(),
                    "flip at {i} should be a signature error, got {err:?}"
                );
            }
        }
    }

    #[test]
    fn test_tampered_timestamp_is_bad_signature() {
        let key = key();
        let token = SHORT_TOKEN.replace(".ZVPxAA.", ".ZVPxAQ.");
        let err = TimedTokenVerifier::new(token, &key, T)
            .verify()
            .expect_err("tampered timestamp");
        assert!(err.is_signature_error());
    }

    #[test]
    fn test_untimed_token_is_malformed() {
        // Signed correctly, but carries no timestamp segment
        let key = key();
        let token = key.sign(&b64_encode(b"payload"));
        let err = TimedTokenVerifier::new(token, &key, T)
            .verify()
            .expect_err("no timestamp");
        assert!(err.is_malformed());
    }

    #[test]
    fn test_undecodable_timestamp_is_malformed() {
        let key = key();
        let token = key.sign(&format!("{}.$$", b64_encode(b"payload")));
        let err = TimedTokenVerifier::new(token, &key, T)
            .verify()
            .expect_err("bad timestamp alphabet");
        assert!(err.is_malformed());

        let wide = b64_encode(&[1u8; 9]);
        let token = key.sign(&format!("{}.{wide}", b64_encode(b"payload")));
        let err = TimedTokenVerifier::new(token, &key, T)
            .verify()
            .expect_err("timestamp too wide");
        assert!(err.is_malformed());
    }

    #[test]
    fn test_empty_timestamp_segment_is_zero() {
        let key = key();
        let token = key.sign(&format!("{}.", b64_encode(b"payload")));
        let (payload, signed_at) = TimedTokenVerifier::new(token, &key, T)
            .verify_with_timestamp()
            .expect("zero timestamp");
        assert_eq!(payload, b"payload");
        assert_eq!(signed_at, 0);
    }

    #[test]
    fn test_split_uses_last_separator_at_each_level() {
        // A value containing separators survives because both splits use the last one
        let key = key();
        let token = sign_with_timestamp(&key, "a.b.c", T, &TokenTimeConfig::default())
            .expect("sign");
        let value = TimedTokenVerifier::new(token, &key, T)
            .verify_raw()
            .expect("raw verify");
        assert_eq!(value, "a.b.c");
    }

    #[test]
    fn test_raw_legacy_reference() {
        let key = SigningKey::new(
            "secret-key",
            SignerConfig::default().key_derivation(KeyDerivation::DjangoConcat),
        )
        .expect("valid config");
        let value = TimedTokenVerifier::new(
            "my string.BpSAPw.NnKk1nQ206g1c1aJAS1Nxkt4aug".to_string(),
            &key,
            T,
        )
        .with_time_config(TokenTimeConfig::legacy())
        .verify_raw()
        .expect("legacy token");
        assert_eq!(value, "my string");
    }

    #[test]
    fn test_verify_value() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Payload {
            some_number: u32,
            some_words: String,
        }

        let payload: Payload = TimedTokenVerifier::new(SHORT_TOKEN.to_string(), &key(), T)
            .verify_value(&JsonSerializer)
            .expect("deserializes");
        assert_eq!(payload.some_number, 3);
        assert_eq!(payload.some_words, "Some TIMED short payload");
    }

    #[test]
    fn test_check_age() {
        assert!(check_age(100, 200, None).is_ok());
        assert!(check_age(100, 200, Some(100)).is_ok());
        assert!(check_age(100, 201, Some(100)).is_err());
        assert!(check_age(100, 100, Some(0)).is_ok());
        assert!(check_age(i64::MIN, i64::MAX, Some(u64::MAX)).is_ok());
    }
}

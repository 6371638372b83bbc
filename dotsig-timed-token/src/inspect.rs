use chrono::{DateTime, Utc};
use dotsig_token_core::codec::is_compressed;
use dotsig_token_core::time::to_datetime;
use dotsig_token_core::{SigningKey, TokenError, TokenTimeConfig, decode_payload};

use crate::verify::unsign_timestamped;

/// Result of inspecting a timed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedInspectResult {
    /// The decoded payload bytes.
    pub payload: Vec<u8>,
    /// Unix timestamp at which the token was signed.
    pub signed_at: i64,
    /// The signing time as a UTC datetime, if representable.
    pub signed_at_utc: Option<DateTime<Utc>>,
    /// Age of the token at inspection time, in seconds. Negative if the
    /// token claims to be signed in the future.
    pub age: i64,
    /// Whether the payload segment was compressed.
    pub compressed: bool,
}

impl TimedInspectResult {
    /// Whether a verifier with this `max_age` would reject the token as expired.
    pub fn is_expired(&self, max_age: u64) -> bool {
        u64::try_from(self.age).map_or(true, |age| age > max_age)
    }
}

/// Inspects a timed token, returning its payload and signing time.
///
/// This performs signature verification but does not enforce age, so expired
/// tokens can still be read. Use it for grace reads after a verifier reported
/// [`TokenError::Expired`].
///
/// # Arguments
/// * `token` - The timed token
/// * `key` - The signing key (secret and salt) the token must be signed with
/// * `time_config` - Epoch the embedded timestamp counts from
/// * `now` - The inspection time as a Unix timestamp
pub fn inspect_timed_token(
    token: &str,
    key: &SigningKey,
    time_config: &TokenTimeConfig,
    now: i64,
) -> Result<TimedInspectResult, TokenError> {
    let (value, signed_at) = unsign_timestamped(token, key, time_config)?;
    let payload = decode_payload(value)?;

    Ok(TimedInspectResult {
        payload,
        signed_at,
        signed_at_utc: to_datetime(signed_at),
        age: now.saturating_sub(signed_at),
        compressed: is_compressed(value),
    })
}

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::TokenError;

/// Epoch used by deployments that predate Unix-epoch timestamps
/// (2011-01-01T00:00:00Z).
pub const LEGACY_EPOCH: i64 = 1_293_840_000;

/// Time configuration for timed tokens.
///
/// Timestamps are stored in the token as seconds since `epoch`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenTimeConfig {
    /// Unix timestamp that token timestamps count from
    pub epoch: i64,
}

impl TokenTimeConfig {
    /// Configuration for tokens counting from [`LEGACY_EPOCH`].
    pub fn legacy() -> Self {
        Self {
            epoch: LEGACY_EPOCH,
        }
    }

    /// Converts a Unix timestamp into the value stored in a token.
    pub fn to_token_timestamp(&self, now: i64) -> Result<u64, TokenError> {
        now.checked_sub(self.epoch)
            .and_then(|offset| u64::try_from(offset).ok())
            .ok_or(TokenError::ClockBeforeEpoch {
                now,
                epoch: self.epoch,
            })
    }

    /// Converts a stored token timestamp back into a Unix timestamp.
    pub fn from_token_timestamp(&self, stored: u64) -> Result<i64, TokenError> {
        i64::try_from(stored)
            .ok()
            .and_then(|offset| offset.checked_add(self.epoch))
            .ok_or_else(|| TokenError::malformed(format!("timestamp {stored} is out of range")))
    }
}

/// Current Unix time in seconds.
///
/// Library code never calls this; signing and verification always take
/// `now` as an argument.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Converts a Unix timestamp into a UTC datetime, if representable.
pub fn to_datetime(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

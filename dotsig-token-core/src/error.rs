use thiserror::Error;

/// Detailed error type for dotsig token operations with specific failure information
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    // ===== Signature and Format Errors =====
    /// The recomputed signature does not match the one carried by the token
    #[error("Invalid token signature: {details}")]
    BadSignature { details: String },

    /// The token does not have the expected structure
    #[error("Malformed token: {reason}")]
    MalformedToken { reason: String },

    /// Signature and structure are valid, but the payload cannot be decompressed
    /// or deserialized
    #[error("Corrupt payload: {reason}")]
    CorruptPayload { reason: String },

    // ===== Verification Errors (Timed) =====
    /// Token is older than the maximum age accepted by the verifier
    #[error("Token expired: signed at {signed_at}, age {age}s exceeds {max_age}s")]
    Expired {
        /// When the token was signed (Unix timestamp)
        signed_at: i64,
        /// Age of the token at verification time, in seconds
        age: i64,
        /// Maximum age accepted by the verifier, in seconds
        max_age: u64,
    },

    // ===== Signing Errors =====
    /// The payload value could not be serialized
    #[error("Failed to serialize payload: {reason}")]
    Serialization { reason: String },

    /// The signing time lies before the configured epoch
    #[error("Signing time {now} is before the timestamp epoch {epoch}")]
    ClockBeforeEpoch { now: i64, epoch: i64 },

    /// Signer configuration was rejected
    #[error("Invalid signer configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl TokenError {
    // ===== Helper Methods for Common Error Checks =====

    /// Check if this error is due to token expiration
    pub fn is_expired(&self) -> bool {
        matches!(self, TokenError::Expired { .. })
    }

    /// Check if this error is an authentication failure
    pub fn is_signature_error(&self) -> bool {
        matches!(self, TokenError::BadSignature { .. })
    }

    /// Check if this error is a structural/parsing failure
    pub fn is_malformed(&self) -> bool {
        matches!(self, TokenError::MalformedToken { .. })
    }

    /// Get the signing time if this is an expiration error
    pub fn get_signed_at(&self) -> Option<i64> {
        match self {
            TokenError::Expired { signed_at, .. } => Some(*signed_at),
            _ => None,
        }
    }

    // ===== Constructor Helper Methods =====

    /// Create a bad signature error
    pub fn bad_signature<S: Into<String>>(details: S) -> Self {
        TokenError::BadSignature {
            details: details.into(),
        }
    }

    /// Create a malformed token error
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        TokenError::MalformedToken {
            reason: reason.into(),
        }
    }

    /// Create a corrupt payload error
    pub fn corrupt_payload<S: Into<String>>(reason: S) -> Self {
        TokenError::CorruptPayload {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<S: Into<String>>(reason: S) -> Self {
        TokenError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Short, stable name of the error kind for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::BadSignature { .. } => "bad_signature",
            TokenError::MalformedToken { .. } => "malformed_token",
            TokenError::CorruptPayload { .. } => "corrupt_payload",
            TokenError::Expired { .. } => "expired",
            TokenError::Serialization { .. } => "serialization",
            TokenError::ClockBeforeEpoch { .. } => "clock_before_epoch",
            TokenError::InvalidConfig { .. } => "invalid_config",
        }
    }
}

// ===== Conversions from collaborator errors =====

impl From<base64::DecodeError> for TokenError {
    fn from(err: base64::DecodeError) -> Self {
        TokenError::MalformedToken {
            reason: format!("invalid base64url data: {err}"),
        }
    }
}

use serde::Deserialize;

use crate::algorithm::DigestMethod;
use crate::error::TokenError;
use crate::key::KeyDerivation;

/// Namespace used when the caller does not pick a salt.
pub const DEFAULT_SALT: &str = "itsdangerous.Signer";

/// Separator between token segments.
pub const DEFAULT_SEPARATOR: char = '.';

/// Signer configuration, everything except the secret.
///
/// The secret is supplied separately when building a
/// [`SigningKey`](crate::SigningKey) so this struct can be loaded from a
/// configuration file without carrying key material.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Namespace for the secret; signer and verifier must agree on it
    pub salt: String,
    /// Segment separator
    pub separator: char,
    /// How the signing key is derived from the secret
    pub key_derivation: KeyDerivation,
    /// Hash used for derivation and signing
    pub digest: DigestMethod,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            separator: DEFAULT_SEPARATOR,
            key_derivation: KeyDerivation::default(),
            digest: DigestMethod::default(),
        }
    }
}

impl SignerConfig {
    /// Default configuration with the given salt.
    pub fn with_salt<S: Into<String>>(salt: S) -> Self {
        Self {
            salt: salt.into(),
            ..Self::default()
        }
    }

    pub fn key_derivation(mut self, key_derivation: KeyDerivation) -> Self {
        self.key_derivation = key_derivation;
        self
    }

    pub fn digest(mut self, digest: DigestMethod) -> Self {
        self.digest = digest;
        self
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Rejects separators that could appear inside a base64url segment.
    pub fn validate(&self) -> Result<(), TokenError> {
        let sep = self.separator;
        if sep.is_ascii_alphanumeric() || sep == '-' || sep == '_' || sep == '=' {
            return Err(TokenError::invalid_config(format!(
                "separator {sep:?} is part of the base64url alphabet"
            )));
        }
        Ok(())
    }
}

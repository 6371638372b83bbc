//! Derivation of single-purpose signing keys from a long-term secret.

use crate::algorithm::{DigestMethod, HmacSigner};
use serde::Deserialize;
use std::fmt;

/// How the signing key is derived from `(secret, salt)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyDerivation {
    /// `HMAC(key = secret, message = salt)`
    #[default]
    Hmac,
    /// `digest(salt || secret)`
    Concat,
    /// `digest(salt || "signer" || secret)`
    DjangoConcat,
    /// The secret itself, unchanged
    None,
}

impl fmt::Display for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDerivation::Hmac => write!(f, "hmac"),
            KeyDerivation::Concat => write!(f, "concat"),
            KeyDerivation::DjangoConcat => write!(f, "django-concat"),
            KeyDerivation::None => write!(f, "none"),
        }
    }
}

/// A key derived for one signing context. Only ever used as an HMAC key.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey(Vec<u8>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey(<{} bytes redacted>)", self.0.len())
    }
}

/// Derives the signing key for `salt` from `secret`.
///
/// Deterministic and side-effect free.
pub fn derive_key(
    secret: &[u8],
    salt: &[u8],
    derivation: KeyDerivation,
    digest: DigestMethod,
) -> DerivedKey {
    let key = match derivation {
        KeyDerivation::Hmac => HmacSigner::new(digest).sign(secret, salt),
        KeyDerivation::Concat => digest.digest_parts(&[salt, secret]),
        KeyDerivation::DjangoConcat => digest.digest_parts(&[salt, b"signer", secret]),
        KeyDerivation::None => secret.to_vec(),
    };
    DerivedKey(key)
}

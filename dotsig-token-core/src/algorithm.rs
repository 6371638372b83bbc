//! HMAC signing primitive shared by every token kind.

use ring::{digest, hmac};
use serde::Deserialize;
use std::fmt;

/// Hash function used for key derivation and for the HMAC itself.
///
/// `Sha1` is the default and the only digest the compatibility fixtures use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestMethod {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl DigestMethod {
    pub(crate) fn hmac_algorithm(self) -> hmac::Algorithm {
        match self {
            DigestMethod::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            DigestMethod::Sha256 => hmac::HMAC_SHA256,
            DigestMethod::Sha512 => hmac::HMAC_SHA512,
        }
    }

    pub(crate) fn digest_algorithm(self) -> &'static digest::Algorithm {
        match self {
            DigestMethod::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestMethod::Sha256 => &digest::SHA256,
            DigestMethod::Sha512 => &digest::SHA512,
        }
    }

    /// Length in bytes of a signature produced with this digest.
    pub fn output_len(self) -> usize {
        self.digest_algorithm().output_len()
    }

    /// Plain (unkeyed) digest of the concatenation of `parts`.
    pub(crate) fn digest_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        let mut ctx = digest::Context::new(self.digest_algorithm());
        for part in parts {
            ctx.update(part);
        }
        ctx.finish().as_ref().to_vec()
    }
}

impl fmt::Display for DigestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestMethod::Sha1 => write!(f, "sha1"),
            DigestMethod::Sha256 => write!(f, "sha256"),
            DigestMethod::Sha512 => write!(f, "sha512"),
        }
    }
}

/// Computes and checks HMAC tags over arbitrary bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HmacSigner {
    digest: DigestMethod,
}

impl HmacSigner {
    pub fn new(digest: DigestMethod) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> DigestMethod {
        self.digest
    }

    /// Returns `HMAC(key, message)`.
    pub fn sign(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
        let key = hmac::Key::new(self.digest.hmac_algorithm(), key);
        hmac::sign(&key, message).as_ref().to_vec()
    }

    /// Recomputes the tag and compares it against `signature` in constant time.
    pub fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        let key = hmac::Key::new(self.digest.hmac_algorithm(), key);
        hmac::verify(&key, message, signature).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_lengths() {
        for (digest, len) in [
            (DigestMethod::Sha1, 20),
            (DigestMethod::Sha256, 32),
            (DigestMethod::Sha512, 64),
        ] {
            let signer = HmacSigner::new(digest);
            assert_eq!(signer.sign(b"key", b"message").len(), len);
            assert_eq!(digest.output_len(), len);
        }
    }

    #[test]
    fn test_rfc2202_sha1_vector() {
        // RFC 2202 test case 2
        let signer = HmacSigner::new(DigestMethod::Sha1);
        let tag = signer.sign(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(&tag),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn test_verify_rejects_mismatch() {
        let signer = HmacSigner::default();
        let mut tag = signer.sign(b"key", b"message");
        assert!(signer.verify(b"key", b"message", &tag));
        assert!(!signer.verify(b"other", b"message", &tag));
        assert!(!signer.verify(b"key", b"message!", &tag));

        tag[0] ^= 0x01;
        assert!(!signer.verify(b"key", b"message", &tag));
        assert!(!signer.verify(b"key", b"message", &tag[..10]));
        assert!(!signer.verify(b"key", b"message", &[]));
    }

    #[test]
    fn test_digest_method_display() {
        assert_eq!(DigestMethod::default().to_string(), "sha1");
        assert_eq!(DigestMethod::Sha512.to_string(), "sha512");
    }
}

use std::fmt;

use tracing::debug;

use crate::algorithm::HmacSigner;
use crate::config::SignerConfig;
use crate::error::TokenError;
use crate::key::{DerivedKey, derive_key};
use crate::utils::{b64_decode, b64_encode};

/// A secret bound to a signer configuration.
///
/// Signs text as `value + separator + base64url(HMAC(derived_key, value))`
/// and checks such strings. The derived key is recomputed for every call and
/// never stored.
///
/// # Example
/// ```rust
/// use dotsig_token_core::{KeyDerivation, SignerConfig, SigningKey};
///
/// let config = SignerConfig::default().key_derivation(KeyDerivation::DjangoConcat);
/// let key = SigningKey::new("secret-key", config).expect("valid config");
///
/// let signed = key.sign("my string");
/// assert_eq!(signed, "my string.wh6tMHxLgJqB6oY1uT73iMlyrOA");
/// assert_eq!(key.unsign(&signed).expect("valid signature"), "my string");
/// ```
#[derive(Clone)]
pub struct SigningKey {
    secret: Vec<u8>,
    config: SignerConfig,
}

impl SigningKey {
    /// Creates a signing key from a secret and a configuration.
    ///
    /// # Arguments
    /// * `secret` - The long-term secret; never logged
    /// * `config` - Salt, separator, key derivation and digest
    pub fn new<S: Into<Vec<u8>>>(secret: S, config: SignerConfig) -> Result<Self, TokenError> {
        if let Err(e) = config.validate() {
            debug!(kind = e.kind(), "signer configuration rejected: {e}");
            return Err(e);
        }
        Ok(Self {
            secret: secret.into(),
            config,
        })
    }

    /// Creates a signing key with the default configuration and the given salt.
    pub fn with_salt<S: Into<Vec<u8>>, T: Into<String>>(secret: S, salt: T) -> Self {
        Self {
            secret: secret.into(),
            config: SignerConfig::with_salt(salt),
        }
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn separator(&self) -> char {
        self.config.separator
    }

    /// Derives the single-use signing key for this salt.
    pub fn derive_key(&self) -> DerivedKey {
        derive_key(
            &self.secret,
            self.config.salt.as_bytes(),
            self.config.key_derivation,
            self.config.digest,
        )
    }

    fn hmac(&self) -> HmacSigner {
        HmacSigner::new(self.config.digest)
    }

    /// Returns the base64url signature for `value`.
    pub fn get_signature(&self, value: &[u8]) -> String {
        let key = self.derive_key();
        b64_encode(&self.hmac().sign(key.as_bytes(), value))
    }

    /// Checks a base64url signature for `value` in constant time.
    ///
    /// A signature that is not valid base64url never matches.
    pub fn verify_signature(&self, value: &[u8], signature: &str) -> bool {
        let Ok(signature) = b64_decode(signature) else {
            return false;
        };
        let key = self.derive_key();
        self.hmac().verify(key.as_bytes(), value, &signature)
    }

    /// Signs `value`, returning `value + separator + signature`.
    pub fn sign(&self, value: &str) -> String {
        let signature = self.get_signature(value.as_bytes());
        let mut signed = String::with_capacity(value.len() + 1 + signature.len());
        signed.push_str(value);
        signed.push(self.config.separator);
        signed.push_str(&signature);
        signed
    }

    /// Splits `signed` on its last separator and checks the signature over
    /// everything before it.
    ///
    /// # Returns
    /// * `Ok(value)` - The signed value, without the signature
    /// * `Err(TokenError::MalformedToken)` - No separator in `signed`
    /// * `Err(TokenError::BadSignature)` - The signature does not match
    pub fn unsign<'a>(&self, signed: &'a str) -> Result<&'a str, TokenError> {
        let sep = self.config.separator;
        let (value, signature) = signed
            .rsplit_once(sep)
            .ok_or_else(|| TokenError::malformed(format!("no {sep:?} found in value")))?;

        if self.verify_signature(value.as_bytes(), signature) {
            Ok(value)
        } else {
            debug!(digest = %self.config.digest, "signature mismatch");
            Err(TokenError::bad_signature(format!(
                "signature {signature:?} does not match"
            )))
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("secret", &"<redacted>")
            .field("config", &self.config)
            .finish()
    }
}

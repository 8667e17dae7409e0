//! `X-Hub-Signature` verification.
//!
//! GitHub signs each delivery with HMAC-SHA1 over the raw request body,
//! keyed by the webhook secret, and sends it as `sha1=<hex digest>`.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::ListenerError;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_PREFIX: &str = "sha1=";

/// Checks deliveries against the shared webhook secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("configured", &self.secret.is_some())
            .finish()
    }
}

impl WebhookVerifier {
    /// Creates a verifier. An empty secret counts as no secret.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Whether a secret is available.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    fn mac(&self) -> Result<HmacSha1, ListenerError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or(ListenerError::SecretNotConfigured)?;
        // HMAC accepts keys of any length.
        HmacSha1::new_from_slice(secret.as_bytes()).map_err(|_| ListenerError::SecretNotConfigured)
    }

    /// Computes the `X-Hub-Signature` value GitHub would send for `payload`.
    ///
    /// # Errors
    ///
    /// [`ListenerError::SecretNotConfigured`] without a secret.
    pub fn sign(&self, payload: &[u8]) -> Result<String, ListenerError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(format!(
            "{SIGNATURE_PREFIX}{}",
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Checks `signature` against `payload` in constant time.
    ///
    /// # Errors
    ///
    /// - [`ListenerError::SecretNotConfigured`] without a secret,
    /// - [`ListenerError::SignatureMismatch`] when the signature is malformed
    ///   or does not match.
    pub fn verify(&self, signature: &str, payload: &[u8]) -> Result<(), ListenerError> {
        let mut mac = self.mac()?;

        let provided = signature
            .strip_prefix(SIGNATURE_PREFIX)
            .and_then(|digest| hex::decode(digest).ok())
            .ok_or(ListenerError::SignatureMismatch)?;

        mac.update(payload);
        let expected = mac.finalize().into_bytes();

        if bool::from(expected.as_slice().ct_eq(&provided)) {
            Ok(())
        } else {
            Err(ListenerError::SignatureMismatch)
        }
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;

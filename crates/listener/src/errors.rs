//! Errors raised while accepting a webhook delivery.

use bridge::BridgeError;
use thiserror::Error;

/// Why a delivery was rejected or failed.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// GitHub only ever POSTs deliveries.
    #[error("Only POST requests are accepted")]
    MethodNotAllowed,

    /// A required GitHub delivery header was absent.
    #[error("Must provide {header} header")]
    MissingHeader {
        /// Canonical header name, e.g. `X-Hub-Signature`.
        header: &'static str,
    },

    /// `X-Hub-Signature` does not match the body.
    #[error("X-Hub-Signature mis-match")]
    SignatureMismatch,

    /// No signing secret was configured, so no delivery can be verified.
    #[error("Webhook signing secret is not configured")]
    SecretNotConfigured,

    /// The delivery was authentic but handling it failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

impl ListenerError {
    /// HTTP status the delivery is answered with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed => 405,
            Self::MissingHeader { .. } => 400,
            Self::SignatureMismatch => 403,
            Self::SecretNotConfigured => 500,
            Self::Bridge(e) => e.status_code(),
        }
    }
}

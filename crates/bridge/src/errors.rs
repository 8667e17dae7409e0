//! Error types for the cardhook domain.
//!
//! [`BridgeError`] covers every fault that stops one event from being
//! handled. [`GatewayError`] is the failure type of the
//! [`crate::CardGateway`] port and is wrapped by [`BridgeError::Gateway`].
//!
//! Recognised-but-irrelevant events (a push to `master`, an unsupported PR
//! action) are **not** errors; they surface as [`crate::Outcome::Ignored`].
//!
//! Every error carries the HTTP status the inbound listener answers with,
//! available through `status_code()`.

use thiserror::Error;

use crate::{BoardId, PrStatus};

// ---------------------------------------------------------------------------
// Gateway errors
// ---------------------------------------------------------------------------

/// Failure of a single outbound call made through [`crate::CardGateway`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The remote service answered with a non-2xx status.
    #[error("{message}")]
    Remote {
        /// HTTP status returned by the remote service.
        status: u16,
        /// Response body or status reason.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Request to Trello failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The response arrived but its body did not have the expected shape.
    #[error("Unexpected response from Trello: {message}")]
    InvalidResponse {
        /// Description of what was missing or malformed.
        message: String,
    },
}

impl GatewayError {
    /// HTTP status this error maps to at the inbound boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Remote { status, .. } => *status,
            Self::Transport { .. } | Self::InvalidResponse { .. } => 500,
        }
    }

    /// Returns `true` for a remote `403 Forbidden`.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Remote { status: 403, .. })
    }

    /// Rewrites a `403` from custom-field creation to name the actual cause.
    ///
    /// Trello answers `403` on `POST /1/customFields` when the board does not
    /// have the Custom Fields Power-Up enabled. Other errors pass through.
    pub fn explain_custom_field_forbidden(self, board: &BoardId) -> Self {
        if self.is_forbidden() {
            Self::Remote {
                status: 403,
                message: format!("Custom Fields Power-Up not enabled for board {board}"),
            }
        } else {
            self
        }
    }
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Errors that stop one webhook event from being handled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Card identifiers can only be derived from `push` and `pull_request`
    /// payloads.
    #[error("Unsupported event: {event}")]
    InvalidEvent {
        /// The GitHub event name.
        event: String,
    },

    /// The payload carried no usable branch name (e.g. a tag ref on push).
    #[error("Unable to parse branch name for event: {event}")]
    MissingBranch {
        /// The GitHub event name.
        event: String,
    },

    /// The branch name follows none of the recognised card conventions.
    #[error("No shortLink found in branch {branch}")]
    NoIdentifierFound {
        /// The raw branch name, for diagnostics.
        branch: String,
    },

    /// A push payload lacked the repository, pusher, or head commit details.
    #[error("No push message generated for {reference}")]
    IncompletePushPayload {
        /// The pushed ref (empty when the payload had none).
        reference: String,
    },

    /// The webhook body was not valid JSON for its declared event.
    #[error("Malformed {event} payload: {message}")]
    MalformedPayload {
        /// The GitHub event name.
        event: String,
        /// Parser diagnostic.
        message: String,
    },

    /// The board's `PR` field exists but has no option for the target status.
    ///
    /// Someone edited the field by hand; retrying cannot repair it.
    #[error("Custom Fields for PR missing status {status}")]
    MissingStatusOption {
        /// The status that could not be found.
        status: PrStatus,
    },

    /// An outbound Trello call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl BridgeError {
    /// HTTP status this error maps to at the inbound boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidEvent { .. }
            | Self::MissingBranch { .. }
            | Self::NoIdentifierFound { .. }
            | Self::IncompletePushPayload { .. }
            | Self::MalformedPayload { .. } => 400,
            Self::MissingStatusOption { .. } => 500,
            Self::Gateway(e) => e.status_code(),
        }
    }
}

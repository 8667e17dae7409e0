//! cardhook inbound webhook endpoint.
//!
//! Receives GitHub webhook deliveries over HTTP, authenticates them with the
//! `X-Hub-Signature` HMAC, and hands each one to [`bridge::dispatch`].
//!
//! ## Request pipeline
//!
//! | Step | Failure | Status |
//! |------|---------|--------|
//! | Method is `POST` | [`ListenerError::MethodNotAllowed`] | 405 |
//! | `X-Hub-Signature`, `X-GitHub-Event`, `X-GitHub-Delivery` present | [`ListenerError::MissingHeader`] | 400 |
//! | Secret configured | [`ListenerError::SecretNotConfigured`] | 500 |
//! | Signature matches the raw body | [`ListenerError::SignatureMismatch`] | 403 |
//! | Payload parses, event dispatches | [`ListenerError::Bridge`] | per [`bridge::BridgeError::status_code`] |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP and signature details live here. The [`bridge`]
//! crate sees only parsed [`bridge::WebhookEvent`]s.

mod errors;
mod server;
mod signature;

pub use errors::ListenerError;
pub use server::{build_router, serve, AppState};
pub use signature::WebhookVerifier;

//! cardhook Trello infrastructure adapter.
//!
//! Implements the [`bridge::CardGateway`] trait against the Trello REST API
//! (`https://api.trello.com/1`).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Request
//! encoding, authentication, and response decoding live here; the [`bridge`]
//! crate sees only [`bridge::CardGateway`] and [`bridge::GatewayError`].
//!
//! ## Authentication
//!
//! Every request carries the API key and token as `key` / `token` query
//! parameters. Both are supplied once through [`TrelloCredentials`].
//!
//! ## Error Mapping
//!
//! | Condition | [`bridge::GatewayError`] |
//! |-----------|--------------------------|
//! | non-2xx response | `Remote { status, message }` |
//! | connection / TLS failure | `Transport` |
//! | body missing an expected field | `InvalidResponse` |
//!
//! No retries are attempted.

mod client;

pub use client::{TrelloClient, TrelloCredentials, TRELLO_API_URL};

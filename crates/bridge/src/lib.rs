//! Core domain for cardhook.
//!
//! cardhook keeps Trello cards in step with the GitHub branches and pull
//! requests that reference them: pushes become card comments, pull requests
//! set a `PR` status field, and review activity updates a `Review` field.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It decides *what* should happen to a card; the [`CardGateway`] port, which
//! infrastructure crates implement, decides *how* it reaches Trello.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Trello id newtypes (`CardId`, `BoardId`, etc.) |
//! | [`types`] | `ActionResult`, `Outcome`, `PrStatus`, custom-field schema |
//! | [`errors`] | `BridgeError`, `GatewayError` |
//! | [`events`] | GitHub webhook event model |
//! | [`branch`] | branch name → card resolution |
//! | [`message`] | push comment text |
//! | [`gateway`] | the `CardGateway` port |
//! | [`reconcile`] | `PR` / `Review` custom-field reconcilers |
//! | [`dispatch`] | event → action routing |

pub mod branch;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod identifiers;
pub mod message;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use branch::{extract_card_id, BranchTarget};
pub use dispatch::{dispatch, route, Route};
pub use errors::{BridgeError, GatewayError};
pub use events::{
    CommitAuthor, EventKind, GitRef, HeadCommit, PullRequest, PullRequestAction,
    PullRequestEvent, PullRequestReviewEvent, Pusher, Repository, Review, ReviewState, User,
    WebhookEvent, PushEvent,
};
pub use gateway::CardGateway;
pub use identifiers::{BoardId, CardId, CustomFieldId, CustomFieldOptionId};
pub use message::format_push_message;
pub use reconcile::{reconcile_pr_status, reconcile_review_status};
pub use types::{
    ActionResult, CustomFieldDefinition, CustomFieldOption, CustomFieldType, NewCustomField,
    NewFieldOption, OptionValue, Outcome, PrStatus,
};

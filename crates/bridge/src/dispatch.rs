//! Routes an inbound event to the action it calls for.
//!
//! | Event | Action / state | Route |
//! |-------|----------------|-------|
//! | `push` | any | comment on the card |
//! | `pull_request` | `opened`, `reopened` | `PR` → Open |
//! | `pull_request` | `closed`, merged | `PR` → Merged |
//! | `pull_request` | `closed`, not merged | `PR` → Closed |
//! | `pull_request` | `review_requested`, `review_request_removed` | `Review` field |
//! | `pull_request` | anything else | ignored |
//! | `pull_request_review` | any | `Review` field |
//! | anything else | | ignored |

use tracing::{info, instrument};

use crate::{
    branch::{card_for_push, BranchTarget},
    message::format_push_message,
    reconcile::{reconcile_pr_status, reconcile_review_status},
    BridgeError, CardGateway, EventKind, Outcome, PrStatus, PullRequest, PullRequestAction,
    PullRequestEvent, PushEvent, Review, WebhookEvent,
};

/// The action an event calls for, borrowing the parts of the payload it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Route<'a> {
    /// Comment on the pushed branch's card.
    PushComment(&'a PushEvent),
    /// Set the card's `PR` field.
    PrStatus(&'a PullRequestEvent, PrStatus),
    /// Refresh the card's `Review` field.
    ReviewStatus {
        kind: EventKind,
        pull_request: Option<&'a PullRequest>,
        review: Option<&'a Review>,
    },
    /// Nothing to do.
    Ignore(String),
}

/// Decides what `event` calls for. Performs no I/O.
pub fn route(event: &WebhookEvent) -> Route<'_> {
    match event {
        WebhookEvent::Push(push) => Route::PushComment(push),
        WebhookEvent::PullRequest(pr) => match pr.action() {
            PullRequestAction::Opened | PullRequestAction::Reopened => {
                Route::PrStatus(pr, PrStatus::Open)
            }
            PullRequestAction::Closed if pr.is_merged() => Route::PrStatus(pr, PrStatus::Merged),
            PullRequestAction::Closed => Route::PrStatus(pr, PrStatus::Closed),
            PullRequestAction::ReviewRequested | PullRequestAction::ReviewRequestRemoved => {
                Route::ReviewStatus {
                    kind: EventKind::PullRequest,
                    pull_request: pr.pull_request.as_ref(),
                    review: None,
                }
            }
            PullRequestAction::Other(action) => {
                Route::Ignore(format!("Ignored unsupported pull_request action: {action}"))
            }
        },
        WebhookEvent::PullRequestReview(review) => Route::ReviewStatus {
            kind: EventKind::PullRequestReview,
            pull_request: review.pull_request.as_ref(),
            review: review.review.as_ref(),
        },
        WebhookEvent::Unsupported { name } => {
            Route::Ignore(format!("Ignored unsupported event: {name}"))
        }
    }
}

/// Handles one event end to end.
///
/// # Errors
///
/// Whatever the routed operation fails with; see [`BridgeError`].
#[instrument(skip_all, fields(event = %event.name()))]
pub async fn dispatch(
    gateway: &dyn CardGateway,
    event: &WebhookEvent,
) -> Result<Outcome, BridgeError> {
    match route(event) {
        Route::PushComment(push) => post_push_comment(gateway, push).await,
        Route::PrStatus(pr, status) => reconcile_pr_status(gateway, pr, status).await,
        Route::ReviewStatus {
            kind,
            pull_request,
            review,
        } => reconcile_review_status(gateway, kind, pull_request, review).await,
        Route::Ignore(reason) => {
            info!(%reason, "Ignoring event");
            Ok(Outcome::Ignored(reason))
        }
    }
}

async fn post_push_comment(
    gateway: &dyn CardGateway,
    push: &PushEvent,
) -> Result<Outcome, BridgeError> {
    let card = match card_for_push(push)? {
        BranchTarget::Card(card) => card,
        BranchTarget::Ignore { reason } => return Ok(Outcome::Ignored(reason)),
    };
    let comment = format_push_message(push)?;

    let result = gateway.post_comment(&card, &comment).await?;
    info!(card = %card, "Posted push comment");
    Ok(Outcome::Handled(result))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;

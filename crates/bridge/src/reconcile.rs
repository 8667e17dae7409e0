//! PR and review status reconcilers.
//!
//! Both reconcilers keep a board-level custom field in step with GitHub:
//!
//! 1. resolve the card from the PR's head branch,
//! 2. resolve the card's board,
//! 3. find the field by name among the board's custom fields, creating the
//!    definition if the board does not have it yet,
//! 4. write the card's value.
//!
//! Nothing is cached between events; every run re-reads the board. The
//! read-then-create in step 3 is not locked, so two first-time events for
//! the same board arriving together can create the field twice.

use tracing::{info, instrument, warn};

use crate::{
    branch::{card_for_pull_request, BranchTarget},
    BoardId, BridgeError, CardGateway, CustomFieldDefinition, EventKind, NewCustomField, Outcome,
    PrStatus, PullRequest, PullRequestEvent, Review, ReviewState,
};

/// Name of the list field tracking PR state.
pub const PR_FIELD_NAME: &str = "PR";

/// Name of the text field tracking outstanding reviewers.
pub const REVIEW_FIELD_NAME: &str = "Review";

const CHANGES_REQUESTED_GLYPH: &str = "⭕";
const APPROVED_GLYPH: &str = "✅";

// ---------------------------------------------------------------------------
// PR status
// ---------------------------------------------------------------------------

/// Sets the card's `PR` field to `target`.
///
/// When the PR is (re)opened, its URL is attached to the card first.
///
/// # Errors
///
/// - branch errors from [`crate::branch::extract_card_id`],
/// - [`BridgeError::MissingStatusOption`] if the board's `PR` field has no
///   option labelled `target`,
/// - any [`crate::GatewayError`]; a `403` while creating the field is
///   re-messaged to say the Custom Fields Power-Up is disabled.
#[instrument(skip_all, fields(status = %target))]
pub async fn reconcile_pr_status(
    gateway: &dyn CardGateway,
    event: &PullRequestEvent,
    target: PrStatus,
) -> Result<Outcome, BridgeError> {
    let pull_request = event.pull_request.as_ref();
    let card = match card_for_pull_request(EventKind::PullRequest, pull_request)? {
        BranchTarget::Card(card) => card,
        BranchTarget::Ignore { reason } => return Ok(Outcome::Ignored(reason)),
    };

    if target == PrStatus::Open {
        match pull_request.and_then(|pr| pr.html_url.as_deref()) {
            Some(url) => {
                let attachment = gateway.post_url_attachment(&card, url).await?;
                info!(
                    card = %card,
                    location = attachment.location.as_deref().unwrap_or_default(),
                    "Created PR attachment"
                );
            }
            None => warn!(card = %card, "Pull request has no html_url; skipping attachment"),
        }
    }

    let board = gateway.get_board_id(&card).await?;
    let field =
        ensure_custom_field(gateway, &board, NewCustomField::pr_status(PR_FIELD_NAME)).await?;

    let option = field
        .option_labelled(target.label())
        .ok_or(BridgeError::MissingStatusOption { status: target })?;

    let result = gateway
        .set_custom_field_list_value(&card, &field.id, &option.id)
        .await?;
    info!(card = %card, board = %board, "Updated PR status");

    Ok(Outcome::Handled(result))
}

// ---------------------------------------------------------------------------
// Review status
// ---------------------------------------------------------------------------

/// Writes the outstanding reviewers, with a state glyph, to the card's
/// `Review` field.
///
/// `review` is present for `pull_request_review` events only. A review that
/// neither requests changes nor completes approval leaves the card untouched.
///
/// # Errors
///
/// As [`reconcile_pr_status`], minus the missing-option case.
#[instrument(skip_all, fields(event = %kind))]
pub async fn reconcile_review_status(
    gateway: &dyn CardGateway,
    kind: EventKind,
    pull_request: Option<&PullRequest>,
    review: Option<&Review>,
) -> Result<Outcome, BridgeError> {
    let text = match review_text(pull_request, review) {
        ReviewText::Set(text) => text,
        ReviewText::Ignore(reason) => return Ok(Outcome::Ignored(reason)),
    };

    let card = match card_for_pull_request(kind, pull_request)? {
        BranchTarget::Card(card) => card,
        BranchTarget::Ignore { reason } => return Ok(Outcome::Ignored(reason)),
    };

    let board = gateway.get_board_id(&card).await?;
    let field =
        ensure_custom_field(gateway, &board, NewCustomField::text(REVIEW_FIELD_NAME)).await?;

    let result = gateway
        .set_custom_field_text(&card, &field.id, &text)
        .await?;
    info!(card = %card, board = %board, reviewers = %text, "Updated review status");

    Ok(Outcome::Handled(result))
}

/// The `Review` field update a review-related event calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewText {
    /// Write this text; empty clears the field.
    Set(String),
    /// Leave the card alone, for this reason.
    Ignore(String),
}

/// Composes the `Review` field text.
///
/// Reviewer logins are joined with `", "`. `changes_requested` prefixes
/// `⭕`; `approved` prefixes `✅` once no reviewers remain requested.
pub fn review_text(pull_request: Option<&PullRequest>, review: Option<&Review>) -> ReviewText {
    let reviewers: Vec<&str> = pull_request
        .map(|pr| {
            pr.requested_reviewers
                .iter()
                .map(|r| r.login.as_str())
                .collect()
        })
        .unwrap_or_default();
    let joined = reviewers.join(", ");

    let Some(review) = review else {
        return ReviewText::Set(joined);
    };

    match review.state() {
        ReviewState::ChangesRequested => {
            ReviewText::Set(format!("{CHANGES_REQUESTED_GLYPH} {joined}"))
        }
        ReviewState::Approved if reviewers.is_empty() => {
            ReviewText::Set(format!("{APPROVED_GLYPH} {joined}"))
        }
        _ => ReviewText::Ignore(format!(
            "Ignored PR review event for review.state: {}",
            review.state
        )),
    }
}

// ---------------------------------------------------------------------------
// Field definitions
// ---------------------------------------------------------------------------

/// Returns the board's field named like `wanted`, creating it when absent.
async fn ensure_custom_field(
    gateway: &dyn CardGateway,
    board: &BoardId,
    wanted: NewCustomField,
) -> Result<CustomFieldDefinition, BridgeError> {
    let fields = gateway.get_custom_fields(board).await?;

    if let Some(existing) = fields.into_iter().find(|f| f.name == wanted.name) {
        return Ok(existing);
    }

    info!(board = %board, field = %wanted.name, "Creating custom field");
    gateway
        .create_custom_field(board, &wanted)
        .await
        .map_err(|e| BridgeError::from(e.explain_custom_field_forbidden(board)))
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;

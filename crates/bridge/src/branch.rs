//! Branch name → Trello card mapping.
//!
//! Branches name their card by embedding its 8-character shortLink in one of
//! two positions:
//!
//! | Shape | Example | Card |
//! |-------|---------|------|
//! | `<description>#<shortLink>` | `fix-login#nqPiDKmw` | last 8 chars |
//! | `<shortLink>/<description>` | `nqPiDKmw/fix-login` | first 8 chars |
//!
//! Detection uses fixed character offsets (`len - 9` and `8`). Identifiers of
//! any other length are not recognised. This matches Trello's shortLink
//! format and is kept deliberately narrow.

use tracing::debug;

use crate::{BridgeError, CardId, EventKind, PullRequest, PushEvent, WebhookEvent};

const SHORT_LINK_LEN: usize = 8;

/// Branches that never map to a card and are skipped without error.
const LONG_LIVED_BRANCHES: [&str; 2] = ["master", "develop"];

/// Where an event's branch points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchTarget {
    /// The branch names this card.
    Card(CardId),
    /// A long-lived branch; nothing to do.
    Ignore { reason: String },
}

/// Derives the card for a `push`, `pull_request`, or `pull_request_review`
/// event.
///
/// # Errors
///
/// - [`BridgeError::InvalidEvent`] for any other event.
/// - [`BridgeError::MissingBranch`] when the payload has no branch name
///   (a tag push, a PR without `head.ref`).
/// - [`BridgeError::NoIdentifierFound`] when the branch follows neither
///   naming convention.
pub fn extract_card_id(event: &WebhookEvent) -> Result<BranchTarget, BridgeError> {
    match event {
        WebhookEvent::Push(push) => card_for_push(push),
        WebhookEvent::PullRequest(pr) => {
            card_for_pull_request(EventKind::PullRequest, pr.pull_request.as_ref())
        }
        WebhookEvent::PullRequestReview(review) => {
            card_for_pull_request(EventKind::PullRequestReview, review.pull_request.as_ref())
        }
        WebhookEvent::Unsupported { name } => Err(BridgeError::InvalidEvent {
            event: name.clone(),
        }),
    }
}

/// Derives the card from the branch a push updated.
///
/// # Errors
///
/// As [`extract_card_id`].
pub fn card_for_push(push: &PushEvent) -> Result<BranchTarget, BridgeError> {
    match push.branch_name() {
        Some(branch) => card_from_branch(EventKind::Push.as_str(), branch),
        None => Err(BridgeError::MissingBranch {
            event: EventKind::Push.to_string(),
        }),
    }
}

/// Derives the card from a pull request's head branch.
///
/// # Errors
///
/// As [`extract_card_id`]; a missing pull request counts as a missing branch.
pub fn card_for_pull_request(
    kind: EventKind,
    pull_request: Option<&PullRequest>,
) -> Result<BranchTarget, BridgeError> {
    match pull_request.and_then(PullRequest::head_branch) {
        Some(branch) => card_from_branch(kind.as_str(), branch),
        None => Err(BridgeError::MissingBranch {
            event: kind.to_string(),
        }),
    }
}

/// Applies the naming conventions to a bare branch name.
///
/// `event` only flavours the ignore reason.
pub fn card_from_branch(event: &str, branch: &str) -> Result<BranchTarget, BridgeError> {
    let chars: Vec<char> = branch.chars().collect();
    let len = chars.len();

    let short_link: Option<String> = if len > SHORT_LINK_LEN && chars[len - 9] == '#' {
        Some(chars[len - SHORT_LINK_LEN..].iter().collect())
    } else if chars.iter().position(|&c| c == '/') == Some(SHORT_LINK_LEN) {
        Some(chars[..SHORT_LINK_LEN].iter().collect())
    } else {
        None
    };

    if let Some(card) = short_link.and_then(CardId::new) {
        debug!(branch, card = %card, "Resolved card from branch name");
        return Ok(BranchTarget::Card(card));
    }

    if LONG_LIVED_BRANCHES.contains(&branch) {
        return Ok(BranchTarget::Ignore {
            reason: format!("Ignoring {event} event for {branch} branch"),
        });
    }

    Err(BridgeError::NoIdentifierFound {
        branch: branch.to_string(),
    })
}

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;

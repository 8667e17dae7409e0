//! Inbound GitHub webhook events.
//!
//! Payloads are modelled as serde views over the subset of GitHub's webhook
//! JSON that cardhook reads. Fields are optional wherever the operation that
//! consumes them reports its own, more specific error (for example a push
//! without a `head_commit` is rejected by the message formatter, not the
//! parser).

use serde::Deserialize;

use crate::BridgeError;

// ---------------------------------------------------------------------------
// Event envelope
// ---------------------------------------------------------------------------

/// The GitHub event kinds cardhook can derive a card from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Push,
    PullRequest,
    PullRequestReview,
}

impl EventKind {
    /// Maps an `X-GitHub-Event` header value to a supported kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "push" => Some(Self::Push),
            "pull_request" => Some(Self::PullRequest),
            "pull_request_review" => Some(Self::PullRequestReview),
            _ => None,
        }
    }

    /// The `X-GitHub-Event` header value for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::PullRequest => "pull_request",
            Self::PullRequestReview => "pull_request_review",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound webhook delivery, typed by its `X-GitHub-Event` header.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    Push(PushEvent),
    PullRequest(PullRequestEvent),
    PullRequestReview(PullRequestReviewEvent),
    /// Any event cardhook does not act on. The body is never parsed.
    Unsupported { name: String },
}

impl WebhookEvent {
    /// Parses a delivery from its event name and raw JSON body.
    ///
    /// # Errors
    ///
    /// [`BridgeError::MalformedPayload`] if the body of a supported event is
    /// not JSON of the expected shape.
    pub fn parse(name: &str, body: &[u8]) -> Result<Self, BridgeError> {
        let Some(kind) = EventKind::from_name(name) else {
            return Ok(Self::Unsupported {
                name: name.to_string(),
            });
        };

        let malformed = |e: serde_json::Error| BridgeError::MalformedPayload {
            event: name.to_string(),
            message: e.to_string(),
        };

        Ok(match kind {
            EventKind::Push => Self::Push(serde_json::from_slice(body).map_err(malformed)?),
            EventKind::PullRequest => {
                Self::PullRequest(serde_json::from_slice(body).map_err(malformed)?)
            }
            EventKind::PullRequestReview => {
                Self::PullRequestReview(serde_json::from_slice(body).map_err(malformed)?)
            }
        })
    }

    /// The supported kind of this event, if any.
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Push(_) => Some(EventKind::Push),
            Self::PullRequest(_) => Some(EventKind::PullRequest),
            Self::PullRequestReview(_) => Some(EventKind::PullRequestReview),
            Self::Unsupported { .. } => None,
        }
    }

    /// The event name as GitHub sent it.
    pub fn name(&self) -> &str {
        match self {
            Self::Unsupported { name } => name,
            other => other.kind().map(EventKind::as_str).unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// push
// ---------------------------------------------------------------------------

/// `push` event payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PushEvent {
    /// Full ref that was pushed, e.g. `refs/heads/nqPiDKmw/fix-login`.
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// `true` for a force push.
    pub forced: Option<bool>,
    pub repository: Option<Repository>,
    pub pusher: Option<Pusher>,
    pub head_commit: Option<HeadCommit>,
}

impl PushEvent {
    /// Branch name from a `refs/heads/<name>` ref; `None` for tags or a
    /// missing ref.
    pub fn branch_name(&self) -> Option<&str> {
        self.git_ref
            .as_deref()?
            .strip_prefix("refs/heads/")
            .filter(|name| !name.is_empty())
    }

    /// Whether this push rewrote history.
    pub fn is_forced(&self) -> bool {
        self.forced.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Repository {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pusher {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeadCommit {
    pub id: Option<String>,
    pub message: Option<String>,
    pub url: Option<String>,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommitAuthor {
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// pull_request / pull_request_review
// ---------------------------------------------------------------------------

/// `pull_request` event payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequestEvent {
    #[serde(default)]
    pub action: String,
    pub pull_request: Option<PullRequest>,
}

impl PullRequestEvent {
    /// The event's action, classified.
    pub fn action(&self) -> PullRequestAction {
        PullRequestAction::parse(&self.action)
    }

    /// Whether the pull request was merged (only meaningful on `closed`).
    pub fn is_merged(&self) -> bool {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.merged)
            .unwrap_or(false)
    }
}

/// `pull_request_review` event payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequestReviewEvent {
    #[serde(default)]
    pub action: String,
    pub pull_request: Option<PullRequest>,
    pub review: Option<Review>,
}

/// The pull request object shared by both PR event kinds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PullRequest {
    pub html_url: Option<String>,
    pub head: Option<GitRef>,
    pub merged: Option<bool>,
    #[serde(default)]
    pub requested_reviewers: Vec<User>,
}

impl PullRequest {
    /// Name of the PR's head branch.
    pub fn head_branch(&self) -> Option<&str> {
        self.head
            .as_ref()?
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub state: String,
}

impl Review {
    /// The review's state, classified.
    pub fn state(&self) -> ReviewState {
        ReviewState::parse(&self.state)
    }
}

// ---------------------------------------------------------------------------
// Classified string fields
// ---------------------------------------------------------------------------

/// `pull_request` actions cardhook distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Reopened,
    Closed,
    ReviewRequested,
    ReviewRequestRemoved,
    Other(String),
}

impl PullRequestAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => Self::Opened,
            "reopened" => Self::Reopened,
            "closed" => Self::Closed,
            "review_requested" => Self::ReviewRequested,
            "review_request_removed" => Self::ReviewRequestRemoved,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Review states that change a card's `Review` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    ChangesRequested,
    Approved,
    /// `commented`, `dismissed`, and anything GitHub adds later.
    Other(String),
}

impl ReviewState {
    pub fn parse(state: &str) -> Self {
        match state {
            "changes_requested" => Self::ChangesRequested,
            "approved" => Self::Approved,
            other => Self::Other(other.to_string()),
        }
    }
}

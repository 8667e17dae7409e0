//! Card comment text for `push` events.

use crate::{BridgeError, PushEvent};

const SHORT_HASH_LEN: usize = 7;

/// Builds the Markdown comment posted to a card for a push:
///
/// ```text
/// josh pushed [linguist/d1fd619](https://github.com/…/commit/d1fd619…)
///
/// Define Linguist module
///
/// by *josh*
/// ```
///
/// # Errors
///
/// [`BridgeError::IncompletePushPayload`] when the repository name, pusher
/// name, or any head commit field is missing (e.g. a branch deletion, which
/// has no head commit).
pub fn format_push_message(push: &PushEvent) -> Result<String, BridgeError> {
    let incomplete = || BridgeError::IncompletePushPayload {
        reference: push.git_ref.clone().unwrap_or_default(),
    };

    let repo = push
        .repository
        .as_ref()
        .and_then(|r| r.name.as_deref())
        .ok_or_else(incomplete)?;
    let commit = push.head_commit.as_ref().ok_or_else(incomplete)?;
    let pusher = push
        .pusher
        .as_ref()
        .and_then(|p| p.name.as_deref())
        .ok_or_else(incomplete)?;
    let sha = commit.id.as_deref().ok_or_else(incomplete)?;
    let message = commit.message.as_deref().ok_or_else(incomplete)?;
    let url = commit.url.as_deref().ok_or_else(incomplete)?;
    let author = commit
        .author
        .as_ref()
        .and_then(|a| a.name.as_deref())
        .ok_or_else(incomplete)?;

    let verb = if push.is_forced() {
        "force pushed"
    } else {
        "pushed"
    };
    let short_hash: String = sha.chars().take(SHORT_HASH_LEN).collect();

    Ok(format!(
        "{pusher} {verb} [{repo}/{short_hash}]({url})\n\n{message}\n\nby *{author}*"
    ))
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

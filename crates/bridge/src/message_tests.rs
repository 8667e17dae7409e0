use super::*;
use crate::{CommitAuthor, HeadCommit, Pusher, Repository};

const COMMIT_URL: &str =
    "https://github.com/github/linguist/commit/d1fd61921892b63b7c142b07e25ce0b153739293";

fn linguist_push(forced: Option<bool>) -> PushEvent {
    PushEvent {
        git_ref: Some("refs/heads/nqPiDKmw/9-grand-canyon-national-park".to_string()),
        forced,
        repository: Some(Repository {
            name: Some("linguist".to_string()),
        }),
        pusher: Some(Pusher {
            name: Some("josh".to_string()),
        }),
        head_commit: Some(HeadCommit {
            id: Some("d1fd61921892b63b7c142b07e25ce0b153739293".to_string()),
            message: Some("Define Linguist module".to_string()),
            url: Some(COMMIT_URL.to_string()),
            author: Some(CommitAuthor {
                name: Some("octocat".to_string()),
            }),
        }),
    }
}

#[test]
fn test_push_message_layout() {
    let message = format_push_message(&linguist_push(None)).unwrap();
    assert_eq!(
        message,
        format!("josh pushed [linguist/d1fd619]({COMMIT_URL})\n\nDefine Linguist module\n\nby *octocat*")
    );
}

#[test]
fn test_forced_push_says_force_pushed() {
    let message = format_push_message(&linguist_push(Some(true))).unwrap();
    assert!(message.starts_with("josh force pushed [linguist/d1fd619]"));
}

#[test]
fn test_explicitly_unforced_push_says_pushed() {
    let message = format_push_message(&linguist_push(Some(false))).unwrap();
    assert!(message.starts_with("josh pushed [linguist/d1fd619]"));
}

#[test]
fn test_formatting_is_deterministic() {
    let push = linguist_push(Some(true));
    assert_eq!(
        format_push_message(&push).unwrap(),
        format_push_message(&push).unwrap()
    );
}

#[test]
fn test_push_without_head_commit_is_incomplete() {
    let push = PushEvent {
        head_commit: None,
        ..linguist_push(None)
    };
    let err = format_push_message(&push).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No push message generated for refs/heads/nqPiDKmw/9-grand-canyon-national-park"
    );
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_push_without_repository_is_incomplete() {
    let push = PushEvent {
        repository: None,
        ..linguist_push(None)
    };
    assert!(matches!(
        format_push_message(&push),
        Err(BridgeError::IncompletePushPayload { .. })
    ));
}

#[test]
fn test_push_missing_commit_author_is_incomplete() {
    let mut push = linguist_push(None);
    if let Some(commit) = push.head_commit.as_mut() {
        commit.author = None;
    }
    assert!(matches!(
        format_push_message(&push),
        Err(BridgeError::IncompletePushPayload { .. })
    ));
}

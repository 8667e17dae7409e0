use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use bridge::{
    BoardId, CardId, CustomFieldDefinition, CustomFieldId, CustomFieldOptionId, GatewayError,
    NewCustomField,
};
use serde_json::json;
use tower::ServiceExt;

use super::*;

const SECRET: &str = "It's a Secret to Everybody";

/// Answers every comment with a fixed id and records the comment text.
#[derive(Default)]
struct StubGateway {
    comments: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl CardGateway for StubGateway {
    async fn post_comment(&self, card: &CardId, text: &str) -> Result<ActionResult, GatewayError> {
        self.comments
            .lock()
            .unwrap()
            .push((card.to_string(), text.to_string()));
        Ok(ActionResult::created(
            format!("https://trello.com/c/{card}/#comment-c1"),
            json!({ "id": "c1" }),
        ))
    }

    async fn post_url_attachment(
        &self,
        _card: &CardId,
        _url: &str,
    ) -> Result<ActionResult, GatewayError> {
        unimplemented!("not used by these tests")
    }

    async fn get_board_id(&self, _card: &CardId) -> Result<BoardId, GatewayError> {
        unimplemented!("not used by these tests")
    }

    async fn get_custom_fields(
        &self,
        _board: &BoardId,
    ) -> Result<Vec<CustomFieldDefinition>, GatewayError> {
        unimplemented!("not used by these tests")
    }

    async fn create_custom_field(
        &self,
        _board: &BoardId,
        _field: &NewCustomField,
    ) -> Result<CustomFieldDefinition, GatewayError> {
        unimplemented!("not used by these tests")
    }

    async fn set_custom_field_list_value(
        &self,
        _card: &CardId,
        _field: &CustomFieldId,
        _option: &CustomFieldOptionId,
    ) -> Result<ActionResult, GatewayError> {
        unimplemented!("not used by these tests")
    }

    async fn set_custom_field_text(
        &self,
        _card: &CardId,
        _field: &CustomFieldId,
        _text: &str,
    ) -> Result<ActionResult, GatewayError> {
        unimplemented!("not used by these tests")
    }
}

fn state_with(secret: Option<&str>) -> (AppState, Arc<StubGateway>) {
    let gateway = Arc::new(StubGateway::default());
    let state = AppState {
        gateway: gateway.clone(),
        verifier: WebhookVerifier::new(secret.map(str::to_string)),
    };
    (state, gateway)
}

fn push_body(branch: &str) -> Vec<u8> {
    json!({
        "ref": format!("refs/heads/{branch}"),
        "repository": { "name": "linguist" },
        "pusher": { "name": "josh" },
        "head_commit": {
            "id": "d1fd61921892b63b7c142b07e25ce0b153739293",
            "message": "Define Linguist module",
            "author": { "name": "josh" },
            "url": "https://github.com/github/linguist/commit/d1fd61921892b63b7c142b07e25ce0b153739293"
        }
    })
    .to_string()
    .into_bytes()
}

fn signed_request(event: &str, body: Vec<u8>) -> Request<Body> {
    let signature = WebhookVerifier::new(Some(SECRET.to_string()))
        .sign(&body)
        .unwrap();
    Request::post("/")
        .header("X-Hub-Signature", signature)
        .header("X-GitHub-Event", event)
        .header("X-GitHub-Delivery", "72d3162e-cc78-11e3-81ab-4c9367dc0958")
        .header("User-Agent", "GitHub-Hookshot/044aadd")
        .body(Body::from(body))
        .unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = build_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let (state, _) = state_with(Some(SECRET));

    let (status, _, body) = send(state, Request::get("/").body(Body::empty()).unwrap()).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, "Only POST requests are accepted");
}

#[tokio::test]
async fn test_missing_headers_are_named() {
    let cases = [
        ("X-Hub-Signature", "Must provide X-Hub-Signature header"),
        ("X-GitHub-Event", "Must provide X-GitHub-Event header"),
        ("X-GitHub-Delivery", "Must provide X-GitHub-Delivery header"),
    ];
    for (removed, expected) in cases {
        let (state, _) = state_with(Some(SECRET));
        let mut request = signed_request("push", push_body("nqPiDKmw/fix"));
        request.headers_mut().remove(removed);

        let (status, _, body) = send(state, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "without {removed}");
        assert_eq!(body, expected);
    }
}

#[tokio::test]
async fn test_bad_signature_is_forbidden() {
    let (state, gateway) = state_with(Some(SECRET));
    let mut request = signed_request("push", push_body("nqPiDKmw/fix"));
    request
        .headers_mut()
        .insert("X-Hub-Signature", "sha1=0000".parse().unwrap());

    let (status, _, body) = send(state, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "X-Hub-Signature mis-match");
    assert!(gateway.comments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_secret_fails_every_delivery() {
    let (state, gateway) = state_with(None);

    let (status, _, _) = send(state, signed_request("push", push_body("nqPiDKmw/fix"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(gateway.comments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let (state, _) = state_with(Some(SECRET));

    let (status, _, _) = send(state, signed_request("push", b"not json".to_vec())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Dispatch outcomes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_push_creates_comment() {
    let (state, gateway) = state_with(Some(SECRET));

    let (status, headers, body) = send(
        state,
        signed_request("push", push_body("nqPiDKmw/9-grand-canyon-national-park")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers.get(header::LOCATION).unwrap(),
        "https://trello.com/c/nqPiDKmw/#comment-c1"
    );
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        json!({ "id": "c1" })
    );

    let comments = gateway.comments.lock().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].0, "nqPiDKmw");
    assert!(comments[0].1.starts_with("josh pushed [linguist/d1fd619]("));
}

#[tokio::test]
async fn test_unsupported_event_is_ignored() {
    let (state, gateway) = state_with(Some(SECRET));

    let (status, _, body) = send(state, signed_request("issues", b"{}".to_vec())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Ignored unsupported event: issues");
    assert!(gateway.comments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_push_to_master_is_ignored() {
    let (state, gateway) = state_with(Some(SECRET));

    let (status, _, body) = send(state, signed_request("push", push_body("master"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Ignoring push event for master branch");
    assert!(gateway.comments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_branch_without_card_is_bad_request() {
    let (state, _) = state_with(Some(SECRET));

    let (status, _, body) = send(state, signed_request("push", push_body("feature-x"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "No shortLink found in branch feature-x");
}

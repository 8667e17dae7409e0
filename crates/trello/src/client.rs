use async_trait::async_trait;
use bridge::{
    ActionResult, BoardId, CardGateway, CardId, CustomFieldDefinition, CustomFieldId,
    CustomFieldOptionId, GatewayError, NewCustomField, NewFieldOption,
};
use reqwest::{header::CONTENT_TYPE, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

/// Production Trello API host.
pub const TRELLO_API_URL: &str = "https://api.trello.com";

/// Public card URL that comment and attachment locations are built from.
const TRELLO_CARD_URL: &str = "https://trello.com/c";

const USER_AGENT: &str = concat!("cardhook/", env!("CARGO_PKG_VERSION"));

/// API key and token for a Trello account.
#[derive(Clone)]
pub struct TrelloCredentials {
    pub api_key: String,
    pub token: String,
}

impl std::fmt::Debug for TrelloCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloCredentials")
            .field("api_key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Trello REST client.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: String,
    credentials: TrelloCredentials,
}

/// Body of `POST /1/customFields`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCustomFieldRequest<'a> {
    id_model: &'a str,
    model_type: &'static str,
    name: &'a str,
    #[serde(rename = "type")]
    field_type: &'static str,
    pos: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    options: &'a [NewFieldOption],
    #[serde(rename = "display_cardFront")]
    display_card_front: bool,
}

impl TrelloClient {
    /// Creates a client for the production Trello API.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Transport`] if the HTTP client cannot be constructed
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(credentials: TrelloCredentials) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: TRELLO_API_URL.to_string(),
            credentials,
        })
    }

    /// Points the client at another host (a proxy or a test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/1{}", self.base_url, path)
    }

    /// Authenticates, sends, and decodes one request.
    async fn send(&self, request: RequestBuilder) -> Result<Value, GatewayError> {
        let response = request
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("token", self.credentials.token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        let text = response.text().await.map_err(|e| GatewayError::Transport {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("Error").to_string()
            } else {
                text
            };
            debug!(status = status.as_u16(), %message, "Trello returned an error");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        if is_json {
            serde_json::from_str(&text).map_err(|e| GatewayError::InvalidResponse {
                message: e.to_string(),
            })
        } else {
            Ok(Value::String(text))
        }
    }
}

/// Reads the `id` every Trello create response carries.
fn id_of(body: &Value) -> Result<&str, GatewayError> {
    body.get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| GatewayError::InvalidResponse {
            message: "response has no id".to_string(),
        })
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, GatewayError> {
    serde_json::from_value(body).map_err(|e| GatewayError::InvalidResponse {
        message: e.to_string(),
    })
}

#[async_trait]
impl CardGateway for TrelloClient {
    #[instrument(skip_all, fields(card = %card))]
    async fn post_comment(&self, card: &CardId, text: &str) -> Result<ActionResult, GatewayError> {
        let request = self
            .http
            .post(self.url(&format!("/cards/{card}/actions/comments")))
            .form(&[("text", text)]);
        let body = self.send(request).await?;

        let location = format!("{TRELLO_CARD_URL}/{card}/#comment-{}", id_of(&body)?);
        Ok(ActionResult::created(location, body))
    }

    #[instrument(skip_all, fields(card = %card))]
    async fn post_url_attachment(
        &self,
        card: &CardId,
        url: &str,
    ) -> Result<ActionResult, GatewayError> {
        let request = self
            .http
            .post(self.url(&format!("/cards/{card}/attachments")))
            .form(&[("url", url)]);
        let body = self.send(request).await?;

        let location = format!("{TRELLO_CARD_URL}/{card}/#action-{}", id_of(&body)?);
        Ok(ActionResult::created(location, body))
    }

    #[instrument(skip_all, fields(card = %card))]
    async fn get_board_id(&self, card: &CardId) -> Result<BoardId, GatewayError> {
        let request = self
            .http
            .get(self.url(&format!("/cards/{card}/board")))
            .query(&[("fields", "id")]);
        let body = self.send(request).await?;

        BoardId::new(id_of(&body)?).ok_or_else(|| GatewayError::InvalidResponse {
            message: "board id is empty".to_string(),
        })
    }

    #[instrument(skip_all, fields(board = %board))]
    async fn get_custom_fields(
        &self,
        board: &BoardId,
    ) -> Result<Vec<CustomFieldDefinition>, GatewayError> {
        let request = self
            .http
            .get(self.url(&format!("/boards/{board}/customFields")));
        decode(self.send(request).await?)
    }

    #[instrument(skip_all, fields(board = %board, name = %field.name))]
    async fn create_custom_field(
        &self,
        board: &BoardId,
        field: &NewCustomField,
    ) -> Result<CustomFieldDefinition, GatewayError> {
        let payload = CreateCustomFieldRequest {
            id_model: board.as_str(),
            model_type: "board",
            name: &field.name,
            field_type: field.field_type.as_str(),
            pos: &field.position,
            options: &field.options,
            display_card_front: field.show_on_front,
        };
        let request = self.http.post(self.url("/customFields")).json(&payload);
        decode(self.send(request).await?)
    }

    #[instrument(skip_all, fields(card = %card, field = %field))]
    async fn set_custom_field_list_value(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        option: &CustomFieldOptionId,
    ) -> Result<ActionResult, GatewayError> {
        let request = self
            .http
            .put(self.url(&format!("/card/{card}/customField/{field}/item")))
            .form(&[("idValue", option.as_str())]);
        Ok(ActionResult::without_location(self.send(request).await?))
    }

    #[instrument(skip_all, fields(card = %card, field = %field))]
    async fn set_custom_field_text(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        text: &str,
    ) -> Result<ActionResult, GatewayError> {
        // Trello clears a field when `value` is an empty string.
        let payload = if text.is_empty() {
            json!({ "value": "" })
        } else {
            json!({ "value": { "text": text } })
        };
        let request = self
            .http
            .put(self.url(&format!("/card/{card}/customField/{field}/item")))
            .json(&payload);
        Ok(ActionResult::without_location(self.send(request).await?))
    }
}

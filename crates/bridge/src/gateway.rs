//! The port through which the domain acts on Trello cards.
//!
//! Implemented by `trello::TrelloClient` in production and by an in-memory
//! recorder in tests. Every method is exactly one remote call; sequencing and
//! the create-if-absent protocol live in [`crate::reconcile`].

use async_trait::async_trait;

use crate::{
    ActionResult, BoardId, CardId, CustomFieldDefinition, CustomFieldId, CustomFieldOptionId,
    GatewayError, NewCustomField,
};

/// Card, board, and custom-field operations on Trello.
#[async_trait]
pub trait CardGateway: Send + Sync {
    /// Posts a Markdown comment. The result's location points at the comment.
    async fn post_comment(&self, card: &CardId, text: &str) -> Result<ActionResult, GatewayError>;

    /// Attaches a URL. The result's location points at the attachment action.
    async fn post_url_attachment(
        &self,
        card: &CardId,
        url: &str,
    ) -> Result<ActionResult, GatewayError>;

    /// Resolves the board a card lives on.
    async fn get_board_id(&self, card: &CardId) -> Result<BoardId, GatewayError>;

    /// Lists the board's custom field definitions, fresh from Trello.
    async fn get_custom_fields(
        &self,
        board: &BoardId,
    ) -> Result<Vec<CustomFieldDefinition>, GatewayError>;

    /// Creates a custom field definition on the board.
    ///
    /// Trello answers `403` when the board lacks the Custom Fields Power-Up.
    async fn create_custom_field(
        &self,
        board: &BoardId,
        field: &NewCustomField,
    ) -> Result<CustomFieldDefinition, GatewayError>;

    /// Selects one option of a list-type field on the card.
    async fn set_custom_field_list_value(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        option: &CustomFieldOptionId,
    ) -> Result<ActionResult, GatewayError>;

    /// Sets a text field on the card. Empty `text` clears the field.
    async fn set_custom_field_text(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        text: &str,
    ) -> Result<ActionResult, GatewayError>;
}

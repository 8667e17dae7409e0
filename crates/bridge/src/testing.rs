//! In-memory [`CardGateway`] that records every call, for reconciler and
//! dispatcher tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::{
    ActionResult, BoardId, CardGateway, CardId, CustomFieldDefinition, CustomFieldId,
    CustomFieldOption, CustomFieldOptionId, GatewayError, NewCustomField,
};

pub(crate) const BOARD: &str = "5b61cb39d057323aaa8500b8";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    PostComment { card: String, text: String },
    PostUrlAttachment { card: String, url: String },
    GetBoardId { card: String },
    GetCustomFields { board: String },
    CreateCustomField { board: String, field: NewCustomField },
    SetListValue { card: String, field: String, option: String },
    SetText { card: String, field: String, text: String },
}

pub(crate) struct RecordingGateway {
    fields: Mutex<Vec<CustomFieldDefinition>>,
    create_error: Option<GatewayError>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingGateway {
    /// A board with no custom fields.
    pub(crate) fn empty_board() -> Self {
        Self::with_fields(Vec::new())
    }

    pub(crate) fn with_fields(fields: Vec<CustomFieldDefinition>) -> Self {
        Self {
            fields: Mutex::new(fields),
            create_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Field creation fails with `error`.
    pub(crate) fn failing_create(error: GatewayError) -> Self {
        Self {
            create_error: Some(error),
            ..Self::empty_board()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn creations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateCustomField { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// The definition Trello returns after creating `field` on [`BOARD`].
pub(crate) fn created_definition(field: &NewCustomField) -> CustomFieldDefinition {
    let id = CustomFieldId::new(format!("field-{}", field.name)).unwrap();
    let options = field
        .options
        .iter()
        .map(|o| CustomFieldOption {
            id: CustomFieldOptionId::new(format!("option-{}", o.value.text)).unwrap(),
            id_custom_field: Some(id.clone()),
            value: o.value.clone(),
            color: Some(o.color.clone()),
            pos: Some(f64::from(o.pos)),
        })
        .collect();

    CustomFieldDefinition {
        id,
        name: field.name.clone(),
        field_type: field.field_type,
        options,
    }
}

#[async_trait]
impl CardGateway for RecordingGateway {
    async fn post_comment(&self, card: &CardId, text: &str) -> Result<ActionResult, GatewayError> {
        self.record(Call::PostComment {
            card: card.to_string(),
            text: text.to_string(),
        });
        Ok(ActionResult::created(
            format!("https://trello.com/c/{card}/#comment-560bf4df7139286471dc009e"),
            json!({ "id": "560bf4df7139286471dc009e" }),
        ))
    }

    async fn post_url_attachment(
        &self,
        card: &CardId,
        url: &str,
    ) -> Result<ActionResult, GatewayError> {
        self.record(Call::PostUrlAttachment {
            card: card.to_string(),
            url: url.to_string(),
        });
        Ok(ActionResult::created(
            format!("https://trello.com/c/{card}/#action-560bf4df7139286471dc009e"),
            json!({ "id": "560bf4df7139286471dc009e" }),
        ))
    }

    async fn get_board_id(&self, card: &CardId) -> Result<BoardId, GatewayError> {
        self.record(Call::GetBoardId {
            card: card.to_string(),
        });
        Ok(BoardId::new(BOARD).unwrap())
    }

    async fn get_custom_fields(
        &self,
        board: &BoardId,
    ) -> Result<Vec<CustomFieldDefinition>, GatewayError> {
        self.record(Call::GetCustomFields {
            board: board.to_string(),
        });
        Ok(self.fields.lock().unwrap().clone())
    }

    async fn create_custom_field(
        &self,
        board: &BoardId,
        field: &NewCustomField,
    ) -> Result<CustomFieldDefinition, GatewayError> {
        self.record(Call::CreateCustomField {
            board: board.to_string(),
            field: field.clone(),
        });
        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }
        let definition = created_definition(field);
        self.fields.lock().unwrap().push(definition.clone());
        Ok(definition)
    }

    async fn set_custom_field_list_value(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        option: &CustomFieldOptionId,
    ) -> Result<ActionResult, GatewayError> {
        self.record(Call::SetListValue {
            card: card.to_string(),
            field: field.to_string(),
            option: option.to_string(),
        });
        Ok(ActionResult::without_location(
            json!({ "idCustomField": field.as_str(), "idValue": option.as_str(), "modelType": "card" }),
        ))
    }

    async fn set_custom_field_text(
        &self,
        card: &CardId,
        field: &CustomFieldId,
        text: &str,
    ) -> Result<ActionResult, GatewayError> {
        self.record(Call::SetText {
            card: card.to_string(),
            field: field.to_string(),
            text: text.to_string(),
        });
        Ok(ActionResult::without_location(
            json!({ "idCustomField": field.as_str(), "modelType": "card" }),
        ))
    }
}

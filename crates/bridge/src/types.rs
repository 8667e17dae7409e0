//! Shared value types: action results, PR status, and the Trello
//! custom-field schema as seen by the reconcilers.

use serde::{Deserialize, Serialize};

use crate::{CustomFieldId, CustomFieldOptionId};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// The uniform result of every card mutation.
///
/// `location` is set when the mutation created a new, addressable resource
/// (a comment or an attachment); the listener answers `201 Created` with a
/// `Location` header in that case and `200 OK` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// URI of the resource created by the action, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Parsed JSON returned by the remote service.
    pub body: serde_json::Value,
}

impl ActionResult {
    /// A result that did not create an addressable resource.
    pub fn without_location(body: serde_json::Value) -> Self {
        Self {
            location: None,
            body,
        }
    }

    /// A result that created the resource at `location`.
    pub fn created(location: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            location: Some(location.into()),
            body,
        }
    }
}

/// What handling one event amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// One or more remote actions were performed; this is the final one.
    Handled(ActionResult),
    /// The event was recognised but needs no action.
    Ignored(String),
}

impl Outcome {
    /// Builds an [`Outcome::Ignored`] from any displayable reason.
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored(reason.into())
    }
}

// ---------------------------------------------------------------------------
// PR lifecycle
// ---------------------------------------------------------------------------

/// Value of a card's `PR` custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrStatus {
    Open,
    Closed,
    Merged,
}

impl PrStatus {
    /// Every status, in the order their options are created on a board.
    pub const ALL: [PrStatus; 3] = [PrStatus::Open, PrStatus::Closed, PrStatus::Merged];

    /// The option label used on the Trello board.
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Merged => "Merged",
        }
    }

    /// Option colour on the Trello board.
    pub fn color(self) -> &'static str {
        match self {
            Self::Open => "green",
            Self::Closed => "red",
            Self::Merged => "purple",
        }
    }

    /// Option position on the Trello board.
    pub fn position(self) -> u32 {
        match self {
            Self::Open => 1024,
            Self::Closed => 2048,
            Self::Merged => 4096,
        }
    }
}

impl std::fmt::Display for PrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Custom fields
// ---------------------------------------------------------------------------

/// Kind of a Trello custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    /// Drop-down list of coloured options.
    List,
    /// Free text.
    Text,
    /// Checkbox, date, number: never created by cardhook.
    #[serde(other)]
    Other,
}

impl CustomFieldType {
    /// Name Trello uses for this type on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Text => "text",
            Self::Other => "other",
        }
    }
}

/// Text payload of a list option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub text: String,
}

/// One option of a list-type custom field, as stored by Trello.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldOption {
    pub id: CustomFieldOptionId,
    #[serde(default)]
    pub id_custom_field: Option<CustomFieldId>,
    pub value: OptionValue,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub pos: Option<f64>,
}

impl CustomFieldOption {
    /// The option's label.
    pub fn label(&self) -> &str {
        &self.value.text
    }
}

/// A board-level custom field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    pub id: CustomFieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
    #[serde(default)]
    pub options: Vec<CustomFieldOption>,
}

impl CustomFieldDefinition {
    /// Finds the list option whose label is exactly `label`.
    pub fn option_labelled(&self, label: &str) -> Option<&CustomFieldOption> {
        self.options.iter().find(|o| o.label() == label)
    }
}

/// An option to create alongside a new list-type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFieldOption {
    pub color: String,
    pub value: OptionValue,
    pub pos: u32,
}

/// A custom field definition to create on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomField {
    pub name: String,
    pub field_type: CustomFieldType,
    pub options: Vec<NewFieldOption>,
    /// Trello position keyword or number; new fields go to the `"top"`.
    pub position: String,
    /// Whether the field's value is shown on the card front.
    pub show_on_front: bool,
}

impl NewCustomField {
    /// The `PR` list field with its Open / Closed / Merged options.
    pub fn pr_status(name: &str) -> Self {
        let options = PrStatus::ALL
            .iter()
            .map(|status| NewFieldOption {
                color: status.color().to_string(),
                value: OptionValue {
                    text: status.label().to_string(),
                },
                pos: status.position(),
            })
            .collect();

        Self {
            name: name.to_string(),
            field_type: CustomFieldType::List,
            options,
            position: "top".to_string(),
            show_on_front: true,
        }
    }

    /// A free-text field.
    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: CustomFieldType::Text,
            options: Vec::new(),
            position: "top".to_string(),
            show_on_front: true,
        }
    }
}

//! Newtype identifiers for Trello resources.
//!
//! Trello hands out opaque string identifiers for cards, boards, custom
//! fields, and custom-field options. Each gets a distinct newtype so a
//! [`BoardId`] can never be passed where a [`CardId`] is expected, even
//! though both are strings under the hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// A Trello card's shortLink (e.g. `"nqPiDKmw"`).
    ///
    /// Only produced by [`crate::branch::extract_card_id`]; the branch-name
    /// conventions it understands always yield exactly 8 characters.
    CardId
}

string_id! {
    /// The full Trello id of the board a card belongs to.
    BoardId
}

string_id! {
    /// Identifies a board-level custom field definition.
    CustomFieldId
}

string_id! {
    /// Identifies one option of a list-type custom field.
    CustomFieldOptionId
}

//! Menu domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A menu category of an event, e.g. "Entree".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuItem {
    pub menu_item_id: Uuid,
    pub event_id: Uuid,
    pub item_order: i32,
    pub name: String,
    /// Maximum number of options one guest may pick for this item.
    pub num_choices: i32,
    pub options: Vec<MenuItemOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuItemOption {
    pub menu_item_option_id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub description: String,
}

/// A stored selection of one option by one guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuChoice {
    pub menu_choice_id: Uuid,
    pub guest_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_option_id: Uuid,
}

/// A selection as submitted by a client.
///
/// `menu_item_id` is optional; when present it must name the item that owns the
/// option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuChoiceInput {
    #[serde(default)]
    pub menu_item_id: Option<Uuid>,
    pub menu_item_option_id: Uuid,
}

/// A selection that passed validation, resolved to its owning item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedChoice {
    pub menu_item_id: Uuid,
    pub menu_item_option_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MenuNote {
    pub menu_note_id: Uuid,
    pub guest_id: Uuid,
    pub note_body: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SetMenuNoteRequest {
    #[validate(length(max = 2000, message = "note_body must be at most 2000 characters"))]
    pub note_body: String,
}

/// Request to add a menu item with its options to an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMenuItemRequest {
    #[serde(default)]
    #[validate(range(min = 0, message = "item_order must not be negative"))]
    pub item_order: i32,

    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[validate(range(min = 0, max = 50, message = "num_choices must be between 0 and 50"))]
    pub num_choices: i32,

    #[validate(length(min = 1, message = "at least one option is required"), nested)]
    pub options: Vec<CreateMenuItemOptionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateMenuItemOptionRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: String,
}

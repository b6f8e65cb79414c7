//! Guest domain models.
//!
//! A guest is the person behind either an invitee or one of an invitee's
//! friends. Menu choices and the menu note hang off the guest.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::menu::MenuChoice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
    pub guest_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub attending: bool,
    #[serde(default)]
    pub menu_choices: Vec<MenuChoice>,
    #[serde(default)]
    pub menu_note: Option<String>,
}

/// Editable guest fields.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct GuestInput {
    #[validate(length(min = 1, max = 100, message = "first_name must be 1-100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "last_name must be 1-100 characters"))]
    pub last_name: String,

    #[serde(default)]
    pub attending: bool,
}

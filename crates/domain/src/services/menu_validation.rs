//! Menu choice validation.
//!
//! Decides whether a submitted set of menu choices is admissible for an event's
//! menu before anything is written. Pure and synchronous, so it is safe to run
//! as a dry run.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{MenuChoiceInput, MenuItem, ValidatedChoice};

/// First violation found in a submitted choice list.
///
/// `index` is the position of the offending choice in the submission.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MenuViolation {
    #[error("menu_choices[{index}]: option {option_id} does not belong to this event's menu")]
    UnknownOption { index: usize, option_id: Uuid },

    #[error("menu_choices[{index}]: option {option_id} does not belong to menu item {claimed_item_id}")]
    OptionNotInItem {
        index: usize,
        option_id: Uuid,
        claimed_item_id: Uuid,
    },

    #[error("menu_choices[{index}]: menu item {menu_item_id} allows {allowed} choice(s), got {submitted}")]
    TooManyChoicesForItem {
        index: usize,
        menu_item_id: Uuid,
        allowed: i32,
        submitted: i32,
    },
}

impl MenuViolation {
    /// Position of the offending choice.
    pub fn index(&self) -> usize {
        match self {
            MenuViolation::UnknownOption { index, .. }
            | MenuViolation::OptionNotInItem { index, .. }
            | MenuViolation::TooManyChoicesForItem { index, .. } => *index,
        }
    }

    /// Short machine-readable name of the violation.
    pub fn kind(&self) -> &'static str {
        match self {
            MenuViolation::UnknownOption { .. } => "unknown_option",
            MenuViolation::OptionNotInItem { .. } => "option_not_in_item",
            MenuViolation::TooManyChoicesForItem { .. } => "too_many_choices_for_item",
        }
    }
}

/// Validates `choices` against the event's `menu_items`.
///
/// Each choice is matched to the first item (in the given order) that owns its
/// option. Every item keeps its own counter, and a counter passing the item's
/// `num_choices` rejects the submission on the spot. An empty submission is
/// always admissible.
///
/// On success, returns the choices resolved to the item that owns each option,
/// in submission order.
pub fn validate_menu_choices(
    choices: &[MenuChoiceInput],
    menu_items: &[MenuItem],
) -> Result<Vec<ValidatedChoice>, MenuViolation> {
    let mut used = vec![0i32; menu_items.len()];
    let mut validated = Vec::with_capacity(choices.len());

    for (index, choice) in choices.iter().enumerate() {
        let option_id = choice.menu_item_option_id;

        let (slot, item) = menu_items
            .iter()
            .enumerate()
            .find(|(_, item)| {
                item.options
                    .iter()
                    .any(|option| option.menu_item_option_id == option_id)
            })
            .ok_or(MenuViolation::UnknownOption { index, option_id })?;

        if let Some(claimed_item_id) = choice.menu_item_id {
            if claimed_item_id != item.menu_item_id {
                return Err(MenuViolation::OptionNotInItem {
                    index,
                    option_id,
                    claimed_item_id,
                });
            }
        }

        used[slot] += 1;
        if used[slot] > item.num_choices {
            return Err(MenuViolation::TooManyChoicesForItem {
                index,
                menu_item_id: item.menu_item_id,
                allowed: item.num_choices,
                submitted: used[slot],
            });
        }

        validated.push(ValidatedChoice {
            menu_item_id: item.menu_item_id,
            menu_item_option_id: option_id,
        });
    }

    Ok(validated)
}

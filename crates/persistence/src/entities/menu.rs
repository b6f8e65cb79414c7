//! Menu entities (database row mappings).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the menu_items table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemEntity {
    pub menu_item_id: Uuid,
    pub event_id: Uuid,
    pub item_order: i32,
    pub name: String,
    pub num_choices: i32,
}

/// Database row mapping for the menu_item_options table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemOptionEntity {
    pub menu_item_option_id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<MenuItemOptionEntity> for domain::models::MenuItemOption {
    fn from(entity: MenuItemOptionEntity) -> Self {
        Self {
            menu_item_option_id: entity.menu_item_option_id,
            menu_item_id: entity.menu_item_id,
            name: entity.name,
            description: entity.description,
        }
    }
}

impl MenuItemEntity {
    /// Builds the domain item, taking the options that belong to it.
    pub fn into_domain(self, options: Vec<MenuItemOptionEntity>) -> domain::models::MenuItem {
        domain::models::MenuItem {
            menu_item_id: self.menu_item_id,
            event_id: self.event_id,
            item_order: self.item_order,
            name: self.name,
            num_choices: self.num_choices,
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Database row mapping for the menu_choices table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuChoiceEntity {
    pub menu_choice_id: Uuid,
    pub guest_id: Uuid,
    pub menu_item_id: Uuid,
    pub menu_item_option_id: Uuid,
}

impl From<MenuChoiceEntity> for domain::models::MenuChoice {
    fn from(entity: MenuChoiceEntity) -> Self {
        Self {
            menu_choice_id: entity.menu_choice_id,
            guest_id: entity.guest_id,
            menu_item_id: entity.menu_item_id,
            menu_item_option_id: entity.menu_item_option_id,
        }
    }
}

/// Database row mapping for the menu_notes table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuNoteEntity {
    pub menu_note_id: Uuid,
    pub guest_id: Uuid,
    pub note_body: String,
}

impl From<MenuNoteEntity> for domain::models::MenuNote {
    fn from(entity: MenuNoteEntity) -> Self {
        Self {
            menu_note_id: entity.menu_note_id,
            guest_id: entity.guest_id,
            note_body: entity.note_body,
        }
    }
}

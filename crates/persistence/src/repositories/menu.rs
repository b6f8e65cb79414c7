//! Menu repository for database operations.

use domain::models::{CreateMenuItemRequest, ValidatedChoice};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MenuChoiceEntity, MenuItemEntity, MenuItemOptionEntity, MenuNoteEntity};
use crate::metrics::QueryTimer;

/// Repository for menu items, options, guest choices and notes.
#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    /// Creates a new MenuRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Menu items for an event ordered for display.
    pub async fn items_for_event(&self, event_id: Uuid) -> Result<Vec<MenuItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("menu_items_for_event");
        let result = sqlx::query_as::<_, MenuItemEntity>(
            r#"
            SELECT menu_item_id, event_id, item_order, name, num_choices
            FROM menu_items
            WHERE event_id = $1
            ORDER BY item_order, created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn options_for_items(
        &self,
        menu_item_ids: &[Uuid],
    ) -> Result<Vec<MenuItemOptionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("menu_item_options_for_items");
        let result = sqlx::query_as::<_, MenuItemOptionEntity>(
            r#"
            SELECT menu_item_option_id, menu_item_id, name, description
            FROM menu_item_options
            WHERE menu_item_id = ANY($1)
            ORDER BY created_at, menu_item_option_id
            "#,
        )
        .bind(menu_item_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a menu item with its options atomically.
    pub async fn create_menu_item(
        &self,
        event_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<(MenuItemEntity, Vec<MenuItemOptionEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_menu_item");

        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, MenuItemEntity>(
            r#"
            INSERT INTO menu_items (event_id, item_order, name, num_choices)
            VALUES ($1, $2, $3, $4)
            RETURNING menu_item_id, event_id, item_order, name, num_choices
            "#,
        )
        .bind(event_id)
        .bind(request.item_order)
        .bind(&request.name)
        .bind(request.num_choices)
        .fetch_one(&mut *tx)
        .await?;

        let mut options = Vec::with_capacity(request.options.len());
        for option in &request.options {
            let row = sqlx::query_as::<_, MenuItemOptionEntity>(
                r#"
                INSERT INTO menu_item_options (menu_item_id, name, description)
                VALUES ($1, $2, $3)
                RETURNING menu_item_option_id, menu_item_id, name, description
                "#,
            )
            .bind(item.menu_item_id)
            .bind(&option.name)
            .bind(&option.description)
            .fetch_one(&mut *tx)
            .await?;
            options.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok((item, options))
    }

    /// Replace every menu choice a guest holds with the given set.
    pub async fn replace_guest_choices(
        &self,
        guest_id: Uuid,
        choices: &[ValidatedChoice],
    ) -> Result<Vec<MenuChoiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("replace_guest_menu_choices");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM menu_choices WHERE guest_id = $1
            "#,
        )
        .bind(guest_id)
        .execute(&mut *tx)
        .await?;

        let mut stored = Vec::with_capacity(choices.len());
        for choice in choices {
            let row = sqlx::query_as::<_, MenuChoiceEntity>(
                r#"
                INSERT INTO menu_choices (guest_id, menu_item_id, menu_item_option_id)
                VALUES ($1, $2, $3)
                RETURNING menu_choice_id, guest_id, menu_item_id, menu_item_option_id
                "#,
            )
            .bind(guest_id)
            .bind(choice.menu_item_id)
            .bind(choice.menu_item_option_id)
            .fetch_one(&mut *tx)
            .await?;
            stored.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok(stored)
    }

    pub async fn choices_for_guests(
        &self,
        guest_ids: &[Uuid],
    ) -> Result<Vec<MenuChoiceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("menu_choices_for_guests");
        let result = sqlx::query_as::<_, MenuChoiceEntity>(
            r#"
            SELECT menu_choice_id, guest_id, menu_item_id, menu_item_option_id
            FROM menu_choices
            WHERE guest_id = ANY($1)
            ORDER BY created_at, menu_choice_id
            "#,
        )
        .bind(guest_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Set a guest's menu note, replacing any previous one.
    pub async fn upsert_note(
        &self,
        guest_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNoteEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_menu_note");
        let result = sqlx::query_as::<_, MenuNoteEntity>(
            r#"
            INSERT INTO menu_notes (guest_id, note_body)
            VALUES ($1, $2)
            ON CONFLICT (guest_id)
            DO UPDATE SET note_body = EXCLUDED.note_body, updated_at = NOW()
            RETURNING menu_note_id, guest_id, note_body
            "#,
        )
        .bind(guest_id)
        .bind(note_body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn notes_for_guests(
        &self,
        guest_ids: &[Uuid],
    ) -> Result<Vec<MenuNoteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("menu_notes_for_guests");
        let result = sqlx::query_as::<_, MenuNoteEntity>(
            r#"
            SELECT menu_note_id, guest_id, note_body
            FROM menu_notes
            WHERE guest_id = ANY($1)
            "#,
        )
        .bind(guest_ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: MenuRepository tests require database connection and are covered by integration tests
}

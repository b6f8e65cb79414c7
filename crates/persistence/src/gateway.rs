//! PostgreSQL implementation of the invitation gateway.
//!
//! Composes the repositories and assembles invitees from their rows in bulk:
//! one query per child table for a whole page, never one per invitee.

use std::collections::HashMap;

use async_trait::async_trait;
use domain::models::{
    CreateEventRequest, CreateInviteeRequest, CreateMenuItemRequest, Event, EventStats, Guest,
    GuestInput, Invitee, InviteeFriend, InviteeSeatingRequest, MenuChoice, MenuItem, MenuNote,
    SeatingTarget, User, UserCredentials, ValidatedChoice,
};
use domain::services::{GatewayError, InvitationGateway};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{GuestEntity, InviteeEntity, MenuItemOptionEntity};
use crate::repositories::{
    EventRepository, InviteeRepository, MenuRepository, SeatingRepository, UserRepository,
};

/// Gateway backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgGateway {
    users: UserRepository,
    events: EventRepository,
    invitees: InviteeRepository,
    menus: MenuRepository,
    seating: SeatingRepository,
}

/// Menu state of a set of guests, keyed by guest id.
#[derive(Default)]
struct GuestMenus {
    choices: HashMap<Uuid, Vec<MenuChoice>>,
    notes: HashMap<Uuid, String>,
}

impl GuestMenus {
    fn guest(&mut self, entity: GuestEntity) -> Guest {
        Guest {
            guest_id: entity.guest_id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            attending: entity.attending,
            menu_choices: self.choices.remove(&entity.guest_id).unwrap_or_default(),
            menu_note: self.notes.remove(&entity.guest_id),
        }
    }
}

fn not_found(what: &str) -> GatewayError {
    GatewayError::NotFound(what.to_string())
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            invitees: InviteeRepository::new(pool.clone()),
            menus: MenuRepository::new(pool.clone()),
            seating: SeatingRepository::new(pool),
        }
    }

    async fn load_guest_menus(&self, guest_ids: &[Uuid]) -> Result<GuestMenus, GatewayError> {
        let mut menus = GuestMenus::default();
        if guest_ids.is_empty() {
            return Ok(menus);
        }

        for choice in self.menus.choices_for_guests(guest_ids).await? {
            menus
                .choices
                .entry(choice.guest_id)
                .or_default()
                .push(choice.into());
        }
        for note in self.menus.notes_for_guests(guest_ids).await? {
            menus.notes.insert(note.guest_id, note.note_body);
        }

        Ok(menus)
    }

    /// Builds full invitees from their rows, preserving row order.
    async fn assemble_invitees(
        &self,
        rows: Vec<InviteeEntity>,
    ) -> Result<Vec<Invitee>, GatewayError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let invitee_ids: Vec<Uuid> = rows.iter().map(|row| row.invitee_id).collect();
        let friend_rows = self.invitees.friends_for_invitees(&invitee_ids).await?;
        let request_rows = self.seating.requests_for_invitees(&invitee_ids).await?;

        let guest_ids: Vec<Uuid> = rows
            .iter()
            .map(|row| row.guest_id)
            .chain(friend_rows.iter().map(|row| row.guest_id))
            .collect();
        let mut menus = self.load_guest_menus(&guest_ids).await?;

        let mut friends: HashMap<Uuid, Vec<InviteeFriend>> = HashMap::new();
        for row in friend_rows {
            let friend = InviteeFriend {
                invitee_friend_id: row.invitee_friend_id,
                invitee_id: row.invitee_id,
                guest: menus.guest(row.guest()),
            };
            friends.entry(row.invitee_id).or_default().push(friend);
        }

        let mut requests: HashMap<Uuid, Vec<InviteeSeatingRequest>> = HashMap::new();
        for row in request_rows {
            requests.entry(row.invitee_id).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| Invitee {
                invitee_id: row.invitee_id,
                event_id: row.event_id,
                guest: menus.guest(row.guest()),
                friends: friends.remove(&row.invitee_id).unwrap_or_default(),
                seating_requests: requests.remove(&row.invitee_id).unwrap_or_default(),
                email: row.email,
            })
            .collect())
    }

    async fn find_invitee_row(&self, invitee_id: Uuid) -> Result<InviteeEntity, GatewayError> {
        self.invitees
            .find_by_id(invitee_id)
            .await?
            .ok_or_else(|| not_found("Invitee"))
    }
}

#[async_trait]
impl InvitationGateway for PgGateway {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, GatewayError> {
        Ok(self.users.find_by_email(email).await?.map(Into::into))
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, GatewayError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found("User"))
    }

    async fn list_events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, GatewayError> {
        let rows = self.events.list_for_admin(user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Event, GatewayError> {
        self.events
            .find_by_id(event_id)
            .await?
            .map(Into::into)
            .ok_or_else(|| not_found("Event"))
    }

    async fn create_event(
        &self,
        user_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, GatewayError> {
        Ok(self.events.create_event(user_id, request).await?.into())
    }

    async fn is_event_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, GatewayError> {
        Ok(self.events.is_admin(event_id, user_id).await?)
    }

    async fn get_event_stats(&self, event_id: Uuid) -> Result<EventStats, GatewayError> {
        Ok(self.events.stats(event_id).await?.into())
    }

    async fn get_menu_items_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<MenuItem>, GatewayError> {
        let items = self.menus.items_for_event(event_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let item_ids: Vec<Uuid> = items.iter().map(|item| item.menu_item_id).collect();
        let mut options: HashMap<Uuid, Vec<MenuItemOptionEntity>> = HashMap::new();
        for option in self.menus.options_for_items(&item_ids).await? {
            options.entry(option.menu_item_id).or_default().push(option);
        }

        Ok(items
            .into_iter()
            .map(|item| {
                let item_options = options.remove(&item.menu_item_id).unwrap_or_default();
                item.into_domain(item_options)
            })
            .collect())
    }

    async fn create_menu_item(
        &self,
        event_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<MenuItem, GatewayError> {
        let (item, options) = self.menus.create_menu_item(event_id, request).await?;
        Ok(item.into_domain(options))
    }

    async fn replace_guest_menu_choices(
        &self,
        guest_id: Uuid,
        choices: &[ValidatedChoice],
    ) -> Result<Vec<MenuChoice>, GatewayError> {
        let stored = self.menus.replace_guest_choices(guest_id, choices).await?;
        Ok(stored.into_iter().map(Into::into).collect())
    }

    async fn set_guest_menu_note(
        &self,
        guest_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNote, GatewayError> {
        Ok(self.menus.upsert_note(guest_id, note_body).await?.into())
    }

    async fn list_invitees_for_event(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Invitee>, u64), GatewayError> {
        let total = self.invitees.count_for_event(event_id).await?;
        let rows = self.invitees.list_for_event(event_id, limit, offset).await?;
        let invitees = self.assemble_invitees(rows).await?;
        debug!(%event_id, total, returned = invitees.len(), "Loaded invitee page");
        Ok((invitees, total.max(0) as u64))
    }

    async fn create_invitee(
        &self,
        event_id: Uuid,
        request: &CreateInviteeRequest,
    ) -> Result<Invitee, GatewayError> {
        let row = self.invitees.create_invitee(event_id, request).await?;
        self.assemble_invitees(vec![row])
            .await?
            .pop()
            .ok_or_else(|| not_found("Invitee"))
    }

    async fn get_invitee(&self, invitee_id: Uuid) -> Result<Invitee, GatewayError> {
        let row = self.find_invitee_row(invitee_id).await?;
        self.assemble_invitees(vec![row])
            .await?
            .pop()
            .ok_or_else(|| not_found("Invitee"))
    }

    async fn update_invitee_email(
        &self,
        invitee_id: Uuid,
        email: &str,
    ) -> Result<(), GatewayError> {
        match self.invitees.update_email(invitee_id, email).await? {
            0 => Err(not_found("Invitee")),
            _ => Ok(()),
        }
    }

    async fn update_guest(
        &self,
        guest_id: Uuid,
        input: &GuestInput,
    ) -> Result<Guest, GatewayError> {
        let entity = self
            .invitees
            .update_guest(guest_id, input)
            .await?
            .ok_or_else(|| not_found("Guest"))?;
        let mut menus = self.load_guest_menus(&[guest_id]).await?;
        Ok(menus.guest(entity))
    }

    async fn get_invitee_friend(&self, friend_id: Uuid) -> Result<InviteeFriend, GatewayError> {
        let row = self
            .invitees
            .find_friend(friend_id)
            .await?
            .ok_or_else(|| not_found("Invitee friend"))?;
        let mut menus = self.load_guest_menus(&[row.guest_id]).await?;
        Ok(InviteeFriend {
            invitee_friend_id: row.invitee_friend_id,
            invitee_id: row.invitee_id,
            guest: menus.guest(row.guest()),
        })
    }

    async fn count_invitee_friends(&self, invitee_id: Uuid) -> Result<i64, GatewayError> {
        Ok(self.invitees.count_friends(invitee_id).await?)
    }

    async fn create_invitee_friend(
        &self,
        invitee_id: Uuid,
        input: &GuestInput,
    ) -> Result<InviteeFriend, GatewayError> {
        let row = self.invitees.create_friend(invitee_id, input).await?;
        Ok(InviteeFriend {
            invitee_friend_id: row.invitee_friend_id,
            invitee_id: row.invitee_id,
            guest: GuestMenus::default().guest(row.guest()),
        })
    }

    async fn get_eligible_seating_targets(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<SeatingTarget>, GatewayError> {
        let rows = self.seating.targets_for_event(event_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn replace_invitee_seating_requests(
        &self,
        invitee_id: Uuid,
        targets: &[Uuid],
    ) -> Result<Vec<InviteeSeatingRequest>, GatewayError> {
        let stored = self.seating.replace_requests(invitee_id, targets).await?;
        Ok(stored.into_iter().map(Into::into).collect())
    }
}

//! In-memory storage gateway for development and testing.
//!
//! Mirrors the behaviour of the PostgreSQL gateway closely enough for the
//! coordinator and HTTP layers to be exercised without a database. Each call
//! takes the store lock once, so replace-all writes are atomic.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use super::gateway::{GatewayError, InvitationGateway};
use crate::models::{
    CreateEventRequest, CreateInviteeRequest, CreateMenuItemRequest, Event, EventStats, Guest,
    GuestInput, Invitee, InviteeFriend, InviteeSeatingRequest, MenuChoice, MenuItem,
    MenuItemOption, MenuNote, SeatingTarget, User, UserCredentials, ValidatedChoice,
};

#[derive(Debug, Clone)]
struct InviteeRow {
    invitee_id: Uuid,
    event_id: Uuid,
    guest_id: Uuid,
    email: String,
}

#[derive(Debug, Clone)]
struct FriendRow {
    invitee_friend_id: Uuid,
    invitee_id: Uuid,
    guest_id: Uuid,
}

#[derive(Debug, Clone)]
struct SeatingRow {
    invitee_seating_request_id: Uuid,
    invitee_id: Uuid,
    invitee_request_id: Uuid,
}

#[derive(Debug, Default)]
struct Store {
    users: Vec<UserCredentials>,
    events: Vec<Event>,
    event_admins: HashSet<(Uuid, Uuid)>,
    guests: HashMap<Uuid, Guest>,
    invitees: Vec<InviteeRow>,
    friends: Vec<FriendRow>,
    menu_items: Vec<MenuItem>,
    menu_choices: HashMap<Uuid, Vec<MenuChoice>>,
    menu_notes: HashMap<Uuid, MenuNote>,
    seating_requests: Vec<SeatingRow>,
}

impl Store {
    fn insert_guest(&mut self, input: &GuestInput) -> Uuid {
        let guest_id = Uuid::new_v4();
        self.guests.insert(
            guest_id,
            Guest {
                guest_id,
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                attending: input.attending,
                menu_choices: Vec::new(),
                menu_note: None,
            },
        );
        guest_id
    }

    fn guest(&self, guest_id: Uuid) -> Result<Guest, GatewayError> {
        let mut guest = self
            .guests
            .get(&guest_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound("Guest".to_string()))?;
        guest.menu_choices = self
            .menu_choices
            .get(&guest_id)
            .cloned()
            .unwrap_or_default();
        guest.menu_note = self
            .menu_notes
            .get(&guest_id)
            .map(|note| note.note_body.clone());
        Ok(guest)
    }

    fn friend(&self, row: &FriendRow) -> Result<InviteeFriend, GatewayError> {
        Ok(InviteeFriend {
            invitee_friend_id: row.invitee_friend_id,
            invitee_id: row.invitee_id,
            guest: self.guest(row.guest_id)?,
        })
    }

    fn invitee_row(&self, invitee_id: Uuid) -> Result<&InviteeRow, GatewayError> {
        self.invitees
            .iter()
            .find(|row| row.invitee_id == invitee_id)
            .ok_or_else(|| GatewayError::NotFound("Invitee".to_string()))
    }

    fn seating_requests_of(
        &self,
        invitee_id: Uuid,
    ) -> Result<Vec<InviteeSeatingRequest>, GatewayError> {
        self.seating_requests
            .iter()
            .filter(|row| row.invitee_id == invitee_id)
            .map(|row| -> Result<InviteeSeatingRequest, GatewayError> {
                let target = self.invitee_row(row.invitee_request_id)?;
                let guest = self.guest(target.guest_id)?;
                Ok(InviteeSeatingRequest {
                    invitee_seating_request_id: row.invitee_seating_request_id,
                    invitee_id: row.invitee_id,
                    invitee_request_id: row.invitee_request_id,
                    first_name: guest.first_name,
                    last_name: guest.last_name,
                })
            })
            .collect()
    }

    fn invitee(&self, row: &InviteeRow) -> Result<Invitee, GatewayError> {
        let friends = self
            .friends
            .iter()
            .filter(|friend| friend.invitee_id == row.invitee_id)
            .map(|friend| self.friend(friend))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Invitee {
            invitee_id: row.invitee_id,
            event_id: row.event_id,
            email: row.email.clone(),
            guest: self.guest(row.guest_id)?,
            friends,
            seating_requests: self.seating_requests_of(row.invitee_id)?,
        })
    }
}

/// Gateway that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    store: RwLock<Store>,
    /// When set, every write fails with a database error.
    simulate_failure: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway whose writes always fail.
    pub fn failing() -> Self {
        Self {
            store: RwLock::default(),
            simulate_failure: AtomicBool::new(true),
        }
    }

    /// Turn write failure simulation on or off.
    pub fn set_simulate_failure(&self, enabled: bool) {
        self.simulate_failure.store(enabled, Ordering::SeqCst);
    }

    /// Registers an organizer account. Email is stored lower-cased.
    pub async fn insert_user(
        &self,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> User {
        let user = User {
            user_id: Uuid::new_v4(),
            email: email.to_lowercase(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.store.write().await.users.push(UserCredentials {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        user
    }

    fn check_writable(&self) -> Result<(), GatewayError> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            tracing::warn!("In-memory gateway simulating write failure");
            return Err(GatewayError::Database("Simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl InvitationGateway for InMemoryGateway {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, GatewayError> {
        let email = email.to_lowercase();
        Ok(self
            .store
            .read()
            .await
            .users
            .iter()
            .find(|creds| creds.user.email == email)
            .cloned())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<User, GatewayError> {
        self.store
            .read()
            .await
            .users
            .iter()
            .find(|creds| creds.user.user_id == user_id)
            .map(|creds| creds.user.clone())
            .ok_or_else(|| GatewayError::NotFound("User".to_string()))
    }

    async fn list_events_for_user(&self, user_id: Uuid) -> Result<Vec<Event>, GatewayError> {
        let store = self.store.read().await;
        Ok(store
            .events
            .iter()
            .filter(|event| store.event_admins.contains(&(event.event_id, user_id)))
            .cloned()
            .collect())
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Event, GatewayError> {
        self.store
            .read()
            .await
            .events
            .iter()
            .find(|event| event.event_id == event_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound("Event".to_string()))
    }

    async fn create_event(
        &self,
        user_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, GatewayError> {
        self.check_writable()?;

        let event = Event {
            event_id: Uuid::new_v4(),
            name: request.name.clone(),
            description: request.description.clone(),
            location: request.location.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            respond_by: request.respond_by,
            allowed_friends: request.allowed_friends,
        };

        let mut store = self.store.write().await;
        store.events.push(event.clone());
        store.event_admins.insert((event.event_id, user_id));
        Ok(event)
    }

    async fn is_event_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .event_admins
            .contains(&(event_id, user_id)))
    }

    async fn get_event_stats(&self, event_id: Uuid) -> Result<EventStats, GatewayError> {
        let store = self.store.read().await;

        let invitees: Vec<&InviteeRow> = store
            .invitees
            .iter()
            .filter(|row| row.event_id == event_id)
            .collect();
        let friends: Vec<&FriendRow> = store
            .friends
            .iter()
            .filter(|friend| invitees.iter().any(|i| i.invitee_id == friend.invitee_id))
            .collect();

        let attending = invitees
            .iter()
            .map(|row| row.guest_id)
            .chain(friends.iter().map(|friend| friend.guest_id))
            .filter(|guest_id| store.guests.get(guest_id).is_some_and(|g| g.attending))
            .count();

        let total_invitees = invitees.len() as i64;
        let total_friends = friends.len() as i64;
        Ok(EventStats {
            total_invitees,
            total_friends,
            total_guests: total_invitees + total_friends,
            attending_guests: attending as i64,
        })
    }

    async fn get_menu_items_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<MenuItem>, GatewayError> {
        let mut items: Vec<MenuItem> = self
            .store
            .read()
            .await
            .menu_items
            .iter()
            .filter(|item| item.event_id == event_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.item_order);
        Ok(items)
    }

    async fn create_menu_item(
        &self,
        event_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<MenuItem, GatewayError> {
        self.check_writable()?;

        let menu_item_id = Uuid::new_v4();
        let item = MenuItem {
            menu_item_id,
            event_id,
            item_order: request.item_order,
            name: request.name.clone(),
            num_choices: request.num_choices,
            options: request
                .options
                .iter()
                .map(|option| MenuItemOption {
                    menu_item_option_id: Uuid::new_v4(),
                    menu_item_id,
                    name: option.name.clone(),
                    description: option.description.clone(),
                })
                .collect(),
        };

        let mut store = self.store.write().await;
        if !store.events.iter().any(|event| event.event_id == event_id) {
            return Err(GatewayError::NotFound("Referenced record".to_string()));
        }
        store.menu_items.push(item.clone());
        Ok(item)
    }

    async fn replace_guest_menu_choices(
        &self,
        guest_id: Uuid,
        choices: &[ValidatedChoice],
    ) -> Result<Vec<MenuChoice>, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        if !store.guests.contains_key(&guest_id) {
            return Err(GatewayError::NotFound("Referenced record".to_string()));
        }

        let stored: Vec<MenuChoice> = choices
            .iter()
            .map(|choice| MenuChoice {
                menu_choice_id: Uuid::new_v4(),
                guest_id,
                menu_item_id: choice.menu_item_id,
                menu_item_option_id: choice.menu_item_option_id,
            })
            .collect();
        store.menu_choices.insert(guest_id, stored.clone());
        Ok(stored)
    }

    async fn set_guest_menu_note(
        &self,
        guest_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNote, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        if !store.guests.contains_key(&guest_id) {
            return Err(GatewayError::NotFound("Referenced record".to_string()));
        }

        let note = store
            .menu_notes
            .entry(guest_id)
            .and_modify(|note| note.note_body = note_body.to_string())
            .or_insert_with(|| MenuNote {
                menu_note_id: Uuid::new_v4(),
                guest_id,
                note_body: note_body.to_string(),
            });
        Ok(note.clone())
    }

    async fn list_invitees_for_event(
        &self,
        event_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Invitee>, u64), GatewayError> {
        let store = self.store.read().await;
        let rows: Vec<&InviteeRow> = store
            .invitees
            .iter()
            .filter(|row| row.event_id == event_id)
            .collect();

        let total = rows.len() as u64;
        let page = rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|row| store.invitee(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((page, total))
    }

    async fn create_invitee(
        &self,
        event_id: Uuid,
        request: &CreateInviteeRequest,
    ) -> Result<Invitee, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        if !store.events.iter().any(|event| event.event_id == event_id) {
            return Err(GatewayError::NotFound("Referenced record".to_string()));
        }

        let guest_id = store.insert_guest(&request.guest);
        let row = InviteeRow {
            invitee_id: Uuid::new_v4(),
            event_id,
            guest_id,
            email: request.email.to_lowercase(),
        };
        for friend in &request.friends {
            let friend_guest_id = store.insert_guest(friend);
            store.friends.push(FriendRow {
                invitee_friend_id: Uuid::new_v4(),
                invitee_id: row.invitee_id,
                guest_id: friend_guest_id,
            });
        }
        store.invitees.push(row.clone());

        store.invitee(&row)
    }

    async fn get_invitee(&self, invitee_id: Uuid) -> Result<Invitee, GatewayError> {
        let store = self.store.read().await;
        let row = store.invitee_row(invitee_id)?;
        store.invitee(row)
    }

    async fn update_invitee_email(
        &self,
        invitee_id: Uuid,
        email: &str,
    ) -> Result<(), GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        let row = store
            .invitees
            .iter_mut()
            .find(|row| row.invitee_id == invitee_id)
            .ok_or_else(|| GatewayError::NotFound("Invitee".to_string()))?;
        row.email = email.to_lowercase();
        Ok(())
    }

    async fn update_guest(
        &self,
        guest_id: Uuid,
        input: &GuestInput,
    ) -> Result<Guest, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        let guest = store
            .guests
            .get_mut(&guest_id)
            .ok_or_else(|| GatewayError::NotFound("Guest".to_string()))?;
        guest.first_name = input.first_name.clone();
        guest.last_name = input.last_name.clone();
        guest.attending = input.attending;

        store.guest(guest_id)
    }

    async fn get_invitee_friend(&self, friend_id: Uuid) -> Result<InviteeFriend, GatewayError> {
        let store = self.store.read().await;
        let row = store
            .friends
            .iter()
            .find(|row| row.invitee_friend_id == friend_id)
            .ok_or_else(|| GatewayError::NotFound("Invitee friend".to_string()))?;
        store.friend(row)
    }

    async fn count_invitee_friends(&self, invitee_id: Uuid) -> Result<i64, GatewayError> {
        Ok(self
            .store
            .read()
            .await
            .friends
            .iter()
            .filter(|row| row.invitee_id == invitee_id)
            .count() as i64)
    }

    async fn create_invitee_friend(
        &self,
        invitee_id: Uuid,
        input: &GuestInput,
    ) -> Result<InviteeFriend, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        store.invitee_row(invitee_id)?;

        let guest_id = store.insert_guest(input);
        let row = FriendRow {
            invitee_friend_id: Uuid::new_v4(),
            invitee_id,
            guest_id,
        };
        store.friends.push(row.clone());
        store.friend(&row)
    }

    async fn get_eligible_seating_targets(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<SeatingTarget>, GatewayError> {
        let store = self.store.read().await;
        let mut targets = store
            .invitees
            .iter()
            .filter(|row| row.event_id == event_id)
            .map(|row| -> Result<SeatingTarget, GatewayError> {
                let guest = store.guest(row.guest_id)?;
                Ok(SeatingTarget {
                    invitee_id: row.invitee_id,
                    first_name: guest.first_name,
                    last_name: guest.last_name,
                })
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;

        targets.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(targets)
    }

    async fn replace_invitee_seating_requests(
        &self,
        invitee_id: Uuid,
        targets: &[Uuid],
    ) -> Result<Vec<InviteeSeatingRequest>, GatewayError> {
        self.check_writable()?;

        let mut store = self.store.write().await;
        store.invitee_row(invitee_id)?;
        for target in targets {
            if store.invitee_row(*target).is_err() {
                return Err(GatewayError::NotFound("Referenced record".to_string()));
            }
        }

        store.seating_requests.retain(|row| row.invitee_id != invitee_id);
        for target in targets {
            store.seating_requests.push(SeatingRow {
                invitee_seating_request_id: Uuid::new_v4(),
                invitee_id,
                invitee_request_id: *target,
            });
        }

        store.seating_requests_of(invitee_id)
    }
}

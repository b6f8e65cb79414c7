//! Invitation workflows.
//!
//! The coordinator sequences gateway calls around the two pure pieces of
//! business logic: menu choice validation and seating token sealing. HTTP
//! handlers call into it with decoded bodies and map [`CoordinatorError`] to a
//! status code.

use std::collections::HashSet;
use std::sync::Arc;

use shared::pagination::Pagination;
use shared::seating_token::{SeatingTokenCodec, TokenError};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::gateway::{GatewayError, InvitationGateway};
use super::menu_validation::{validate_menu_choices, MenuViolation};
use crate::models::{
    CreateEventRequest, CreateInviteeRequest, CreateMenuItemRequest, EditInviteeRequest, Event,
    EventStats, Invitee, InviteeFriend, InviteeFriendRequest, InviteeResponse,
    InviteeSeatingRequest, ListInviteesResponse, MenuChoice, MenuChoiceInput, MenuItem, MenuNote,
    SeatingRequestChoice, SeatingRequestInput, SeatingRequestView, SeatingRequestsResponse,
    SelfReferencePolicy,
};

/// Error type for coordinator operations.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Submitted menu choices are not admissible for the event.
    #[error("Menu choices are not valid for this event")]
    InvalidMenuChoices(#[source] MenuViolation),

    /// A seating request named the requesting invitee.
    #[error("A seating request may not target the requesting invitee")]
    SelfReference { token: String },

    /// A seating request named an invitee of another event.
    #[error("A seating request may only target invitees of the same event")]
    ForeignSeatingTarget { token: String },

    #[error("Invitee already has the maximum of {allowed} friend(s)")]
    FriendLimitReached { allowed: i32 },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Not an administrator of this event")]
    Forbidden,

    /// Token could not be sealed or opened. Points at key provisioning.
    #[error("Seating token failure: {0}")]
    Codec(#[from] TokenError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Orchestrates invitation workflows over a storage gateway.
pub struct Coordinator {
    gateway: Arc<dyn InvitationGateway>,
    codec: SeatingTokenCodec,
    self_reference_policy: SelfReferencePolicy,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("codec", &self.codec)
            .field("self_reference_policy", &self.self_reference_policy)
            .finish_non_exhaustive()
    }
}

impl Coordinator {
    pub fn new(
        gateway: Arc<dyn InvitationGateway>,
        codec: SeatingTokenCodec,
        self_reference_policy: SelfReferencePolicy,
    ) -> Self {
        Self {
            gateway,
            codec,
            self_reference_policy,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn InvitationGateway> {
        &self.gateway
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    pub async fn get_events(&self, user_id: Uuid) -> Result<Vec<Event>, CoordinatorError> {
        Ok(self.gateway.list_events_for_user(user_id).await?)
    }

    pub async fn get_event_info(&self, event_id: Uuid) -> Result<Event, CoordinatorError> {
        self.load_event(event_id).await
    }

    pub async fn create_event(
        &self,
        user_id: Uuid,
        request: &CreateEventRequest,
    ) -> Result<Event, CoordinatorError> {
        let event = self.gateway.create_event(user_id, request).await?;
        info!(event_id = %event.event_id, user_id = %user_id, "Event created");
        Ok(event)
    }

    pub async fn get_event_stats(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<EventStats, CoordinatorError> {
        self.require_admin(event_id, user_id).await?;
        Ok(self.gateway.get_event_stats(event_id).await?)
    }

    // ---------------------------------------------------------------------
    // Menus
    // ---------------------------------------------------------------------

    pub async fn get_menu_items_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<MenuItem>, CoordinatorError> {
        self.load_event(event_id).await?;
        Ok(self.gateway.get_menu_items_for_event(event_id).await?)
    }

    pub async fn create_menu_item(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        request: &CreateMenuItemRequest,
    ) -> Result<MenuItem, CoordinatorError> {
        self.require_admin(event_id, user_id).await?;
        let item = self.gateway.create_menu_item(event_id, request).await?;
        info!(
            event_id = %event_id,
            menu_item_id = %item.menu_item_id,
            options = item.options.len(),
            "Menu item created"
        );
        Ok(item)
    }

    /// Validates `choices` against the event menu and replaces the guest's
    /// stored choices with them.
    ///
    /// Nothing is written when validation fails.
    pub async fn set_guest_menu_choices(
        &self,
        event_id: Uuid,
        guest_id: Uuid,
        choices: &[MenuChoiceInput],
    ) -> Result<Vec<MenuChoice>, CoordinatorError> {
        let menu_items = self.gateway.get_menu_items_for_event(event_id).await?;

        let validated = validate_menu_choices(choices, &menu_items).map_err(|violation| {
            debug!(
                event_id = %event_id,
                guest_id = %guest_id,
                violation = %violation,
                "Menu choices rejected"
            );
            CoordinatorError::InvalidMenuChoices(violation)
        })?;

        let stored = self
            .gateway
            .replace_guest_menu_choices(guest_id, &validated)
            .await?;

        info!(guest_id = %guest_id, count = stored.len(), "Menu choices replaced");
        Ok(stored)
    }

    pub async fn set_invitee_menu_choices(
        &self,
        invitee_id: Uuid,
        choices: &[MenuChoiceInput],
    ) -> Result<Vec<MenuChoice>, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        self.set_guest_menu_choices(invitee.event_id, invitee.guest.guest_id, choices)
            .await
    }

    pub async fn set_invitee_friend_menu_choices(
        &self,
        invitee_id: Uuid,
        friend_id: Uuid,
        choices: &[MenuChoiceInput],
    ) -> Result<Vec<MenuChoice>, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        let friend = self.load_friend_of(invitee_id, friend_id).await?;
        self.set_guest_menu_choices(invitee.event_id, friend.guest.guest_id, choices)
            .await
    }

    pub async fn set_invitee_menu_note(
        &self,
        invitee_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNote, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        Ok(self
            .gateway
            .set_guest_menu_note(invitee.guest.guest_id, note_body)
            .await?)
    }

    pub async fn set_invitee_friend_menu_note(
        &self,
        invitee_id: Uuid,
        friend_id: Uuid,
        note_body: &str,
    ) -> Result<MenuNote, CoordinatorError> {
        let friend = self.load_friend_of(invitee_id, friend_id).await?;
        Ok(self
            .gateway
            .set_guest_menu_note(friend.guest.guest_id, note_body)
            .await?)
    }

    // ---------------------------------------------------------------------
    // Invitees
    // ---------------------------------------------------------------------

    pub async fn get_invitees_for_event(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<ListInviteesResponse, CoordinatorError> {
        self.require_admin(event_id, user_id).await?;

        let (invitees, total) = self
            .gateway
            .list_invitees_for_event(event_id, pagination.limit(), pagination.offset())
            .await?;

        let data = invitees
            .into_iter()
            .map(|invitee| self.invitee_response(invitee))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ListInviteesResponse {
            data,
            pagination: pagination.with_total_items(total).info(),
        })
    }

    pub async fn create_invitee_for_event(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        request: &CreateInviteeRequest,
    ) -> Result<InviteeResponse, CoordinatorError> {
        let event = self.require_admin(event_id, user_id).await?;

        if request.friends.len() > friend_cap(&event) {
            return Err(CoordinatorError::FriendLimitReached {
                allowed: event.allowed_friends,
            });
        }

        let invitee = self.gateway.create_invitee(event_id, request).await?;
        info!(
            event_id = %event_id,
            invitee_id = %invitee.invitee_id,
            friends = invitee.friends.len(),
            "Invitee created"
        );
        self.invitee_response(invitee)
    }

    pub async fn get_invitee(&self, invitee_id: Uuid) -> Result<InviteeResponse, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        self.invitee_response(invitee)
    }

    pub async fn edit_invitee(
        &self,
        invitee_id: Uuid,
        request: &EditInviteeRequest,
    ) -> Result<InviteeResponse, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;

        if let Some(email) = &request.email {
            self.gateway.update_invitee_email(invitee_id, email).await?;
        }
        if let Some(guest) = &request.guest {
            self.gateway
                .update_guest(invitee.guest.guest_id, guest)
                .await?;
        }

        self.get_invitee(invitee_id).await
    }

    pub async fn create_invitee_friend(
        &self,
        invitee_id: Uuid,
        request: &InviteeFriendRequest,
    ) -> Result<InviteeFriend, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        let event = self.load_event(invitee.event_id).await?;

        let current = self.gateway.count_invitee_friends(invitee_id).await?;
        if usize::try_from(current).unwrap_or(usize::MAX) >= friend_cap(&event) {
            return Err(CoordinatorError::FriendLimitReached {
                allowed: event.allowed_friends,
            });
        }

        let friend = self
            .gateway
            .create_invitee_friend(invitee_id, &request.guest)
            .await?;
        info!(
            invitee_id = %invitee_id,
            invitee_friend_id = %friend.invitee_friend_id,
            "Invitee friend created"
        );
        Ok(friend)
    }

    pub async fn edit_invitee_friend(
        &self,
        invitee_id: Uuid,
        friend_id: Uuid,
        request: &InviteeFriendRequest,
    ) -> Result<InviteeFriend, CoordinatorError> {
        let mut friend = self.load_friend_of(invitee_id, friend_id).await?;
        let guest = self
            .gateway
            .update_guest(friend.guest.guest_id, &request.guest)
            .await?;
        friend.guest = guest;
        Ok(friend)
    }

    // ---------------------------------------------------------------------
    // Seating
    // ---------------------------------------------------------------------

    /// Replaces an invitee's seating requests with the submitted targets.
    ///
    /// Every submitted token is opened first; a token that fails to open
    /// aborts the call, and so does a target outside the invitee's event.
    /// Targets equal to the requester are handled per the configured
    /// [`SelfReferencePolicy`]. Stored targets are sealed again on the way
    /// out.
    pub async fn set_invitee_seating_requests(
        &self,
        invitee_id: Uuid,
        requests: &[SeatingRequestInput],
    ) -> Result<SeatingRequestsResponse, CoordinatorError> {
        let invitee = self.load_invitee(invitee_id).await?;
        let eligible: HashSet<Uuid> = self
            .gateway
            .get_eligible_seating_targets(invitee.event_id)
            .await?
            .into_iter()
            .map(|target| target.invitee_id)
            .collect();

        let mut targets = Vec::with_capacity(requests.len());
        let mut dropped = Vec::new();

        for request in requests {
            let target = self.codec.decrypt_id(&request.invitee_request_id)?;

            if target == invitee_id {
                match self.self_reference_policy {
                    SelfReferencePolicy::Reject => {
                        return Err(CoordinatorError::SelfReference {
                            token: request.invitee_request_id.clone(),
                        });
                    }
                    SelfReferencePolicy::Drop => {
                        dropped.push(request.invitee_request_id.clone());
                        continue;
                    }
                }
            }

            if !eligible.contains(&target) {
                debug!(
                    invitee_id = %invitee_id,
                    event_id = %invitee.event_id,
                    "Seating request targets another event"
                );
                return Err(CoordinatorError::ForeignSeatingTarget {
                    token: request.invitee_request_id.clone(),
                });
            }

            targets.push(target);
        }

        if !dropped.is_empty() {
            warn!(
                invitee_id = %invitee_id,
                dropped = dropped.len(),
                "Dropped self-referencing seating requests"
            );
        }

        let stored = self
            .gateway
            .replace_invitee_seating_requests(invitee_id, &targets)
            .await?;

        info!(invitee_id = %invitee_id, count = stored.len(), "Seating requests replaced");

        Ok(SeatingRequestsResponse {
            data: self.seal_seating_requests(stored)?,
            dropped,
        })
    }

    /// Lists everyone at the event as a candidate seating partner, ids sealed.
    pub async fn get_list_of_seating_request_choices(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<SeatingRequestChoice>, CoordinatorError> {
        self.load_event(event_id).await?;

        self.gateway
            .get_eligible_seating_targets(event_id)
            .await?
            .into_iter()
            .map(|target| -> Result<SeatingRequestChoice, CoordinatorError> {
                Ok(SeatingRequestChoice {
                    invitee_request_id: self.codec.encrypt_id(target.invitee_id)?,
                    first_name: target.first_name,
                    last_name: target.last_name,
                })
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------

    async fn load_event(&self, event_id: Uuid) -> Result<Event, CoordinatorError> {
        match self.gateway.get_event(event_id).await {
            Ok(event) => Ok(event),
            Err(GatewayError::NotFound(_)) => Err(CoordinatorError::NotFound("Event")),
            Err(e) => Err(e.into()),
        }
    }

    async fn load_invitee(&self, invitee_id: Uuid) -> Result<Invitee, CoordinatorError> {
        match self.gateway.get_invitee(invitee_id).await {
            Ok(invitee) => Ok(invitee),
            Err(GatewayError::NotFound(_)) => Err(CoordinatorError::NotFound("Invitee")),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads a friend and checks that it belongs to `invitee_id`.
    async fn load_friend_of(
        &self,
        invitee_id: Uuid,
        friend_id: Uuid,
    ) -> Result<InviteeFriend, CoordinatorError> {
        match self.gateway.get_invitee_friend(friend_id).await {
            Ok(friend) if friend.invitee_id == invitee_id => Ok(friend),
            Ok(_) | Err(GatewayError::NotFound(_)) => {
                Err(CoordinatorError::NotFound("Invitee friend"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn require_admin(&self, event_id: Uuid, user_id: Uuid) -> Result<Event, CoordinatorError> {
        let event = self.load_event(event_id).await?;
        if !self.gateway.is_event_admin(event_id, user_id).await? {
            return Err(CoordinatorError::Forbidden);
        }
        Ok(event)
    }

    fn invitee_response(&self, invitee: Invitee) -> Result<InviteeResponse, CoordinatorError> {
        Ok(InviteeResponse {
            invitee_id: invitee.invitee_id,
            event_id: invitee.event_id,
            email: invitee.email,
            guest: invitee.guest,
            friends: invitee.friends,
            seating_requests: self.seal_seating_requests(invitee.seating_requests)?,
        })
    }

    fn seal_seating_requests(
        &self,
        requests: Vec<InviteeSeatingRequest>,
    ) -> Result<Vec<SeatingRequestView>, TokenError> {
        requests
            .into_iter()
            .map(|request| -> Result<SeatingRequestView, TokenError> {
                Ok(SeatingRequestView {
                    invitee_seating_request_id: request.invitee_seating_request_id,
                    invitee_request_id: self.codec.encrypt_id(request.invitee_request_id)?,
                    first_name: request.first_name,
                    last_name: request.last_name,
                })
            })
            .collect()
    }
}

fn friend_cap(event: &Event) -> usize {
    usize::try_from(event.allowed_friends).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateMenuItemOptionRequest, GuestInput};
    use crate::services::memory::InMemoryGateway;
    use chrono::{Duration, Utc};
    use fake::faker::name::en::{FirstName, LastName};
    use fake::Fake;

    const KEY: &[u8; 32] = b"coordinator-test-key-32-bytes!!!";

    struct Fixture {
        gateway: Arc<InMemoryGateway>,
        coordinator: Coordinator,
        admin: Uuid,
        event: Event,
        entree: MenuItem,
    }

    fn guest(first: &str, last: &str) -> GuestInput {
        GuestInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
            attending: true,
        }
    }

    fn event_request(allowed_friends: i32) -> CreateEventRequest {
        let start = Utc::now() + Duration::days(60);
        CreateEventRequest {
            name: "Anniversary Dinner".to_string(),
            description: String::new(),
            location: "The Old Mill".to_string(),
            start_time: start,
            end_time: start + Duration::hours(5),
            respond_by: start - Duration::days(21),
            allowed_friends,
        }
    }

    async fn fixture_with_policy(policy: SelfReferencePolicy) -> Fixture {
        let gateway = Arc::new(InMemoryGateway::new());
        let codec = SeatingTokenCodec::new(KEY).unwrap();
        let coordinator = Coordinator::new(gateway.clone(), codec, policy);

        let admin = Uuid::new_v4();
        let event = coordinator
            .create_event(admin, &event_request(1))
            .await
            .unwrap();
        let entree = coordinator
            .create_menu_item(
                event.event_id,
                admin,
                &CreateMenuItemRequest {
                    item_order: 1,
                    name: "Entree".to_string(),
                    num_choices: 1,
                    options: vec![
                        CreateMenuItemOptionRequest {
                            name: "Steak".to_string(),
                            description: "Medium rare".to_string(),
                        },
                        CreateMenuItemOptionRequest {
                            name: "Fish".to_string(),
                            description: "Grilled".to_string(),
                        },
                    ],
                },
            )
            .await
            .unwrap();

        Fixture {
            gateway,
            coordinator,
            admin,
            event,
            entree,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_policy(SelfReferencePolicy::Drop).await
    }

    async fn add_invitee(f: &Fixture, first: &str, last: &str, friends: usize) -> InviteeResponse {
        let request = CreateInviteeRequest {
            email: format!("{}@example.com", first.to_lowercase()),
            guest: guest(first, last),
            friends: (0..friends).map(|i| guest(&format!("Friend{i}"), last)).collect(),
        };
        f.coordinator
            .create_invitee_for_event(f.event.event_id, f.admin, &request)
            .await
            .unwrap()
    }

    fn pick(item: &MenuItem, option: usize) -> MenuChoiceInput {
        MenuChoiceInput {
            menu_item_id: None,
            menu_item_option_id: item.options[option].menu_item_option_id,
        }
    }

    #[tokio::test]
    async fn test_menu_choices_end_to_end() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 0).await;

        let stored = f
            .coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[pick(&f.entree, 0)])
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].menu_item_id, f.entree.menu_item_id);

        let result = f
            .coordinator
            .set_invitee_menu_choices(
                invitee.invitee_id,
                &[pick(&f.entree, 0), pick(&f.entree, 1)],
            )
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::InvalidMenuChoices(
                MenuViolation::TooManyChoicesForItem { .. }
            ))
        ));

        // Rejected submission leaves the stored set untouched.
        let reloaded = f.coordinator.get_invitee(invitee.invitee_id).await.unwrap();
        assert_eq!(reloaded.guest.menu_choices, stored);
    }

    #[tokio::test]
    async fn test_menu_choices_replace_previous_set() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 0).await;

        f.coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[pick(&f.entree, 0)])
            .await
            .unwrap();
        f.coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[pick(&f.entree, 1)])
            .await
            .unwrap();

        let reloaded = f.coordinator.get_invitee(invitee.invitee_id).await.unwrap();
        assert_eq!(reloaded.guest.menu_choices.len(), 1);
        assert_eq!(
            reloaded.guest.menu_choices[0].menu_item_option_id,
            f.entree.options[1].menu_item_option_id
        );

        f.coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[])
            .await
            .unwrap();
        let cleared = f.coordinator.get_invitee(invitee.invitee_id).await.unwrap();
        assert!(cleared.guest.menu_choices.is_empty());
    }

    #[tokio::test]
    async fn test_option_from_other_event_rejected() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 0).await;

        let other_event = f
            .coordinator
            .create_event(f.admin, &event_request(0))
            .await
            .unwrap();
        let other_item = f
            .coordinator
            .create_menu_item(
                other_event.event_id,
                f.admin,
                &CreateMenuItemRequest {
                    item_order: 0,
                    name: "Soup".to_string(),
                    num_choices: 1,
                    options: vec![CreateMenuItemOptionRequest {
                        name: "Tomato".to_string(),
                        description: String::new(),
                    }],
                },
            )
            .await
            .unwrap();

        let result = f
            .coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[pick(&other_item, 0)])
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::InvalidMenuChoices(
                MenuViolation::UnknownOption { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_friend_menu_choices_share_validation() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 1).await;
        let friend_id = invitee.friends[0].invitee_friend_id;

        let stored = f
            .coordinator
            .set_invitee_friend_menu_choices(invitee.invitee_id, friend_id, &[pick(&f.entree, 1)])
            .await
            .unwrap();
        assert_eq!(stored[0].guest_id, invitee.friends[0].guest.guest_id);

        let result = f
            .coordinator
            .set_invitee_friend_menu_choices(
                invitee.invitee_id,
                friend_id,
                &[pick(&f.entree, 0), pick(&f.entree, 1)],
            )
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::InvalidMenuChoices(_))
        ));
    }

    #[tokio::test]
    async fn test_friend_of_other_invitee_not_found() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 1).await;
        let alan = add_invitee(&f, "Alan", "Turing", 0).await;

        let result = f
            .coordinator
            .set_invitee_friend_menu_choices(
                alan.invitee_id,
                ada.friends[0].invitee_friend_id,
                &[pick(&f.entree, 0)],
            )
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::NotFound("Invitee friend"))
        ));
    }

    #[tokio::test]
    async fn test_unknown_invitee_not_found() {
        let f = fixture().await;
        let result = f
            .coordinator
            .set_invitee_menu_choices(Uuid::new_v4(), &[])
            .await;
        assert!(matches!(result, Err(CoordinatorError::NotFound("Invitee"))));
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 0).await;

        f.gateway.set_simulate_failure(true);
        let result = f
            .coordinator
            .set_invitee_menu_choices(invitee.invitee_id, &[pick(&f.entree, 0)])
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::Gateway(GatewayError::Database(_)))
        ));
    }

    #[tokio::test]
    async fn test_seating_choices_are_sealed() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;
        let alan = add_invitee(&f, "Alan", "Turing", 0).await;

        let choices = f
            .coordinator
            .get_list_of_seating_request_choices(f.event.event_id)
            .await
            .unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].last_name, "Lovelace");

        let codec = SeatingTokenCodec::new(KEY).unwrap();
        for choice in &choices {
            assert!(!choice.invitee_request_id.contains(&ada.invitee_id.to_string()));
            let id = codec.decrypt_id(&choice.invitee_request_id).unwrap();
            assert!(id == ada.invitee_id || id == alan.invitee_id);
        }
    }

    #[tokio::test]
    async fn test_seating_requests_round_trip_tokens() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;
        add_invitee(&f, "Alan", "Turing", 0).await;

        let choices = f
            .coordinator
            .get_list_of_seating_request_choices(f.event.event_id)
            .await
            .unwrap();
        let alan_token = choices[1].invitee_request_id.clone();

        let result = f
            .coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: alan_token.clone(),
                }],
            )
            .await
            .unwrap();

        assert!(result.dropped.is_empty());
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].invitee_request_id, alan_token);
        assert_eq!(result.data[0].first_name, "Alan");

        let reloaded = f.coordinator.get_invitee(ada.invitee_id).await.unwrap();
        assert_eq!(reloaded.seating_requests, result.data);
    }

    #[tokio::test]
    async fn test_self_reference_dropped_and_reported() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;
        let alan = add_invitee(&f, "Alan", "Turing", 0).await;

        let codec = SeatingTokenCodec::new(KEY).unwrap();
        let self_token = codec.encrypt_id(ada.invitee_id).unwrap();
        let alan_token = codec.encrypt_id(alan.invitee_id).unwrap();

        let result = f
            .coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[
                    SeatingRequestInput {
                        invitee_request_id: self_token.clone(),
                    },
                    SeatingRequestInput {
                        invitee_request_id: alan_token,
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(result.dropped, vec![self_token]);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].last_name, "Turing");
    }

    #[tokio::test]
    async fn test_seating_target_from_other_event_rejected() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;
        let alan = add_invitee(&f, "Alan", "Turing", 0).await;

        let elsewhere = f
            .coordinator
            .create_event(f.admin, &event_request(0))
            .await
            .unwrap();
        f.coordinator
            .create_invitee_for_event(
                elsewhere.event_id,
                f.admin,
                &CreateInviteeRequest {
                    email: "stranger@example.com".to_string(),
                    guest: guest("Stranger", "Elsewhere"),
                    friends: vec![],
                },
            )
            .await
            .unwrap();
        let stranger_token = f
            .coordinator
            .get_list_of_seating_request_choices(elsewhere.event_id)
            .await
            .unwrap()
            .remove(0)
            .invitee_request_id;

        let codec = SeatingTokenCodec::new(KEY).unwrap();
        f.coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: codec.encrypt_id(alan.invitee_id).unwrap(),
                }],
            )
            .await
            .unwrap();

        let result = f
            .coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: stranger_token.clone(),
                }],
            )
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::ForeignSeatingTarget { ref token }) if *token == stranger_token
        ));

        let reloaded = f.coordinator.get_invitee(ada.invitee_id).await.unwrap();
        assert_eq!(reloaded.seating_requests.len(), 1);
        assert_eq!(reloaded.seating_requests[0].last_name, "Turing");
    }

    #[tokio::test]
    async fn test_self_reference_rejected_by_policy() {
        let f = fixture_with_policy(SelfReferencePolicy::Reject).await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;
        let alan = add_invitee(&f, "Alan", "Turing", 0).await;

        let codec = SeatingTokenCodec::new(KEY).unwrap();
        f.coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: codec.encrypt_id(alan.invitee_id).unwrap(),
                }],
            )
            .await
            .unwrap();

        let result = f
            .coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: codec.encrypt_id(ada.invitee_id).unwrap(),
                }],
            )
            .await;
        assert!(matches!(result, Err(CoordinatorError::SelfReference { .. })));

        // Previous set survives the rejected submission.
        let reloaded = f.coordinator.get_invitee(ada.invitee_id).await.unwrap();
        assert_eq!(reloaded.seating_requests.len(), 1);
    }

    #[tokio::test]
    async fn test_tampered_seating_token_is_codec_failure() {
        let f = fixture().await;
        let ada = add_invitee(&f, "Ada", "Lovelace", 0).await;

        let result = f
            .coordinator
            .set_invitee_seating_requests(
                ada.invitee_id,
                &[SeatingRequestInput {
                    invitee_request_id: "definitely-not-a-token".to_string(),
                }],
            )
            .await;
        assert!(matches!(result, Err(CoordinatorError::Codec(_))));
    }

    #[tokio::test]
    async fn test_stats_require_admin() {
        let f = fixture().await;
        add_invitee(&f, "Ada", "Lovelace", 1).await;

        let stats = f
            .coordinator
            .get_event_stats(f.event.event_id, f.admin)
            .await
            .unwrap();
        assert_eq!(stats.total_invitees, 1);
        assert_eq!(stats.total_friends, 1);
        assert_eq!(stats.total_guests, 2);
        assert_eq!(stats.attending_guests, 2);

        let result = f
            .coordinator
            .get_event_stats(f.event.event_id, Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(CoordinatorError::Forbidden)));

        let result = f.coordinator.get_event_stats(Uuid::new_v4(), f.admin).await;
        assert!(matches!(result, Err(CoordinatorError::NotFound("Event"))));
    }

    #[tokio::test]
    async fn test_get_events_only_administered() {
        let f = fixture().await;
        let events = f.coordinator.get_events(f.admin).await.unwrap();
        assert_eq!(events, vec![f.event.clone()]);

        assert!(f
            .coordinator
            .get_events(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_menu_items_empty_event() {
        let f = fixture().await;
        let empty = f
            .coordinator
            .create_event(f.admin, &event_request(0))
            .await
            .unwrap();

        assert!(f
            .coordinator
            .get_menu_items_for_event(empty.event_id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            f.coordinator.get_menu_items_for_event(Uuid::new_v4()).await,
            Err(CoordinatorError::NotFound("Event"))
        ));
    }

    #[tokio::test]
    async fn test_friend_limit_enforced() {
        let f = fixture().await;

        let too_many = CreateInviteeRequest {
            email: "ada@example.com".to_string(),
            guest: guest("Ada", "Lovelace"),
            friends: vec![guest("A", "One"), guest("B", "Two")],
        };
        let result = f
            .coordinator
            .create_invitee_for_event(f.event.event_id, f.admin, &too_many)
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::FriendLimitReached { allowed: 1 })
        ));

        let invitee = add_invitee(&f, "Ada", "Lovelace", 0).await;
        let request = InviteeFriendRequest {
            guest: guest("Charles", "Babbage"),
        };
        f.coordinator
            .create_invitee_friend(invitee.invitee_id, &request)
            .await
            .unwrap();
        let result = f
            .coordinator
            .create_invitee_friend(invitee.invitee_id, &request)
            .await;
        assert!(matches!(
            result,
            Err(CoordinatorError::FriendLimitReached { .. })
        ));
    }

    #[tokio::test]
    async fn test_edit_invitee_and_friend() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 1).await;

        let edited = f
            .coordinator
            .edit_invitee(
                invitee.invitee_id,
                &EditInviteeRequest {
                    email: Some("Countess@Example.com".to_string()),
                    guest: Some(GuestInput {
                        first_name: "Augusta".to_string(),
                        last_name: "King".to_string(),
                        attending: false,
                    }),
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.email, "countess@example.com");
        assert_eq!(edited.guest.first_name, "Augusta");
        assert_eq!(edited.guest.guest_id, invitee.guest.guest_id);
        assert!(!edited.guest.attending);

        let friend = f
            .coordinator
            .edit_invitee_friend(
                invitee.invitee_id,
                invitee.friends[0].invitee_friend_id,
                &InviteeFriendRequest {
                    guest: guest("Mary", "Somerville"),
                },
            )
            .await
            .unwrap();
        assert_eq!(friend.guest.first_name, "Mary");
    }

    #[tokio::test]
    async fn test_menu_note_replaced() {
        let f = fixture().await;
        let invitee = add_invitee(&f, "Ada", "Lovelace", 1).await;

        let first = f
            .coordinator
            .set_invitee_menu_note(invitee.invitee_id, "No nuts")
            .await
            .unwrap();
        let second = f
            .coordinator
            .set_invitee_menu_note(invitee.invitee_id, "No nuts, no shellfish")
            .await
            .unwrap();
        assert_eq!(first.menu_note_id, second.menu_note_id);

        f.coordinator
            .set_invitee_friend_menu_note(
                invitee.invitee_id,
                invitee.friends[0].invitee_friend_id,
                "Vegetarian",
            )
            .await
            .unwrap();

        let reloaded = f.coordinator.get_invitee(invitee.invitee_id).await.unwrap();
        assert_eq!(
            reloaded.guest.menu_note.as_deref(),
            Some("No nuts, no shellfish")
        );
        assert_eq!(
            reloaded.friends[0].guest.menu_note.as_deref(),
            Some("Vegetarian")
        );
    }

    #[tokio::test]
    async fn test_invitees_paginated() {
        let f = fixture().await;
        for _ in 0..12 {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            add_invitee(&f, &first, &last, 0).await;
        }

        let page = f
            .coordinator
            .get_invitees_for_event(
                f.event.event_id,
                f.admin,
                Pagination::new(Some(2), Some(10)),
            )
            .await
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.pagination.total_items, 12);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.current_page, 2);

        let result = f
            .coordinator
            .get_invitees_for_event(f.event.event_id, Uuid::new_v4(), Pagination::default())
            .await;
        assert!(matches!(result, Err(CoordinatorError::Forbidden)));
    }
}

//! Domain models for the invitation backend.

pub mod event;
pub mod guest;
pub mod invitee;
pub mod menu;
pub mod seating;
pub mod user;

pub use event::{CreateEventRequest, Event, EventStats};
pub use guest::{Guest, GuestInput};
pub use invitee::{
    CreateInviteeRequest, EditInviteeRequest, Invitee, InviteeFriend, InviteeFriendRequest,
    InviteeResponse, ListInviteesResponse,
};
pub use menu::{
    CreateMenuItemOptionRequest, CreateMenuItemRequest, MenuChoice, MenuChoiceInput, MenuItem,
    MenuItemOption, MenuNote, SetMenuNoteRequest, ValidatedChoice,
};
pub use seating::{
    InviteeSeatingRequest, SeatingRequestChoice, SeatingRequestInput, SeatingRequestView,
    SeatingRequestsResponse, SeatingTarget, SelfReferencePolicy,
};
pub use user::{LoginRequest, TokenResponse, User, UserCredentials};

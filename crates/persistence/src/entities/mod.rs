//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod guest;
pub mod invitee;
pub mod menu;
pub mod seating;
pub mod user;

pub use event::{EventEntity, EventStatsEntity};
pub use guest::GuestEntity;
pub use invitee::{InviteeEntity, InviteeFriendEntity};
pub use menu::{MenuChoiceEntity, MenuItemEntity, MenuItemOptionEntity, MenuNoteEntity};
pub use seating::{SeatingRequestEntity, SeatingTargetEntity};
pub use user::UserEntity;

//! Repository implementations for database operations.

pub mod event;
pub mod invitee;
pub mod menu;
pub mod seating;
pub mod user;

pub use event::EventRepository;
pub use invitee::InviteeRepository;
pub use menu::MenuRepository;
pub use seating::SeatingRepository;
pub use user::UserRepository;

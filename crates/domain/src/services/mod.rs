//! Domain services.
//!
//! Services contain business logic that operates on domain models.

pub mod coordinator;
pub mod gateway;
pub mod memory;
pub mod menu_validation;

pub use coordinator::{Coordinator, CoordinatorError};
pub use gateway::{GatewayError, InvitationGateway};
pub use memory::InMemoryGateway;
pub use menu_validation::{validate_menu_choices, MenuViolation};

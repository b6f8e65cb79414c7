//! Application services that sit beside the coordinator.

pub mod auth;

pub use auth::{AuthError, AuthService};

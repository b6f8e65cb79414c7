//! Domain layer for the Capacious invitation backend.
//!
//! This crate contains:
//! - Domain models (Event, Invitee, MenuItem, seating requests)
//! - Menu choice validation
//! - The storage gateway trait and an in-memory implementation
//! - The coordinator that runs the invitation workflows

pub mod models;
pub mod services;

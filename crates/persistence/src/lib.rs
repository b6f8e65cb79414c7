//! Persistence layer for the Capacious invitations backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - [`PgGateway`], the PostgreSQL-backed `InvitationGateway`

pub mod db;
pub mod entities;
pub mod gateway;
pub mod metrics;
pub mod repositories;

pub use gateway::PgGateway;

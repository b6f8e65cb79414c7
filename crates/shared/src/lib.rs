//! Shared utilities and common types for the Capacious backend.
//!
//! This crate provides leaf functionality used across all other crates:
//! - Seating request token sealing (opaque invitee identifiers)
//! - JWT issuance and validation for organizer logins
//! - Password hashing with Argon2id
//! - Page-number pagination arithmetic

pub mod jwt;
pub mod pagination;
pub mod password;
pub mod seating_token;

//! Userdesk Core - Domain types and pure request logic.
//!
//! This crate provides the pieces of the users CRUD slice that carry decision
//! logic but no I/O:
//! - `web` - HTTP handlers, repository and views built on top of these types
//! - `cli` - Migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database access,
//! no HTTP. With the `postgres` feature enabled the newtypes gain `sqlx`
//! encode/decode support so the repository can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and emails, plus the `User` entity
//! - [`validation`] - Raw form fields to a well-formed [`NewUser`]
//! - [`pagination`] - Query parameters to a clamped page window

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pagination;
pub mod types;
pub mod validation;

pub use pagination::{PageRequest, PageWindow, PaginationError};
pub use types::*;
pub use validation::{ValidationError, validate_user_input};

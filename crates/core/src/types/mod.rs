//! Core types for Userdesk.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use user::{NewUser, User};

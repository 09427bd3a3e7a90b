//! User entity types.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// A validated user that has not been persisted yet.
///
/// Produced by [`validate_user_input`](crate::validate_user_input). The store
/// assigns the identifier on insert, so there is no `id` field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub age: i32,
}

impl NewUser {
    /// Attach an identifier, e.g. the path id of an update request.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier. Never reused.
    pub id: UserId,
    pub name: String,
    /// Unique across all users.
    pub email: Email,
    /// Strictly positive.
    pub age: i32,
}

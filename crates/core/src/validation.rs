//! Validation of raw user form fields.
//!
//! Checks run in a fixed order so the first failing rule decides the
//! rejection: required fields, then email format, then age.

use std::num::IntErrorKind;

use thiserror::Error;

use crate::types::{Email, EmailError, NewUser};

/// Why a submitted user form was rejected.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name or email is empty.
    #[error("name and email are required")]
    EmptyField,
    /// Email does not look like `localpart@domain.tld`.
    #[error("invalid email format")]
    InvalidEmailFormat,
    /// Age is not an integer.
    #[error("age must be a number")]
    InvalidAge,
    /// Age is an integer too large to store.
    #[error("age is out of range")]
    AgeOutOfRange,
    /// Age is zero or negative.
    #[error("age must be greater than 0")]
    NonPositiveAge,
}

impl From<EmailError> for ValidationError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::Empty => Self::EmptyField,
            EmailError::InvalidFormat => Self::InvalidEmailFormat,
        }
    }
}

/// Validate raw form values into a [`NewUser`].
///
/// Values are passed through unchanged on success.
///
/// # Errors
///
/// Returns the first [`ValidationError`] that applies.
pub fn validate_user_input(
    name: &str,
    email: &str,
    age_raw: &str,
) -> Result<NewUser, ValidationError> {
    if name.is_empty() || email.is_empty() {
        return Err(ValidationError::EmptyField);
    }

    let email = Email::parse(email)?;

    let age = age_raw.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => ValidationError::AgeOutOfRange,
        IntErrorKind::NegOverflow => ValidationError::NonPositiveAge,
        _ => ValidationError::InvalidAge,
    })?;
    if age <= 0 {
        return Err(ValidationError::NonPositiveAge);
    }

    Ok(NewUser {
        name: name.to_owned(),
        email,
        age,
    })
}

//! External user identity as seen by the hunt domain.

use derive_getters::Getters;
use tracing::instrument;

use super::error::{Field, ValidationError};

/// An authenticated caller: the identity provider's id plus the phone
/// number the player is reached by.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct User {
    id: String,
    number: String,
}

impl User {
    /// Creates a user, rejecting an empty id or number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] naming the empty field.
    #[instrument(skip(id, number))]
    pub fn new(id: impl Into<String>, number: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let number = number.into();
        if id.is_empty() {
            return Err(ValidationError::Missing(Field::UserId));
        }
        if number.is_empty() {
            return Err(ValidationError::Missing(Field::UserNumber));
        }
        Ok(Self { id, number })
    }
}

#[cfg(test)]
impl User {
    /// Builds a user without checking its fields.
    pub(crate) fn unchecked(id: &str, number: &str) -> Self {
        Self {
            id: id.to_string(),
            number: number.to_string(),
        }
    }
}

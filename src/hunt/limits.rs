//! Length limits imposed on game content.

use super::error::{Field, ValidationError};

/// Maximum characters in a game or level title.
pub const MAX_TITLE_LENGTH: usize = 64;
/// Maximum characters in a game or level description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
/// Maximum characters in a single clue.
pub const MAX_CLUE_LENGTH: usize = 64;
/// Maximum characters in a single answer.
pub const MAX_ANSWER_LENGTH: usize = 64;
/// Maximum characters in a game's ending text.
pub const MAX_ENDING_LENGTH: usize = 200;

/// Points awarded for finishing any game.
pub const GAME_VALUE: u32 = 42;

/// Checks that `value` is non-empty and at most `max` characters long.
pub(crate) fn check_text(value: &str, field: Field, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Checks that `value` is non-empty.
pub(crate) fn check_present(value: &str, field: Field) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(())
}

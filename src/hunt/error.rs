//! Error types for the hunt domain.

use derive_more::{Display, Error};

/// A field of a game definition or user that failed validation.
///
/// Level-scoped fields carry the zero-based level index (and item index for
/// clues and answers) so the caller can point at the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    /// Creator identity of a game.
    #[display("creator")]
    Creator,
    /// Game title.
    #[display("title")]
    Title,
    /// Game description.
    #[display("description")]
    Description,
    /// Game ending text.
    #[display("ending")]
    Ending,
    /// City of an urban game.
    #[display("city")]
    City,
    /// State or province of an urban game.
    #[display("state")]
    State,
    /// Country of an urban game.
    #[display("country")]
    Country,
    /// Title of a level.
    #[display("level {} title", _0)]
    LevelTitle(usize),
    /// Description of a level.
    #[display("level {} description", _0)]
    LevelDescription(usize),
    /// One clue of a level.
    #[display("level {} clue {}", level, index)]
    Clue {
        /// Level index.
        level: usize,
        /// Clue index within the level.
        index: usize,
    },
    /// The answer set of a level.
    #[display("level {} answers", _0)]
    Answers(usize),
    /// One answer of a level.
    #[display("level {} answer {}", level, index)]
    Answer {
        /// Level index.
        level: usize,
        /// Answer index within the level.
        index: usize,
    },
    /// External user identifier.
    #[display("user id")]
    UserId,
    /// External user number.
    #[display("user number")]
    UserNumber,
}

/// Rejection of malformed construction input.
///
/// Raised before anything is built, so a failed construction never leaves a
/// partial value behind.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ValidationError {
    /// A required field is empty.
    #[display("{} is required", _0)]
    Missing(#[error(not(source))] Field),

    /// A field is longer than its limit.
    #[display("{} is longer than {} characters", field, max)]
    TooLong {
        /// Offending field.
        field: Field,
        /// Maximum allowed length.
        max: usize,
    },

    /// The game kind tag is not one this server knows.
    #[display("unrecognized game kind '{}'", _0)]
    UnknownKind(#[error(not(source))] String),

    /// The game has no levels.
    #[display("game has no levels")]
    NoLevels,
}

impl ValidationError {
    /// Returns the field that failed, if the error is about a single field.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Missing(field) | Self::TooLong { field, .. } => Some(*field),
            Self::UnknownKind(_) | Self::NoLevels => None,
        }
    }
}

/// Consistency failure while starting or advancing an attempt.
///
/// These signal a corrupted or misrouted request; correct orchestration never
/// triggers them.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ProgressError {
    /// The game has no identifier or no levels.
    #[display("invalid game")]
    InvalidGame,

    /// The player has no identifier.
    #[display("invalid player")]
    InvalidPlayer,

    /// The state belongs to a different game.
    #[display("invalid game: state is bound to {} but {} was supplied", expected, actual)]
    GameMismatch {
        /// Game the state is bound to.
        expected: String,
        /// Game that was supplied.
        actual: String,
    },

    /// The state belongs to a different player.
    #[display("invalid state: state belongs to {} but {} was supplied", expected, actual)]
    PlayerMismatch {
        /// Player the state belongs to.
        expected: String,
        /// Player that was supplied.
        actual: String,
    },

    /// The state points past the last level of its game.
    #[display("invalid game state: level {} of {}", level, levels)]
    LevelOutOfBounds {
        /// Stored level index.
        level: usize,
        /// Number of levels in the game.
        levels: usize,
    },

    /// Completion was requested for a state that is not completed.
    #[display("game is not completed")]
    NotCompleted,
}

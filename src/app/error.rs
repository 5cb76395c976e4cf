//! Errors surfaced by the command and query handlers.

use derive_more::{Display, Error, From};

use crate::db::{DbError, DbErrorKind};
use crate::hunt::{ProgressError, ValidationError};

/// Failure of a command or query.
///
/// Each variant maps to a stable slug that clients can match on.
#[derive(Debug, Clone, Display, Error, From)]
pub enum AppError {
    /// Malformed input rejected before anything was built.
    #[display("Invalid input: {}", _0)]
    #[from]
    Validation(ValidationError),

    /// The stored attempt does not fit the supplied game or player.
    #[display("Inconsistent attempt: {}", _0)]
    #[from]
    Progress(ProgressError),

    /// Storage failure, including missing records and version conflicts.
    #[display("{}", _0)]
    #[from]
    Db(DbError),

    /// The player has never started a game.
    #[display("Player has no active attempt")]
    NoActiveAttempt,

    /// The request carries no caller identity.
    #[display("Missing caller identity")]
    Unauthorized,

    /// A query parameter is malformed or out of range.
    #[display("Invalid query parameter '{}'", _0)]
    InvalidQuery(#[error(not(source))] String),
}

impl AppError {
    /// Machine-readable identifier for the failure.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::Missing(_)) => "missing-field",
            Self::Validation(ValidationError::TooLong { .. }) => "field-too-long",
            Self::Validation(ValidationError::UnknownKind(_)) => "unknown-game-kind",
            Self::Validation(ValidationError::NoLevels) => "game-has-no-levels",
            Self::Progress(_) => "invalid-game-state",
            Self::Db(e) => match e.kind {
                DbErrorKind::NotFound => "not-found",
                DbErrorKind::Conflict => "conflict",
                DbErrorKind::Corrupt | DbErrorKind::Storage => "internal-error",
            },
            Self::NoActiveAttempt => "no-active-attempt",
            Self::Unauthorized => "missing-context-user",
            Self::InvalidQuery(_) => "query-params",
        }
    }

    /// Whether a looked-up record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Db(e) if e.is_not_found()) || matches!(self, Self::NoActiveAttempt)
    }

    /// Whether the write lost a race with a concurrent update.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Db(e) if e.is_conflict())
    }

    /// Whether the caller sent bad input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidQuery(_))
    }
}

//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Broad category of a [`DbError`], so callers can react to a missing record
/// or a lost race differently from a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// The requested record does not exist.
    #[display("not found")]
    NotFound,
    /// A uniqueness or version check failed.
    #[display("conflict")]
    Conflict,
    /// A stored record could not be turned back into a domain value.
    #[display("corrupt record")]
    Corrupt,
    /// Connection, query or transaction failure.
    #[display("storage failure")]
    Storage,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Error category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a storage error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Storage, message)
    }

    /// Creates an error of the given kind with caller location tracking.
    #[track_caller]
    pub fn with_kind(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates a not-found error.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::NotFound, message)
    }

    /// Creates a conflict error.
    #[track_caller]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Conflict, message)
    }

    /// Creates a corrupt-record error.
    #[track_caller]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Corrupt, message)
    }

    /// Returns true if the record was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == DbErrorKind::NotFound
    }

    /// Returns true if the write lost a uniqueness or version check.
    pub fn is_conflict(&self) -> bool {
        self.kind == DbErrorKind::Conflict
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => Self::not_found("Record not found"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::conflict(format!("Unique constraint violated: {}", info.message()))
            }
            other => Self::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::corrupt(format!("JSON column error: {}", err))
    }
}

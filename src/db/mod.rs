//! Persistence layer for games, players and attempts.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod sqlite;
mod views;

pub use error::{DbError, DbErrorKind};
pub use repository::Repository;
pub use sqlite::{MIGRATIONS, SqliteRepository};
pub use views::{GameFilter, GameSummary, PlayerSummary, StateView};

//! Command and query handlers between the transport and the domain.

mod commands;
mod error;
mod queries;
mod service;

pub use commands::{CreateGame, CreateGameState, GameDraft, UpdateGameState};
pub use error::AppError;
pub use queries::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageLimits};
pub use service::HuntService;

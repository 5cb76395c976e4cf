//! Cache Hunt library - scavenger hunt games over HTTP
//!
//! Creators publish games made of ordered levels. Players start an attempt,
//! answer each level, receive clues on wrong answers and collect the game's
//! points when they solve the last level.
//!
//! # Architecture
//!
//! - **Hunt**: domain types and the attempt state machine
//! - **Db**: the persistence contract and its SQLite implementation
//! - **App**: command and query handlers
//! - **Server**: axum HTTP adapter
//!
//! # Example
//!
//! ```no_run
//! use cache_hunt::{HuntService, SqliteRepository, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = SqliteRepository::new("cache_hunt.db".to_string())?;
//! repository.run_migrations()?;
//!
//! let app = router(HuntService::new(repository));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod app;
mod config;
mod db;
mod hunt;
mod server;

// Crate-level exports - Domain
pub use hunt::{
    Field, Game, GameBuilder, GameId, GameKind, GameKindTag, KindSpec, Level, LevelSpec,
    Location, MissingResponseKind, NO_CLUES_MESSAGE, Player, PlayerId, ProgressError, Response,
    ResponseKind, State, StateId, User, ValidationError,
};
pub use hunt::{
    GAME_VALUE, MAX_ANSWER_LENGTH, MAX_CLUE_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_ENDING_LENGTH,
    MAX_TITLE_LENGTH,
};

// Crate-level exports - Persistence
pub use db::{
    DbError, DbErrorKind, GameFilter, GameSummary, MIGRATIONS, PlayerSummary, Repository,
    SqliteRepository, StateView,
};

// Crate-level exports - Application
pub use app::{
    AppError, CreateGame, CreateGameState, DEFAULT_PAGE_SIZE, GameDraft, HuntService,
    MAX_PAGE_SIZE, Page, PageLimits, UpdateGameState,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, DB_ENV, HOST_ENV, PORT_ENV, ServerConfig};

// Crate-level exports - HTTP
pub use server::{
    AnswerRequest, ApiError, AuthUser, CreatedGame, ErrorBody, GamesQuery, StartRequest,
    USER_ID_HEADER, USER_NUMBER_HEADER, router,
};

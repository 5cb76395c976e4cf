//! Persistence contract required by the hunt's command and query handlers.

use crate::db::{DbError, GameFilter, GameSummary, PlayerSummary, StateView};
use crate::hunt::{Game, Player, State};

/// Storage for games, players and attempts.
///
/// Point lookups fail with a [`DbErrorKind::NotFound`](crate::DbErrorKind)
/// error when the record is absent, which callers use to create players
/// lazily. The two compound writes are atomic: either both records are
/// committed or neither is.
pub trait Repository: Send + Sync {
    /// Stores a new game.
    fn add_game(&self, game: &Game) -> Result<(), DbError>;

    /// Loads a game by id.
    fn get_game(&self, id: &str) -> Result<Game, DbError>;

    /// Stores a new player. Fails with a conflict if the id or number is taken.
    fn add_player(&self, player: &Player) -> Result<(), DbError>;

    /// Loads a player by id.
    fn get_player(&self, id: &str) -> Result<Player, DbError>;

    /// Loads a player by their unique number.
    fn get_player_by_number(&self, number: &str) -> Result<Player, DbError>;

    /// Stores a new attempt.
    fn add_state(&self, state: &State) -> Result<(), DbError>;

    /// Loads an attempt by id.
    fn get_state(&self, id: &str) -> Result<State, DbError>;

    /// Overwrites an attempt.
    ///
    /// Succeeds only if the stored version still equals
    /// [`State::version`]; otherwise fails with a conflict.
    fn update_state(&self, state: &State) -> Result<(), DbError>;

    /// Atomically stores a new attempt and saves its player.
    ///
    /// A player at version 0 has never been stored and is inserted; a
    /// second insert for the same player is a conflict. Any other player is
    /// overwritten only if the stored version still equals
    /// [`Player::version`]. On a conflict nothing is written.
    fn add_state_and_update_player(&self, state: &State, player: &Player) -> Result<(), DbError>;

    /// Atomically overwrites an attempt (with the same version check as
    /// [`Repository::update_state`]) and saves its player under the player
    /// version check of [`Repository::add_state_and_update_player`].
    fn update_state_and_player(&self, state: &State, player: &Player) -> Result<(), DbError>;

    /// Lists game summaries matching `filter`. Returns an empty `Vec` when
    /// nothing matches.
    fn read_games(
        &self,
        limit: i64,
        offset: i64,
        filter: &GameFilter,
    ) -> Result<Vec<GameSummary>, DbError>;

    /// Loads a player's public statistics.
    fn read_player(&self, id: &str) -> Result<PlayerSummary, DbError>;

    /// Loads an attempt's current response.
    fn read_state(&self, id: &str) -> Result<StateView, DbError>;
}

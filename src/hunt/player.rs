//! Players and their aggregate statistics.

use derive_getters::Getters;
use tracing::{info, instrument, warn};

use super::error::ProgressError;
use super::game::Game;
use super::state::{State, StateId};
use super::user::User;

/// Unique identifier of a player. Same as the owning user's id.
pub type PlayerId = String;

/// Per-user play statistics plus a pointer to the active attempt.
///
/// `games_finished <= games_started` always holds, and `total_points` only
/// grows, by a finished game's value.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Player {
    id: PlayerId,
    number: String,
    games_started: u32,
    games_finished: u32,
    total_points: u32,
    current_state_id: Option<StateId>,
    /// Storage version this player was loaded at; 0 until first stored.
    version: u64,
}

impl Player {
    /// Creates a fresh player for `user` with zeroed statistics.
    #[instrument(skip(user), fields(user_id = %user.id()))]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            number: user.number().clone(),
            games_started: 0,
            games_finished: 0,
            total_points: 0,
            current_state_id: None,
            version: 0,
        }
    }

    /// Rebuilds a player from storage.
    pub(crate) fn restore(
        id: PlayerId,
        number: String,
        games_started: u32,
        games_finished: u32,
        total_points: u32,
        current_state_id: Option<StateId>,
        version: u64,
    ) -> Self {
        Self {
            id,
            number,
            games_started,
            games_finished,
            total_points,
            current_state_id,
            version,
        }
    }

    /// Records the start of a new attempt.
    pub(super) fn start_game(&mut self, state_id: &str) {
        self.games_started += 1;
        self.current_state_id = Some(state_id.to_string());
    }

    /// Awards the game's value for a completed attempt.
    ///
    /// Fails without mutating if the state is not completed, belongs to
    /// another game, or belongs to another player.
    #[instrument(
        skip_all,
        fields(player_id = %self.id, game_id = %game.id(), state_id = %state.id())
    )]
    pub(super) fn finish_game(&mut self, game: &Game, state: &State) -> Result<(), ProgressError> {
        if !state.completed() {
            warn!("Refusing to finish an incomplete attempt");
            return Err(ProgressError::NotCompleted);
        }
        if state.game_id() != game.id() {
            warn!(state_game = %state.game_id(), "Attempt bound to another game");
            return Err(ProgressError::GameMismatch {
                expected: state.game_id().clone(),
                actual: game.id().clone(),
            });
        }
        if state.player_id() != &self.id {
            warn!(state_player = %state.player_id(), "Attempt owned by another player");
            return Err(ProgressError::PlayerMismatch {
                expected: state.player_id().clone(),
                actual: self.id.clone(),
            });
        }

        self.games_finished += 1;
        self.total_points += game.value();
        info!(
            games_finished = self.games_finished,
            total_points = self.total_points,
            "Player finished game"
        );
        Ok(())
    }
}

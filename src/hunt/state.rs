//! Attempt state machine: a player's progress through one game.
//!
//! ```text
//!             start
//!               │
//!               ▼
//!   ┌──── level i, no clue ◄──────────────┐
//!   │           │ wrong                   │ correct (i + 1 < n)
//!   │           ▼                         │
//!   │     level i, clue k ───────────────►┤
//!   │      │  ▲ wrong: k = min(k+1, last) │
//!   │      └──┘                           │
//!   │                                     │
//!   └── correct (i + 1 == n) ──► completed (terminal)
//! ```
//!
//! All transitions are pure in-memory computation; persisting the result is
//! the caller's job.

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::error::ProgressError;
use super::game::{Game, GameId};
use super::player::{Player, PlayerId};
use super::response::{NO_CLUES_MESSAGE, Response};

/// Unique identifier of an attempt.
pub type StateId = String;

/// One player's attempt at one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    player_id: PlayerId,
    game_id: GameId,
    game_levels: usize,
    level: usize,
    clue: Option<usize>,
    completed: bool,
    current_response: Response,
    version: u64,
}

impl State {
    /// Starts a new attempt of `game` for `player`.
    ///
    /// The player's started counter and current-attempt pointer are updated
    /// only if both preconditions hold. The returned response is the one
    /// cached on the new state.
    ///
    /// # Errors
    ///
    /// [`ProgressError::InvalidGame`] if the game has no id or no levels,
    /// [`ProgressError::InvalidPlayer`] if the player has no id.
    #[instrument(skip_all, fields(game_id = %game.id(), player_id = %player.id()))]
    pub fn start(game: &Game, player: &mut Player) -> Result<(Self, Response), ProgressError> {
        let Some(first) = game.level(0) else {
            warn!("Cannot start a game without levels");
            return Err(ProgressError::InvalidGame);
        };
        if game.id().is_empty() {
            warn!("Cannot start a game without an id");
            return Err(ProgressError::InvalidGame);
        }
        if player.id().is_empty() {
            warn!("Cannot start a game for a player without an id");
            return Err(ProgressError::InvalidPlayer);
        }

        let id = Uuid::new_v4().to_string();
        let response = Response::level(first.title(), first.description());
        player.start_game(&id);

        let state = Self {
            id,
            player_id: player.id().clone(),
            game_id: game.id().clone(),
            game_levels: game.levels().len(),
            level: 0,
            clue: None,
            completed: false,
            current_response: response.clone(),
            version: 0,
        };

        info!(state_id = %state.id, levels = state.game_levels, "Attempt started");
        Ok((state, response))
    }

    /// Applies one player input and returns the response to show.
    ///
    /// A correct answer moves to the next level (or completes the game and
    /// credits `player`); a wrong one reveals the next clue, repeating the
    /// last clue once they run out. Input on a completed attempt changes
    /// nothing and returns the cached end response.
    ///
    /// On error neither `self` nor `player` is modified.
    ///
    /// # Errors
    ///
    /// [`ProgressError::GameMismatch`] if `game` is not the state's game,
    /// [`ProgressError::LevelOutOfBounds`] if the stored level index is past
    /// the game's last level, or the completion error from the player.
    #[instrument(
        skip(self, game, player),
        fields(state_id = %self.id, level = self.level, clue = ?self.clue)
    )]
    pub fn advance(
        &mut self,
        game: &Game,
        input: &str,
        player: &mut Player,
    ) -> Result<Response, ProgressError> {
        if &self.game_id != game.id() {
            warn!(supplied = %game.id(), "Input for another game");
            return Err(ProgressError::GameMismatch {
                expected: self.game_id.clone(),
                actual: game.id().clone(),
            });
        }

        if self.completed {
            debug!("Attempt already completed, replaying end");
            return Ok(self.current_response.clone());
        }

        let levels = game.levels().len();
        let Some(level) = game.level(self.level) else {
            warn!(levels, "Stored level index out of bounds");
            return Err(ProgressError::LevelOutOfBounds {
                level: self.level,
                levels,
            });
        };

        if level.is_answer(input) {
            let next = self.level + 1;
            return match game.level(next) {
                Some(entered) => {
                    self.level = next;
                    self.clue = None;
                    self.current_response =
                        Response::level(entered.title(), entered.description());
                    info!(level = self.level, "Advanced to next level");
                    Ok(self.current_response.clone())
                }
                None => self.complete(game, player),
            };
        }

        let clues = level.clues();
        if clues.is_empty() {
            debug!("Wrong answer on a level without clues");
            self.current_response = Response::clue(NO_CLUES_MESSAGE);
            return Ok(self.current_response.clone());
        }

        let last = clues.len() - 1;
        let index = self.clue.map_or(0, |shown| (shown + 1).min(last));
        self.clue = Some(index);
        self.current_response = Response::clue(&clues[index]);
        debug!(clue = index, "Wrong answer, revealing clue");
        Ok(self.current_response.clone())
    }

    /// Finishes the attempt: the completed state is staged on a copy and only
    /// written back once the player has been credited.
    fn complete(&mut self, game: &Game, player: &mut Player) -> Result<Response, ProgressError> {
        let mut staged = self.clone();
        staged.level += 1;
        staged.clue = None;
        staged.completed = true;
        staged.current_response = Response::end(game.ending());

        player.finish_game(game, &staged)?;

        *self = staged;
        info!(total_points = player.total_points(), "Attempt completed");
        Ok(self.current_response.clone())
    }

    /// Rebuilds a state from storage.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: StateId,
        player_id: PlayerId,
        game_id: GameId,
        game_levels: usize,
        level: usize,
        clue: Option<usize>,
        completed: bool,
        current_response: Response,
        version: u64,
    ) -> Self {
        Self {
            id,
            player_id,
            game_id,
            game_levels,
            level,
            clue,
            completed,
            current_response,
            version,
        }
    }

    /// Attempt id.
    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// Owning player.
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Game being played.
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Number of levels the game had when the attempt started.
    pub fn game_levels(&self) -> usize {
        self.game_levels
    }

    /// Current zero-based level index. Equals [`State::game_levels`] once
    /// completed.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Index of the last clue shown for the current level, `None` if no clue
    /// has been shown yet.
    pub fn clue(&self) -> Option<usize> {
        self.clue
    }

    /// True once the last level has been answered.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// The response computed by the most recent transition.
    pub fn current_response(&self) -> &Response {
        &self.current_response
    }

    /// Storage version this state was loaded at.
    pub fn version(&self) -> u64 {
        self.version
    }
}

//! Command and query handlers of the hunt.

use tracing::{debug, info, instrument, warn};

use crate::app::{AppError, CreateGame, CreateGameState, PageLimits, UpdateGameState};
use crate::db::{GameFilter, GameSummary, PlayerSummary, Repository, StateView};
use crate::hunt::{Game, GameId, Player, Response, State};

/// Application layer over a [`Repository`].
///
/// Loads the aggregates a command needs, runs the domain transition and
/// commits the result in a single repository call. Handlers hold no locks;
/// concurrent writes to one attempt are settled by the repository's version
/// check.
#[derive(Debug, Clone)]
pub struct HuntService<R> {
    repository: R,
    limits: PageLimits,
}

impl<R: Repository> HuntService<R> {
    /// Creates a service with the default page limits.
    #[instrument(skip(repository))]
    pub fn new(repository: R) -> Self {
        Self::with_limits(repository, PageLimits::default())
    }

    /// Creates a service with explicit page limits.
    #[instrument(skip(repository))]
    pub fn with_limits(repository: R, limits: PageLimits) -> Self {
        info!(?limits, "Creating HuntService");
        Self { repository, limits }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Page limits applied to [`HuntService::list_games`].
    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Validates and stores a new game, returning its id.
    ///
    /// # Errors
    ///
    /// [`AppError::Validation`] for bad input, [`AppError::Db`] if the write
    /// fails.
    #[instrument(skip(self, cmd), fields(creator = %cmd.creator().id()))]
    pub fn create_game(&self, cmd: CreateGame) -> Result<GameId, AppError> {
        let result = self.handle_create_game(cmd);
        log_command("CreateGame", &result);
        result
    }

    fn handle_create_game(&self, cmd: CreateGame) -> Result<GameId, AppError> {
        let (creator, draft) = cmd.into_parts();
        let game = Game::build(
            &creator,
            &draft.title,
            &draft.description,
            &draft.ending,
            draft.kind,
            draft.levels,
        )?;
        self.repository.add_game(&game)?;
        Ok(game.id().clone())
    }

    /// Starts a new attempt for the caller.
    ///
    /// A caller with no player record gets one built from their identity; it
    /// is stored together with the attempt.
    ///
    /// # Errors
    ///
    /// [`AppError::Db`] with a not-found kind for an unknown game, or if the
    /// commit fails.
    #[instrument(skip(self, cmd), fields(user_id = %cmd.user().id(), game_id = %cmd.game_id()))]
    pub fn start_game(&self, cmd: CreateGameState) -> Result<Response, AppError> {
        let result = self.handle_start_game(cmd);
        log_command("CreateGameState", &result);
        result
    }

    fn handle_start_game(&self, cmd: CreateGameState) -> Result<Response, AppError> {
        let game = self.repository.get_game(cmd.game_id())?;

        let mut player = match self.repository.get_player(cmd.user().id()) {
            Ok(player) => player,
            Err(e) if e.is_not_found() => {
                info!("First game for this user, creating player");
                Player::from_user(cmd.user())
            }
            Err(e) => return Err(e.into()),
        };

        let (state, response) = State::start(&game, &mut player)?;
        self.repository.add_state_and_update_player(&state, &player)?;
        Ok(response)
    }

    /// Feeds an answer to the player's active attempt.
    ///
    /// Input to an already completed attempt replays its end response and
    /// writes nothing, so points are never awarded twice.
    ///
    /// # Errors
    ///
    /// [`AppError::NoActiveAttempt`] if the player never started a game,
    /// [`AppError::Db`] for unknown records or a lost version race.
    #[instrument(skip(self, cmd), fields(player_number = %cmd.player_number()))]
    pub fn submit_answer(&self, cmd: UpdateGameState) -> Result<Response, AppError> {
        let result = self.handle_submit_answer(cmd);
        log_command("UpdateGameState", &result);
        result
    }

    fn handle_submit_answer(&self, cmd: UpdateGameState) -> Result<Response, AppError> {
        let mut player = self.repository.get_player_by_number(cmd.player_number())?;
        let state_id = player
            .current_state_id()
            .clone()
            .ok_or(AppError::NoActiveAttempt)?;

        let mut state = self.repository.get_state(&state_id)?;
        let game = self.repository.get_game(state.game_id())?;

        if state.completed() {
            debug!(state_id = %state_id, "Attempt already completed");
            return Ok(state.advance(&game, cmd.input(), &mut player)?);
        }

        let response = state.advance(&game, cmd.input(), &mut player)?;
        self.repository.update_state_and_player(&state, &player)?;
        Ok(response)
    }

    /// Lists games matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// [`AppError::InvalidQuery`] for a bad page window, [`AppError::Db`] if
    /// the read fails.
    #[instrument(skip(self))]
    pub fn list_games(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
        filter: &GameFilter,
    ) -> Result<Vec<GameSummary>, AppError> {
        let page = self.limits.resolve(limit, offset)?;
        debug!(?page, "Listing games");
        Ok(self
            .repository
            .read_games(*page.limit(), *page.offset(), filter)?)
    }

    /// Loads a player's statistics.
    ///
    /// # Errors
    ///
    /// [`AppError::Db`] with a not-found kind for an unknown player.
    #[instrument(skip(self))]
    pub fn player_summary(&self, player_id: &str) -> Result<PlayerSummary, AppError> {
        Ok(self.repository.read_player(player_id)?)
    }

    /// Loads the last response of an attempt.
    ///
    /// # Errors
    ///
    /// [`AppError::Db`] with a not-found kind for an unknown attempt.
    #[instrument(skip(self))]
    pub fn state_view(&self, state_id: &str) -> Result<StateView, AppError> {
        Ok(self.repository.read_state(state_id)?)
    }
}

fn log_command<T>(name: &str, result: &Result<T, AppError>) {
    match result {
        Ok(_) => info!(command = name, "{} command succeeded", name),
        Err(e) => warn!(command = name, error = %e, slug = e.slug(), "{} command failed", name),
    }
}

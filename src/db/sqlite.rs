//! SQLite implementation of the [`Repository`] contract.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{
    GameRecord, NewGameRecord, PlayerChanges, PlayerRecord, StateChanges, StateRecord,
};
use crate::db::{DbError, GameFilter, GameSummary, PlayerSummary, Repository, StateView, schema};
use crate::hunt::{Game, Player, Response, State};

/// Schema migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// SQLite-backed repository.
///
/// Opens a fresh connection per call, so the path must name a file; an
/// `":memory:"` database would be empty on every call.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: String,
}

impl SqliteRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating SqliteRepository");
        Ok(Self { db_path })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS)).execute(&mut conn)?;
        diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
        Ok(conn)
    }

    fn insert_state(conn: &mut SqliteConnection, state: &State) -> Result<(), DbError> {
        let row = StateChanges::new(state, state.version())?;
        diesel::insert_into(schema::states::table)
            .values(&row)
            .execute(conn)?;
        Ok(())
    }

    /// Compare-and-swap on `states.version`; bumps the version on success.
    fn swap_state(conn: &mut SqliteConnection, state: &State) -> Result<(), DbError> {
        let expected = i64::try_from(state.version())
            .map_err(|_| DbError::new(format!("State version {} out of range", state.version())))?;
        let row = StateChanges::new(state, state.version() + 1)?;

        let updated = diesel::update(
            schema::states::table
                .filter(schema::states::id.eq(state.id()))
                .filter(schema::states::version.eq(expected)),
        )
        .set(&row)
        .execute(conn)?;

        if updated == 1 {
            return Ok(());
        }

        let exists = schema::states::table
            .find(state.id())
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if exists {
            warn!(state_id = %state.id(), version = state.version(), "Stale state write rejected");
            Err(DbError::conflict(format!(
                "State '{}' was modified since version {}",
                state.id(),
                state.version()
            )))
        } else {
            Err(DbError::not_found(format!("State '{}' not found", state.id())))
        }
    }

    /// Inserts a player that was never stored (version 0); otherwise a
    /// compare-and-swap on `players.version`. Every write stores the next
    /// version, so two first writes for one player collide on the key.
    fn save_player(conn: &mut SqliteConnection, player: &Player) -> Result<(), DbError> {
        let row = PlayerChanges::new(player, player.version() + 1)?;

        if *player.version() == 0 {
            diesel::insert_into(schema::players::table)
                .values(&row)
                .execute(conn)?;
            return Ok(());
        }

        let expected = i64::try_from(*player.version()).map_err(|_| {
            DbError::new(format!("Player version {} out of range", player.version()))
        })?;
        let updated = diesel::update(
            schema::players::table
                .filter(schema::players::id.eq(player.id()))
                .filter(schema::players::version.eq(expected)),
        )
        .set(&row)
        .execute(conn)?;

        if updated == 1 {
            return Ok(());
        }

        let exists = schema::players::table
            .find(player.id())
            .count()
            .get_result::<i64>(conn)?
            > 0;
        if exists {
            warn!(
                player_id = %player.id(),
                version = player.version(),
                "Stale player write rejected"
            );
            Err(DbError::conflict(format!(
                "Player '{}' was modified since version {}",
                player.id(),
                player.version()
            )))
        } else {
            Err(DbError::not_found(format!("Player '{}' not found", player.id())))
        }
    }
}

impl Repository for SqliteRepository {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn add_game(&self, game: &Game) -> Result<(), DbError> {
        debug!("Adding game");
        let mut conn = self.connection()?;
        let row = NewGameRecord::from_game(game)?;

        diesel::insert_into(schema::games::table)
            .values(&row)
            .execute(&mut conn)?;

        info!(title = %game.title(), levels = game.levels().len(), "Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_game(&self, id: &str) -> Result<Game, DbError> {
        debug!(game_id = %id, "Loading game");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .find(id)
            .select(GameRecord::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("Game '{}' not found", id)))?;

        record.into_game()
    }

    #[instrument(skip(self, player), fields(player_id = %player.id()))]
    fn add_player(&self, player: &Player) -> Result<(), DbError> {
        debug!("Adding player");
        let mut conn = self.connection()?;

        diesel::insert_into(schema::players::table)
            .values(&PlayerChanges::new(player, player.version() + 1)?)
            .execute(&mut conn)?;

        info!("Player stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_player(&self, id: &str) -> Result<Player, DbError> {
        debug!(player_id = %id, "Loading player");
        let mut conn = self.connection()?;

        schema::players::table
            .find(id)
            .select(PlayerRecord::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("Player '{}' not found", id)))?
            .into_player()
    }

    #[instrument(skip(self))]
    fn get_player_by_number(&self, number: &str) -> Result<Player, DbError> {
        debug!("Loading player by number");
        let mut conn = self.connection()?;

        schema::players::table
            .filter(schema::players::number.eq(number))
            .select(PlayerRecord::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found("No player with that number"))?
            .into_player()
    }

    #[instrument(skip(self, state), fields(state_id = %state.id()))]
    fn add_state(&self, state: &State) -> Result<(), DbError> {
        debug!("Adding state");
        let mut conn = self.connection()?;
        Self::insert_state(&mut conn, state)?;
        info!("State stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_state(&self, id: &str) -> Result<State, DbError> {
        debug!(state_id = %id, "Loading state");
        let mut conn = self.connection()?;

        schema::states::table
            .find(id)
            .select(StateRecord::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("State '{}' not found", id)))?
            .into_state()
    }

    #[instrument(skip(self, state), fields(state_id = %state.id(), version = state.version()))]
    fn update_state(&self, state: &State) -> Result<(), DbError> {
        debug!("Updating state");
        let mut conn = self.connection()?;
        conn.immediate_transaction(|conn| Self::swap_state(conn, state))?;
        info!("State updated");
        Ok(())
    }

    #[instrument(
        skip(self, state, player),
        fields(state_id = %state.id(), player_id = %player.id())
    )]
    fn add_state_and_update_player(&self, state: &State, player: &Player) -> Result<(), DbError> {
        debug!("Adding state and updating player");
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            Self::save_player(conn, player)?;
            Self::insert_state(conn, state)
        })?;

        info!(games_started = player.games_started(), "State and player committed");
        Ok(())
    }

    #[instrument(
        skip(self, state, player),
        fields(state_id = %state.id(), player_id = %player.id(), version = state.version())
    )]
    fn update_state_and_player(&self, state: &State, player: &Player) -> Result<(), DbError> {
        debug!("Updating state and player");
        let mut conn = self.connection()?;

        conn.immediate_transaction(|conn| {
            Self::swap_state(conn, state)?;
            Self::save_player(conn, player)
        })?;

        info!(
            completed = state.completed(),
            total_points = player.total_points(),
            "State and player committed"
        );
        Ok(())
    }

    #[instrument(skip(self, filter))]
    fn read_games(
        &self,
        limit: i64,
        offset: i64,
        filter: &GameFilter,
    ) -> Result<Vec<GameSummary>, DbError> {
        debug!(?filter, "Reading games");
        let mut conn = self.connection()?;

        let mut query = schema::games::table
            .select(GameSummary::as_select())
            .into_boxed::<Sqlite>();
        if let Some(kind) = &filter.kind {
            query = query.filter(schema::games::kind.eq(kind));
        }
        if let Some(city) = &filter.city {
            query = query.filter(schema::games::city.eq(city));
        }
        if let Some(state) = &filter.state {
            query = query.filter(schema::games::state.eq(state));
        }
        if let Some(country) = &filter.country {
            query = query.filter(schema::games::country.eq(country));
        }
        if let Some(creator) = &filter.creator {
            query = query.filter(schema::games::creator_id.eq(creator));
        }

        let games = query
            .order((schema::games::created_at.desc(), schema::games::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;

        info!(count = games.len(), "Games read");
        Ok(games)
    }

    #[instrument(skip(self))]
    fn read_player(&self, id: &str) -> Result<PlayerSummary, DbError> {
        debug!(player_id = %id, "Reading player summary");
        let mut conn = self.connection()?;

        schema::players::table
            .find(id)
            .select(PlayerSummary::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("Player '{}' not found", id)))
    }

    #[instrument(skip(self))]
    fn read_state(&self, id: &str) -> Result<StateView, DbError> {
        debug!(state_id = %id, "Reading state view");
        let mut conn = self.connection()?;

        let json = schema::states::table
            .find(id)
            .select(schema::states::current_response)
            .first::<String>(&mut conn)
            .optional()?
            .ok_or_else(|| DbError::not_found(format!("State '{}' not found", id)))?;

        let response: Response = serde_json::from_str(&json)?;
        Ok(StateView::new(response))
    }
}

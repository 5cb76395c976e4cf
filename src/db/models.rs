//! Database models and their mapping to domain types.

use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};
use crate::hunt::{Game, GameKind, GameKindTag, Level, Location, Player, Response, State};

/// Stored game row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: String,
    creator_id: String,
    title: String,
    description: String,
    ending: String,
    kind: String,
    city: String,
    state: String,
    country: String,
    levels: String,
    value: i32,
}

impl GameRecord {
    /// Converts the row back into a [`Game`].
    ///
    /// # Errors
    ///
    /// Returns a corrupt-record [`DbError`] if the kind tag, levels JSON or
    /// value cannot be decoded.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn into_game(self) -> Result<Game, DbError> {
        let tag = GameKindTag::from_str(&self.kind)
            .map_err(|_| DbError::corrupt(format!("Unknown game kind '{}'", self.kind)))?;
        let kind = match tag {
            GameKindTag::Urban => {
                GameKind::Urban(Location::new(self.city, self.state, self.country))
            }
        };
        let levels: Vec<Level> = serde_json::from_str(&self.levels)?;
        let value = u32::try_from(self.value)
            .map_err(|_| DbError::corrupt(format!("Negative game value {}", self.value)))?;

        Ok(Game::restore(
            self.id,
            self.creator_id,
            self.title,
            self.description,
            self.ending,
            kind,
            levels,
            value,
        ))
    }
}

/// Insertable game row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    id: String,
    creator_id: String,
    title: String,
    description: String,
    ending: String,
    kind: String,
    city: String,
    state: String,
    country: String,
    levels: String,
    value: i32,
}

impl NewGameRecord {
    /// Builds the row for a new game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the levels cannot be serialized or the value
    /// does not fit the column.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        let (city, state, country) = match game.kind().location() {
            Some(location) => (
                location.city().clone(),
                location.state().clone(),
                location.country().clone(),
            ),
            None => Default::default(),
        };
        let value = i32::try_from(*game.value())
            .map_err(|_| DbError::new(format!("Game value {} out of range", game.value())))?;

        Ok(Self {
            id: game.id().clone(),
            creator_id: game.creator_id().clone(),
            title: game.title().clone(),
            description: game.description().clone(),
            ending: game.ending().clone(),
            kind: game.kind().tag().to_string(),
            city,
            state,
            country,
            levels: serde_json::to_string(game.levels())?,
            value,
        })
    }
}

/// Stored player row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::players)]
pub struct PlayerRecord {
    id: String,
    number: String,
    games_started: i64,
    games_finished: i64,
    total_points: i64,
    current_state_id: Option<String>,
    version: i64,
}

impl PlayerRecord {
    /// Converts the row back into a [`Player`].
    ///
    /// # Errors
    ///
    /// Returns a corrupt-record [`DbError`] if a counter or the version is
    /// out of range.
    #[instrument(skip(self), fields(player_id = %self.id))]
    pub fn into_player(self) -> Result<Player, DbError> {
        let version = u64::try_from(self.version)
            .map_err(|_| DbError::corrupt(format!("Negative player version {}", self.version)))?;

        Ok(Player::restore(
            self.id,
            self.number,
            counter(self.games_started, "games_started")?,
            counter(self.games_finished, "games_finished")?,
            counter(self.total_points, "total_points")?,
            self.current_state_id,
            version,
        ))
    }
}

/// Player row for inserts and versioned updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::players)]
#[diesel(treat_none_as_null = true)]
pub struct PlayerChanges {
    id: String,
    number: String,
    games_started: i64,
    games_finished: i64,
    total_points: i64,
    current_state_id: Option<String>,
    version: i64,
    updated_at: NaiveDateTime,
}

impl PlayerChanges {
    /// Builds the row for `player`, stamped with `version`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the version does not fit its column.
    pub fn new(player: &Player, version: u64) -> Result<Self, DbError> {
        let version = i64::try_from(version)
            .map_err(|_| DbError::new(format!("Player version {} out of range", version)))?;

        Ok(Self {
            id: player.id().clone(),
            number: player.number().clone(),
            games_started: i64::from(*player.games_started()),
            games_finished: i64::from(*player.games_finished()),
            total_points: i64::from(*player.total_points()),
            current_state_id: player.current_state_id().clone(),
            version,
            updated_at: Utc::now().naive_utc(),
        })
    }
}

/// Stored attempt row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::states)]
pub struct StateRecord {
    id: String,
    player_id: String,
    game_id: String,
    game_levels: i32,
    level: i32,
    clue: i32,
    completed: bool,
    current_response: String,
    version: i64,
}

impl StateRecord {
    /// Converts the row back into a [`State`].
    ///
    /// A stored clue of `-1` means no clue has been shown.
    ///
    /// # Errors
    ///
    /// Returns a corrupt-record [`DbError`] for negative indices, a clue
    /// below `-1`, or an undecodable response.
    #[instrument(skip(self), fields(state_id = %self.id))]
    pub fn into_state(self) -> Result<State, DbError> {
        let clue = match self.clue {
            -1 => None,
            n => Some(index(n, "clue")?),
        };
        let response: Response = serde_json::from_str(&self.current_response)?;
        let version = u64::try_from(self.version)
            .map_err(|_| DbError::corrupt(format!("Negative state version {}", self.version)))?;

        Ok(State::restore(
            self.id,
            self.player_id,
            self.game_id,
            index(self.game_levels, "game_levels")?,
            index(self.level, "level")?,
            clue,
            self.completed,
            response,
            version,
        ))
    }
}

/// Attempt row for inserts and versioned updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = schema::states)]
pub struct StateChanges {
    id: String,
    player_id: String,
    game_id: String,
    game_levels: i32,
    level: i32,
    clue: i32,
    completed: bool,
    current_response: String,
    version: i64,
    updated_at: NaiveDateTime,
}

impl StateChanges {
    /// Builds the row for `state`, stamped with `version`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if an index does not fit its column or the
    /// response cannot be serialized.
    #[instrument(skip(state), fields(state_id = %state.id()))]
    pub fn new(state: &State, version: u64) -> Result<Self, DbError> {
        let clue = match state.clue() {
            None => -1,
            Some(n) => column(n, "clue")?,
        };
        let version = i64::try_from(version)
            .map_err(|_| DbError::new(format!("State version {} out of range", version)))?;

        Ok(Self {
            id: state.id().clone(),
            player_id: state.player_id().clone(),
            game_id: state.game_id().clone(),
            game_levels: column(state.game_levels(), "game_levels")?,
            level: column(state.level(), "level")?,
            clue,
            completed: state.completed(),
            current_response: serde_json::to_string(state.current_response())?,
            version,
            updated_at: Utc::now().naive_utc(),
        })
    }
}

fn counter(value: i64, name: &str) -> Result<u32, DbError> {
    u32::try_from(value)
        .map_err(|_| DbError::corrupt(format!("{} out of range: {}", name, value)))
}

fn index(value: i32, name: &str) -> Result<usize, DbError> {
    usize::try_from(value)
        .map_err(|_| DbError::corrupt(format!("{} out of range: {}", name, value)))
}

fn column(value: usize, name: &str) -> Result<i32, DbError> {
    i32::try_from(value)
        .map_err(|_| DbError::new(format!("{} too large to store: {}", name, value)))
}

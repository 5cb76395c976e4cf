//! Read models served to clients by the query side.

use derive_getters::Getters;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::schema;
use crate::hunt::Response;

/// Equality filters for listing games. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFilter {
    /// Kind tag, e.g. `"urban"`.
    pub kind: Option<String>,
    /// City.
    pub city: Option<String>,
    /// State or province.
    pub state: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Creator id.
    pub creator: Option<String>,
}

/// A game as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Getters, Serialize, Deserialize)]
#[diesel(table_name = schema::games)]
pub struct GameSummary {
    id: String,
    title: String,
    description: String,
}

/// A player's public statistics.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Getters, Serialize, Deserialize)]
#[diesel(table_name = schema::players)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    games_finished: i64,
    total_points: i64,
}

/// The last response of an attempt, for idempotent re-reads.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    current_response: Response,
}

impl StateView {
    /// Wraps a response.
    pub fn new(current_response: Response) -> Self {
        Self { current_response }
    }
}

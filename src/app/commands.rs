//! Write-side inputs of the hunt.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::hunt::{GameId, KindSpec, LevelSpec, User};

/// Everything a creator supplies for a new game.
///
/// The kind fields sit at the top level of the JSON body:
///
/// ```json
/// { "title": "..", "description": "..", "ending": "..",
///   "kind": "urban", "city": "..", "state": "..", "country": "..",
///   "levels": [{ "title": "..", "description": "..", "clues": [], "answers": [".."] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct GameDraft {
    /// Game title.
    pub title: String,
    /// Game description.
    pub description: String,
    /// Message shown once the last level is solved.
    pub ending: String,
    /// Kind tag and its location fields.
    #[serde(flatten)]
    pub kind: KindSpec,
    /// Levels in play order.
    #[serde(default)]
    pub levels: Vec<LevelSpec>,
}

/// Creates a game authored by `creator`.
#[derive(Debug, Clone, Getters, new)]
pub struct CreateGame {
    creator: User,
    draft: GameDraft,
}

impl CreateGame {
    pub(crate) fn into_parts(self) -> (User, GameDraft) {
        (self.creator, self.draft)
    }
}

/// Starts an attempt at `game_id` for `user`, creating the player on first use.
#[derive(Debug, Clone, Getters, new)]
pub struct CreateGameState {
    user: User,
    game_id: GameId,
}

/// Submits `input` to the active attempt of the player numbered `player_number`.
#[derive(Debug, Clone, Getters, new)]
pub struct UpdateGameState {
    player_number: String,
    input: String,
}

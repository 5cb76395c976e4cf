//! Scavenger-hunt domain: game definitions, players and the attempt state
//! machine.

mod error;
mod game;
mod kind;
mod level;
mod limits;
mod player;
mod response;
mod state;
mod user;

pub use error::{Field, ProgressError, ValidationError};
pub use game::{Game, GameBuilder, GameId};
pub use kind::{GameKind, GameKindTag, KindSpec, Location};
pub use level::{Level, LevelSpec};
pub use limits::{
    GAME_VALUE, MAX_ANSWER_LENGTH, MAX_CLUE_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_ENDING_LENGTH,
    MAX_TITLE_LENGTH,
};
pub use player::{Player, PlayerId};
pub use response::{MissingResponseKind, NO_CLUES_MESSAGE, Response, ResponseKind};
pub use state::{State, StateId};
pub use user::User;

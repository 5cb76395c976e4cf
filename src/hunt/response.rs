//! Responses returned to a player after every transition.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};

/// Message sent as a clue when the current level has none.
pub const NO_CLUES_MESSAGE: &str = "this level has no clues";

/// Discriminant of a [`Response`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    StrumDisplay,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseKind {
    /// A new level was entered.
    Level,
    /// A clue for the current level.
    Clue,
    /// The game is over.
    End,
}

/// Result of a progression step. Exactly one payload per kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResponseRecord", try_from = "ResponseRecord")]
pub enum Response {
    /// The player entered a level.
    Level {
        /// Level title.
        title: String,
        /// Level description.
        description: String,
    },
    /// The answer was wrong; here is a clue.
    Clue {
        /// Clue text, or [`NO_CLUES_MESSAGE`].
        clue: String,
    },
    /// The game was completed.
    End {
        /// The game's ending text.
        message: String,
    },
}

impl Response {
    /// Returns the kind of this response.
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Level { .. } => ResponseKind::Level,
            Self::Clue { .. } => ResponseKind::Clue,
            Self::End { .. } => ResponseKind::End,
        }
    }

    pub(crate) fn level(title: &str, description: &str) -> Self {
        Self::Level {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub(crate) fn clue(clue: &str) -> Self {
        Self::Clue {
            clue: clue.to_string(),
        }
    }

    pub(crate) fn end(message: &str) -> Self {
        Self::End {
            message: message.to_string(),
        }
    }
}

/// Flat wire shape: every payload field present, only the one matching
/// `kind` non-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseRecord {
    kind: Option<ResponseKind>,
    #[serde(default)]
    level_title: String,
    #[serde(default)]
    level_description: String,
    #[serde(default)]
    clue: String,
    #[serde(default)]
    end_message: String,
}

/// A stored or received response without a `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("response has no kind")]
pub struct MissingResponseKind;

impl From<Response> for ResponseRecord {
    fn from(response: Response) -> Self {
        let kind = Some(response.kind());
        match response {
            Response::Level { title, description } => Self {
                kind,
                level_title: title,
                level_description: description,
                ..Self::default()
            },
            Response::Clue { clue } => Self {
                kind,
                clue,
                ..Self::default()
            },
            Response::End { message } => Self {
                kind,
                end_message: message,
                ..Self::default()
            },
        }
    }
}

impl TryFrom<ResponseRecord> for Response {
    type Error = MissingResponseKind;

    fn try_from(record: ResponseRecord) -> Result<Self, Self::Error> {
        match record.kind.ok_or(MissingResponseKind)? {
            ResponseKind::Level => Ok(Self::Level {
                title: record.level_title,
                description: record.level_description,
            }),
            ResponseKind::Clue => Ok(Self::Clue { clue: record.clue }),
            ResponseKind::End => Ok(Self::End {
                message: record.end_message,
            }),
        }
    }
}

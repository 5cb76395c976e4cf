//! Game kinds and the fields each kind requires.

use std::str::FromStr;

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, instrument};

use super::error::{Field, ValidationError};
use super::limits::check_present;

/// Wire and storage tag of a [`GameKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum GameKindTag {
    /// Played across a city.
    Urban,
}

/// Where an urban game takes place.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct Location {
    city: String,
    state: String,
    country: String,
}

/// Kind-specific part of a game definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameKind {
    /// A game played across a city. All location fields are required.
    Urban(Location),
}

/// Unvalidated kind input: the tag as received plus every kind-specific
/// field a creator may send. Each kind reads only the fields it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct KindSpec {
    /// Kind tag, e.g. `"urban"`.
    pub kind: String,
    /// City, required for urban games.
    #[serde(default)]
    pub city: String,
    /// State or province, required for urban games.
    #[serde(default)]
    pub state: String,
    /// Country, required for urban games.
    #[serde(default)]
    pub country: String,
}

impl KindSpec {
    /// Convenience constructor for an urban game.
    pub fn urban(
        city: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            kind: GameKindTag::Urban.to_string(),
            city: city.into(),
            state: state.into(),
            country: country.into(),
        }
    }

    /// Resolves the tag and validates the fields required by that kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownKind`] for an unrecognized tag, or
    /// [`ValidationError::Missing`] for an absent kind-specific field.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub fn validate(self) -> Result<GameKind, ValidationError> {
        let tag = GameKindTag::from_str(&self.kind)
            .map_err(|_| ValidationError::UnknownKind(self.kind.clone()))?;
        debug!(tag = %tag, "Resolved game kind");

        match tag {
            GameKindTag::Urban => {
                check_present(&self.city, Field::City)?;
                check_present(&self.state, Field::State)?;
                check_present(&self.country, Field::Country)?;
                Ok(GameKind::Urban(Location::new(self.city, self.state, self.country)))
            }
        }
    }
}

impl GameKind {
    /// Returns the tag identifying this kind.
    pub fn tag(&self) -> GameKindTag {
        match self {
            Self::Urban(_) => GameKindTag::Urban,
        }
    }

    /// Returns the location for kinds that have one.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Urban(location) => Some(location),
        }
    }
}

//! Game definitions and their validating builder.

use derive_getters::Getters;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::{Field, ValidationError};
use super::kind::{GameKind, KindSpec};
use super::level::{Level, LevelSpec};
use super::limits::{
    GAME_VALUE, MAX_DESCRIPTION_LENGTH, MAX_ENDING_LENGTH, MAX_TITLE_LENGTH, check_text,
};
use super::user::User;

/// Unique identifier of a game.
pub type GameId = String;

/// An immutable scavenger-hunt definition.
///
/// A `Game` always has at least one level and every field is within its
/// length limit. Obtain one through [`Game::build`] or [`GameBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Game {
    id: GameId,
    creator_id: String,
    title: String,
    description: String,
    ending: String,
    kind: GameKind,
    levels: Vec<Level>,
    value: u32,
}

impl Game {
    /// Validates every input and builds a game in one step.
    ///
    /// Levels keep the order in which they are supplied.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered; no game is built.
    #[instrument(skip_all, fields(title = %title))]
    pub fn build(
        creator: &User,
        title: &str,
        description: &str,
        ending: &str,
        kind: KindSpec,
        levels: impl IntoIterator<Item = LevelSpec>,
    ) -> Result<Self, ValidationError> {
        levels
            .into_iter()
            .try_fold(
                GameBuilder::new(creator, title, description, ending, kind)?,
                GameBuilder::level,
            )?
            .build()
    }

    /// Rebuilds a game from storage without re-running validation.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: GameId,
        creator_id: String,
        title: String,
        description: String,
        ending: String,
        kind: GameKind,
        levels: Vec<Level>,
        value: u32,
    ) -> Self {
        Self {
            id,
            creator_id,
            title,
            description,
            ending,
            kind,
            levels,
            value,
        }
    }

    /// Returns the level at `index`, if any.
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }
}

/// Accumulates validated levels for a new [`Game`].
///
/// The header fields are validated by [`GameBuilder::new`]; each call to
/// [`GameBuilder::level`] validates one level and consumes the builder on
/// failure, so an invalid level can never end up in a built game.
#[derive(Debug, Clone)]
pub struct GameBuilder {
    creator_id: String,
    title: String,
    description: String,
    ending: String,
    kind: GameKind,
    levels: Vec<Level>,
}

impl GameBuilder {
    /// Validates the game header.
    ///
    /// # Errors
    ///
    /// Checks, in order: creator, title, description, ending, kind.
    #[instrument(skip_all, fields(creator = %creator.id(), title = %title))]
    pub fn new(
        creator: &User,
        title: &str,
        description: &str,
        ending: &str,
        kind: KindSpec,
    ) -> Result<Self, ValidationError> {
        if creator.id().is_empty() {
            return Err(ValidationError::Missing(Field::Creator));
        }
        check_text(title, Field::Title, MAX_TITLE_LENGTH)?;
        check_text(description, Field::Description, MAX_DESCRIPTION_LENGTH)?;
        check_text(ending, Field::Ending, MAX_ENDING_LENGTH)?;
        let kind = kind.validate()?;

        Ok(Self {
            creator_id: creator.id().clone(),
            title: title.to_string(),
            description: description.to_string(),
            ending: ending.to_string(),
            kind,
            levels: Vec::new(),
        })
    }

    /// Validates `spec` and appends it as the next level.
    ///
    /// # Errors
    ///
    /// Returns the level's [`ValidationError`]; the builder is dropped.
    #[instrument(skip_all, fields(index = self.levels.len()))]
    pub fn level(mut self, spec: LevelSpec) -> Result<Self, ValidationError> {
        let level = spec.validate(self.levels.len())?;
        self.levels.push(level);
        Ok(self)
    }

    /// Number of levels added so far.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Returns true if no level has been added.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Assigns an id and the fixed point value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NoLevels`] if no level was added.
    #[instrument(skip(self), fields(title = %self.title, levels = self.levels.len()))]
    pub fn build(self) -> Result<Game, ValidationError> {
        if self.levels.is_empty() {
            debug!("Rejecting game without levels");
            return Err(ValidationError::NoLevels);
        }

        let game = Game {
            id: Uuid::new_v4().to_string(),
            creator_id: self.creator_id,
            title: self.title,
            description: self.description,
            ending: self.ending,
            kind: self.kind,
            levels: self.levels,
            value: GAME_VALUE,
        };

        info!(game_id = %game.id, levels = game.levels.len(), "Game built");
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> User {
        User::new("creator-1", "15734497033").expect("Valid user")
    }

    fn level(n: usize) -> LevelSpec {
        LevelSpec::new(
            format!("Level {n}"),
            format!("Description {n}"),
            vec![format!("clue {n}")],
            vec![format!("answer {n}")],
        )
    }

    fn build_with(levels: Vec<LevelSpec>) -> Result<Game, ValidationError> {
        Game::build(
            &creator(),
            "Downtown Dash",
            "A walk around downtown",
            "You made it!",
            KindSpec::urban("Austin", "Texas", "USA"),
            levels,
        )
    }

    #[test]
    fn test_build_assigns_id_and_value() {
        let game = build_with(vec![level(1)]).expect("Valid game");
        assert!(!game.id().is_empty());
        assert_eq!(*game.value(), GAME_VALUE);
        assert_eq!(game.creator_id(), "creator-1");
    }

    #[test]
    fn test_build_ids_are_unique() {
        let a = build_with(vec![level(1)]).expect("Valid game");
        let b = build_with(vec![level(1)]).expect("Valid game");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_no_levels_rejected() {
        assert_eq!(build_with(vec![]).unwrap_err(), ValidationError::NoLevels);
    }

    #[test]
    fn test_invalid_second_level_rejects_whole_game() {
        let mut bad = level(2);
        bad.title = String::new();
        let err = build_with(vec![level(1), bad, level(3)]).unwrap_err();
        assert_eq!(err, ValidationError::Missing(Field::LevelTitle(1)));
    }

    #[test]
    fn test_header_checked_before_levels() {
        let err = Game::build(
            &creator(),
            "",
            "desc",
            "end",
            KindSpec::urban("Austin", "Texas", "USA"),
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Missing(Field::Title));
    }

    #[test]
    fn test_header_limits_name_the_field() {
        let long_title = "t".repeat(MAX_TITLE_LENGTH + 1);
        let long_description = "d".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let long_ending = "e".repeat(MAX_ENDING_LENGTH + 1);
        let at_limit = "d".repeat(MAX_DESCRIPTION_LENGTH);
        let cases = [
            (
                creator(),
                long_title.as_str(),
                "d",
                "e",
                Err(ValidationError::TooLong {
                    field: Field::Title,
                    max: MAX_TITLE_LENGTH,
                }),
            ),
            (
                creator(),
                "t",
                long_description.as_str(),
                "e",
                Err(ValidationError::TooLong {
                    field: Field::Description,
                    max: MAX_DESCRIPTION_LENGTH,
                }),
            ),
            (
                creator(),
                "t",
                "d",
                long_ending.as_str(),
                Err(ValidationError::TooLong {
                    field: Field::Ending,
                    max: MAX_ENDING_LENGTH,
                }),
            ),
            (
                User::unchecked("", "15734497033"),
                "t",
                "d",
                "e",
                Err(ValidationError::Missing(Field::Creator)),
            ),
            (creator(), "t", at_limit.as_str(), at_limit.as_str(), Ok(())),
        ];

        for (user, title, description, ending, expected) in cases {
            let result = GameBuilder::new(
                &user,
                title,
                description,
                ending,
                KindSpec::urban("Austin", "Texas", "USA"),
            )
            .map(|_| ());
            assert_eq!(result, expected, "title={title:.8} description={description:.8}");
        }
    }

    #[test]
    fn test_builder_counts_levels() {
        let builder = GameBuilder::new(
            &creator(),
            "t",
            "d",
            "e",
            KindSpec::urban("Austin", "Texas", "USA"),
        )
        .expect("Valid header");
        assert!(builder.is_empty());
        let builder = builder.level(level(1)).expect("Valid level");
        assert_eq!(builder.len(), 1);
    }
}

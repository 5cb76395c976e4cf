//! Levels of a hunt: the clue and answer sets a player works through.

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::{Field, ValidationError};
use super::limits::{
    MAX_ANSWER_LENGTH, MAX_CLUE_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, check_text,
};

/// One stage of a game.
///
/// Only constructed through [`LevelSpec::validate`] (or deserialized from
/// storage), so every level in a [`Game`](super::Game) has a title, a
/// description and at least one answer.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Level {
    title: String,
    description: String,
    clues: Vec<String>,
    answers: Vec<String>,
}

impl Level {
    /// Returns true if `input` is one of the accepted answers.
    ///
    /// Matching is exact: case-sensitive, no trimming.
    pub fn is_answer(&self, input: &str) -> bool {
        self.answers.iter().any(|answer| answer == input)
    }
}

/// Unvalidated level input as supplied by a game creator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct LevelSpec {
    /// Level title.
    pub title: String,
    /// Level description.
    pub description: String,
    /// Clues shown one by one on wrong answers. May be empty.
    #[serde(default)]
    pub clues: Vec<String>,
    /// Accepted answers.
    #[serde(default)]
    pub answers: Vec<String>,
}

impl LevelSpec {
    /// Validates the spec as the level at position `index`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in field order: title,
    /// description, clues, answers.
    #[instrument(skip(self), fields(title = %self.title))]
    pub fn validate(self, index: usize) -> Result<Level, ValidationError> {
        check_text(&self.title, Field::LevelTitle(index), MAX_TITLE_LENGTH)?;
        check_text(
            &self.description,
            Field::LevelDescription(index),
            MAX_DESCRIPTION_LENGTH,
        )?;

        for (i, clue) in self.clues.iter().enumerate() {
            check_text(clue, Field::Clue { level: index, index: i }, MAX_CLUE_LENGTH)?;
        }

        if self.answers.is_empty() {
            return Err(ValidationError::Missing(Field::Answers(index)));
        }
        for (i, answer) in self.answers.iter().enumerate() {
            check_text(answer, Field::Answer { level: index, index: i }, MAX_ANSWER_LENGTH)?;
        }

        Ok(Level {
            title: self.title,
            description: self.description,
            clues: self.clues,
            answers: self.answers,
        })
    }
}

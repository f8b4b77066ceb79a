//! Learner configuration read by the scheduler.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::RankOrder;
use crate::error::{LexisError, LexisResult};

const TARGET_WORDS_RANGE: RangeInclusive<u32> = 1..=10_000;
const DAILY_GOAL_RANGE: RangeInclusive<u32> = 1..=5_000;
const REQUIRED_CORRECT_RANGE: RangeInclusive<u32> = 1..=10;

/// Per-learner study settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearnerSettings {
    /// How many words the learner aims to know.
    pub target_words: u32,
    /// Walk the frequency ranking from the most common word.
    pub use_frequency_order: bool,
    /// Answers per day the learner aims for.
    pub daily_goal: u32,
    /// Mastery level at which a word stops being surfaced for review.
    pub required_correct_answers: u32,
    /// Show example sentences on cards.
    pub show_examples: bool,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            target_words: 5000,
            use_frequency_order: true,
            daily_goal: 50,
            required_correct_answers: 3,
            show_examples: true,
        }
    }
}

impl LearnerSettings {
    /// Direction in which the scheduler walks the frequency ranking.
    pub fn rank_order(&self) -> RankOrder {
        if self.use_frequency_order {
            RankOrder::Ascending
        } else {
            RankOrder::Descending
        }
    }

    /// Mastery threshold as a signed level.
    pub fn mastery_threshold(&self) -> i64 {
        i64::from(self.required_correct_answers)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> LexisResult<()> {
        check_range("targetWords", self.target_words, TARGET_WORDS_RANGE)?;
        check_range("dailyGoal", self.daily_goal, DAILY_GOAL_RANGE)?;
        check_range(
            "requiredCorrectAnswers",
            self.required_correct_answers,
            REQUIRED_CORRECT_RANGE,
        )
    }
}

/// Partial settings payload. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsUpdate {
    pub target_words: Option<u32>,
    pub use_frequency_order: Option<bool>,
    pub daily_goal: Option<u32>,
    pub required_correct_answers: Option<u32>,
    pub show_examples: Option<bool>,
}

impl SettingsUpdate {
    /// Whether the payload changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the fields that are present.
    pub fn validate(&self) -> LexisResult<()> {
        if let Some(v) = self.target_words {
            check_range("targetWords", v, TARGET_WORDS_RANGE)?;
        }
        if let Some(v) = self.daily_goal {
            check_range("dailyGoal", v, DAILY_GOAL_RANGE)?;
        }
        if let Some(v) = self.required_correct_answers {
            check_range("requiredCorrectAnswers", v, REQUIRED_CORRECT_RANGE)?;
        }
        Ok(())
    }

    /// Merge onto existing settings after validation.
    pub fn apply_to(&self, current: &LearnerSettings) -> LexisResult<LearnerSettings> {
        self.validate()?;

        Ok(LearnerSettings {
            target_words: self.target_words.unwrap_or(current.target_words),
            use_frequency_order: self.use_frequency_order.unwrap_or(current.use_frequency_order),
            daily_goal: self.daily_goal.unwrap_or(current.daily_goal),
            required_correct_answers: self
                .required_correct_answers
                .unwrap_or(current.required_correct_answers),
            show_examples: self.show_examples.unwrap_or(current.show_examples),
        })
    }
}

fn check_range(field: &str, value: u32, range: RangeInclusive<u32>) -> LexisResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(LexisError::out_of_range(
            field,
            format!(
                "{} must be between {} and {}, got {}",
                field,
                range.start(),
                range.end(),
                value
            ),
        ))
    }
}

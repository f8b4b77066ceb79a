//! Per-learner learning state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learning state of one word for one learner.
///
/// At most one record exists per (learner, word) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub learner_id: String,
    pub word_id: String,
    /// Accumulated correctness. Unbounded in both directions.
    pub mastery_level: i64,
    pub times_correct: u32,
    pub times_wrong: u32,
    pub last_seen: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

impl Progress {
    /// Build the record an upsert creates when no row exists yet.
    pub fn from_create(learner_id: impl Into<String>, word_id: impl Into<String>, create: &ProgressCreate) -> Self {
        Self {
            learner_id: learner_id.into(),
            word_id: word_id.into(),
            mastery_level: create.mastery_level,
            times_correct: create.times_correct,
            times_wrong: create.times_wrong,
            last_seen: create.last_seen,
            next_review: create.next_review,
        }
    }

    /// Apply the update half of an upsert to an existing record.
    pub fn apply(&mut self, delta: &ProgressDelta) {
        self.times_correct += delta.times_correct_increment;
        self.times_wrong += delta.times_wrong_increment;
        self.mastery_level += delta.mastery_delta;
        self.last_seen = Some(delta.last_seen);
        self.next_review = Some(delta.next_review);
    }
}

/// Fields written when a progress record is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressCreate {
    pub mastery_level: i64,
    pub times_correct: u32,
    pub times_wrong: u32,
    pub last_seen: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
}

impl ProgressCreate {
    /// State recorded the first time a word is presented to a learner.
    pub fn first_presentation(now: DateTime<Utc>) -> Self {
        Self {
            mastery_level: 0,
            times_correct: 0,
            times_wrong: 0,
            last_seen: None,
            next_review: Some(now),
        }
    }

    /// State recorded when the first thing seen for a word is an answer.
    pub fn first_answer(correct: bool, now: DateTime<Utc>, next_review: DateTime<Utc>) -> Self {
        Self {
            mastery_level: if correct { 1 } else { 0 },
            times_correct: if correct { 1 } else { 0 },
            times_wrong: if correct { 0 } else { 1 },
            last_seen: Some(now),
            next_review: Some(next_review),
        }
    }
}

/// Increments and overwrites applied when a progress record already exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDelta {
    pub times_correct_increment: u32,
    pub times_wrong_increment: u32,
    pub mastery_delta: i64,
    pub last_seen: DateTime<Utc>,
    pub next_review: DateTime<Utc>,
}

impl ProgressDelta {
    /// Update for a single answer. Incorrect answers lower mastery with no floor.
    pub fn for_answer(correct: bool, now: DateTime<Utc>, next_review: DateTime<Utc>) -> Self {
        Self {
            times_correct_increment: if correct { 1 } else { 0 },
            times_wrong_increment: if correct { 0 } else { 1 },
            mastery_delta: if correct { 1 } else { -1 },
            last_seen: now,
            next_review,
        }
    }
}

/// Summary of a learner's progress across the vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerStats {
    pub total_words: u64,
    pub words_seen: u64,
    /// Seen words whose mastery reached the threshold.
    pub words_mastered: u64,
    /// Seen words still below the threshold.
    pub words_learning: u64,
    pub target_words: u32,
    pub daily_goal: u32,
}

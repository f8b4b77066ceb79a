//! Review interval table.
//!
//! A correct answer pushes the next review further out the closer the word
//! is to mastery; an incorrect one brings it back within the hour.

use chrono::{DateTime, Duration, Utc};

/// Delay after an incorrect answer, regardless of mastery.
const INCORRECT_DELAY_HOURS: i64 = 1;

/// Upper bounds of the mastery ratio buckets and their delays in hours.
const CORRECT_BUCKETS: [(f64, i64); 3] = [(0.3, 4), (0.6, 8), (0.9, 24)];

/// Delay once the ratio reaches the last bucket bound.
const MASTERED_DELAY_HOURS: i64 = 72;

/// Delay until the next review.
///
/// `mastery_level` is the level before the current answer is applied. A
/// `required_correct_answers` of zero places every correct answer in the
/// longest bucket. Negative mastery always falls in the shortest one.
pub fn review_delay(mastery_level: i64, was_correct: bool, required_correct_answers: u32) -> Duration {
    if !was_correct {
        return Duration::hours(INCORRECT_DELAY_HOURS);
    }
    if required_correct_answers == 0 {
        return Duration::hours(MASTERED_DELAY_HOURS);
    }

    let ratio = mastery_level as f64 / f64::from(required_correct_answers);
    let hours = CORRECT_BUCKETS
        .iter()
        .find(|(bound, _)| ratio < *bound)
        .map(|(_, hours)| *hours)
        .unwrap_or(MASTERED_DELAY_HOURS);

    Duration::hours(hours)
}

/// Timestamp of the next review relative to `now`.
pub fn next_review_time(
    mastery_level: i64,
    was_correct: bool,
    required_correct_answers: u32,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    now + review_delay(mastery_level, was_correct, required_correct_answers)
}

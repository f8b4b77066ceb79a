//! Word store trait.
//!
//! The store owns words, progress and learner settings. The scheduler keeps
//! no state of its own and reaches all persistent data through this trait.

use async_trait::async_trait;

use crate::error::LexisResult;
use crate::types::{
    LearnerSettings, LearnerStats, Progress, ProgressCreate, ProgressDelta, RankOrder, Word,
};

/// Core WordStore trait - all storage backends implement this.
///
/// Ties in frequency rank are resolved by backend iteration order, which is
/// unspecified.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Word at the extreme of the frequency ranking.
    ///
    /// With `unseen_by` set, only words that learner has no progress record
    /// for are considered.
    async fn find_word_by_extreme(
        &self,
        order: RankOrder,
        unseen_by: Option<&str>,
    ) -> LexisResult<Option<Word>>;

    /// Word at the ranking extreme among those the learner has progress for
    /// with a mastery level strictly below `mastery_threshold`.
    async fn find_word_due_for_review(
        &self,
        learner_id: &str,
        mastery_threshold: i64,
        order: RankOrder,
    ) -> LexisResult<Option<Word>>;

    /// Look up a word by its source-language term.
    async fn get_word_by_key(&self, term: &str) -> LexisResult<Option<Word>>;

    /// Look up a word by id.
    async fn get_word(&self, id: &str) -> LexisResult<Option<Word>>;

    /// Up to `limit` words other than `exclude_term`, walked in `order`.
    async fn sample_other_words(
        &self,
        exclude_term: &str,
        limit: usize,
        order: RankOrder,
    ) -> LexisResult<Vec<Word>>;

    /// Progress record for a (learner, word) pair.
    async fn get_progress(&self, learner_id: &str, word_id: &str) -> LexisResult<Option<Progress>>;

    /// Atomically create the record from `create` when absent. Returns
    /// whether a record was created.
    async fn insert_progress_if_absent(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
    ) -> LexisResult<bool>;

    /// Atomically create the record from `create`, or apply `delta` to the
    /// existing one. Returns the stored record.
    async fn upsert_progress(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
        delta: ProgressDelta,
    ) -> LexisResult<Progress>;

    /// Settings saved for a learner.
    async fn get_settings(&self, learner_id: &str) -> LexisResult<Option<LearnerSettings>>;

    /// Create or replace a learner's settings.
    async fn put_settings(&self, learner_id: &str, settings: &LearnerSettings) -> LexisResult<()>;

    /// Insert words, skipping any whose term already exists. Returns the
    /// number inserted.
    async fn insert_words(&self, words: Vec<Word>) -> LexisResult<usize>;

    /// Remove every word together with all progress records.
    async fn clear_words(&self) -> LexisResult<()>;

    /// Number of words in the vocabulary.
    async fn count_words(&self) -> LexisResult<u64>;

    /// Progress summary for a learner against a mastery threshold.
    async fn learner_stats(&self, learner_id: &str, mastery_threshold: i64) -> LexisResult<LearnerStats>;
}

//! In-memory word store.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{LexisError, LexisResult};
use crate::traits::WordStore;
use crate::types::{
    LearnerSettings, LearnerStats, Progress, ProgressCreate, ProgressDelta, RankOrder, Word,
};

#[derive(Default)]
struct Tables {
    /// Insertion order doubles as the tie-break order.
    words: Vec<Word>,
    terms: HashSet<String>,
    ids: HashSet<String>,
    progress: HashMap<(String, String), Progress>,
    settings: HashMap<String, LearnerSettings>,
}

impl Tables {
    /// Add a word unless its id or term is already taken.
    fn insert_word(&mut self, word: Word) -> bool {
        if self.ids.contains(&word.id) || self.terms.contains(&word.term) {
            return false;
        }
        self.ids.insert(word.id.clone());
        self.terms.insert(word.term.clone());
        self.words.push(word);
        true
    }

    fn has_progress(&self, learner_id: &str, word_id: &str) -> bool {
        self.progress
            .contains_key(&(learner_id.to_string(), word_id.to_string()))
    }
}

/// Word store held entirely in process memory.
///
/// Each operation runs under a single lock acquisition, so the progress
/// primitives are atomic with respect to each other.
#[derive(Default)]
pub struct InMemoryWordStore {
    tables: RwLock<Tables>,
}

impl InMemoryWordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with words.
    pub fn with_words(words: Vec<Word>) -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            for word in words {
                tables.insert_word(word);
            }
        }
        store
    }

    fn read(&self) -> LexisResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| LexisError::lock_poisoned(e.to_string()))
    }

    fn write(&self) -> LexisResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| LexisError::lock_poisoned(e.to_string()))
    }
}

fn pick_extreme<'a>(
    candidates: impl Iterator<Item = &'a Word>,
    order: RankOrder,
) -> Option<&'a Word> {
    match order {
        RankOrder::Ascending => candidates.min_by_key(|w| w.frequency_rank),
        RankOrder::Descending => candidates.max_by_key(|w| w.frequency_rank),
    }
}

#[async_trait]
impl WordStore for InMemoryWordStore {
    async fn find_word_by_extreme(
        &self,
        order: RankOrder,
        unseen_by: Option<&str>,
    ) -> LexisResult<Option<Word>> {
        let tables = self.read()?;
        let candidates = tables.words.iter().filter(|w| match unseen_by {
            Some(learner_id) => !tables.has_progress(learner_id, &w.id),
            None => true,
        });

        Ok(pick_extreme(candidates, order).cloned())
    }

    async fn find_word_due_for_review(
        &self,
        learner_id: &str,
        mastery_threshold: i64,
        order: RankOrder,
    ) -> LexisResult<Option<Word>> {
        let tables = self.read()?;
        let candidates = tables.words.iter().filter(|w| {
            tables
                .progress
                .get(&(learner_id.to_string(), w.id.clone()))
                .is_some_and(|p| p.mastery_level < mastery_threshold)
        });

        Ok(pick_extreme(candidates, order).cloned())
    }

    async fn get_word_by_key(&self, term: &str) -> LexisResult<Option<Word>> {
        let tables = self.read()?;
        Ok(tables.words.iter().find(|w| w.term == term).cloned())
    }

    async fn get_word(&self, id: &str) -> LexisResult<Option<Word>> {
        let tables = self.read()?;
        Ok(tables.words.iter().find(|w| w.id == id).cloned())
    }

    async fn sample_other_words(
        &self,
        exclude_term: &str,
        limit: usize,
        order: RankOrder,
    ) -> LexisResult<Vec<Word>> {
        let tables = self.read()?;
        let mut others: Vec<&Word> = tables
            .words
            .iter()
            .filter(|w| w.term != exclude_term)
            .collect();

        others.sort_by_key(|w| w.frequency_rank);
        if order == RankOrder::Descending {
            others.reverse();
        }

        Ok(others.into_iter().take(limit).cloned().collect())
    }

    async fn get_progress(&self, learner_id: &str, word_id: &str) -> LexisResult<Option<Progress>> {
        let tables = self.read()?;
        Ok(tables
            .progress
            .get(&(learner_id.to_string(), word_id.to_string()))
            .cloned())
    }

    async fn insert_progress_if_absent(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
    ) -> LexisResult<bool> {
        let mut tables = self.write()?;
        let key = (learner_id.to_string(), word_id.to_string());
        if tables.progress.contains_key(&key) {
            return Ok(false);
        }

        tables
            .progress
            .insert(key, Progress::from_create(learner_id, word_id, &create));
        Ok(true)
    }

    async fn upsert_progress(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
        delta: ProgressDelta,
    ) -> LexisResult<Progress> {
        let mut tables = self.write()?;
        let record = tables
            .progress
            .entry((learner_id.to_string(), word_id.to_string()))
            .and_modify(|p| p.apply(&delta))
            .or_insert_with(|| Progress::from_create(learner_id, word_id, &create));

        Ok(record.clone())
    }

    async fn get_settings(&self, learner_id: &str) -> LexisResult<Option<LearnerSettings>> {
        let tables = self.read()?;
        Ok(tables.settings.get(learner_id).cloned())
    }

    async fn put_settings(&self, learner_id: &str, settings: &LearnerSettings) -> LexisResult<()> {
        let mut tables = self.write()?;
        tables
            .settings
            .insert(learner_id.to_string(), settings.clone());
        Ok(())
    }

    async fn insert_words(&self, words: Vec<Word>) -> LexisResult<usize> {
        let mut tables = self.write()?;
        let mut inserted = 0;
        for word in words {
            if tables.insert_word(word) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn clear_words(&self) -> LexisResult<()> {
        let mut tables = self.write()?;
        tables.progress.clear();
        tables.words.clear();
        tables.terms.clear();
        tables.ids.clear();
        Ok(())
    }

    async fn count_words(&self) -> LexisResult<u64> {
        let tables = self.read()?;
        Ok(tables.words.len() as u64)
    }

    async fn learner_stats(&self, learner_id: &str, mastery_threshold: i64) -> LexisResult<LearnerStats> {
        let tables = self.read()?;
        let mut stats = LearnerStats {
            total_words: tables.words.len() as u64,
            ..Default::default()
        };

        for ((learner, _), progress) in tables.progress.iter() {
            if learner != learner_id {
                continue;
            }
            stats.words_seen += 1;
            if progress.mastery_level >= mastery_threshold {
                stats.words_mastered += 1;
            } else {
                stats.words_learning += 1;
            }
        }

        Ok(stats)
    }
}

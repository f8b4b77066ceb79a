//! SQLite-backed word store.
//!
//! Words, progress and learner settings live in three tables. Both progress
//! primitives are single `INSERT ... ON CONFLICT` statements executed under
//! the connection lock, so concurrent presentations of one word cannot create
//! two rows.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::{LexisError, LexisResult};
use crate::traits::WordStore;
use crate::types::{
    Example, LearnerSettings, LearnerStats, Progress, ProgressCreate, ProgressDelta, RankOrder,
    Word,
};

const WORD_COLUMNS: &str =
    "w.id, w.term, w.translations, w.frequency_rank, w.part_of_speech, w.distractors, w.examples";

/// Raw word row before JSON columns are decoded.
struct WordRow {
    id: String,
    term: String,
    translations: String,
    frequency_rank: i64,
    part_of_speech: String,
    distractors: Option<String>,
    examples: String,
}

impl WordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            term: row.get(1)?,
            translations: row.get(2)?,
            frequency_rank: row.get(3)?,
            part_of_speech: row.get(4)?,
            distractors: row.get(5)?,
            examples: row.get(6)?,
        })
    }

    fn into_word(self) -> LexisResult<Word> {
        let translations: Vec<String> = serde_json::from_str(&self.translations).map_err(|e| {
            LexisError::corrupt_record(format!("translations of word '{}': {}", self.term, e))
        })?;
        let distractors = self
            .distractors
            .map(|raw| serde_json::from_str::<Vec<Vec<String>>>(&raw))
            .transpose()
            .map_err(|e| {
                LexisError::corrupt_record(format!("distractors of word '{}': {}", self.term, e))
            })?;
        let examples: Vec<Example> = serde_json::from_str(&self.examples).map_err(|e| {
            LexisError::corrupt_record(format!("examples of word '{}': {}", self.term, e))
        })?;

        Ok(Word {
            id: self.id,
            term: self.term,
            translations,
            frequency_rank: self.frequency_rank,
            part_of_speech: self.part_of_speech,
            distractors,
            examples,
        })
    }
}

/// Raw progress row before timestamps are parsed.
struct ProgressRow {
    learner_id: String,
    word_id: String,
    mastery_level: i64,
    times_correct: u32,
    times_wrong: u32,
    last_seen: Option<String>,
    next_review: Option<String>,
}

impl ProgressRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            learner_id: row.get(0)?,
            word_id: row.get(1)?,
            mastery_level: row.get(2)?,
            times_correct: row.get(3)?,
            times_wrong: row.get(4)?,
            last_seen: row.get(5)?,
            next_review: row.get(6)?,
        })
    }

    fn into_progress(self) -> LexisResult<Progress> {
        let last_seen = self.parse_timestamp("last_seen", self.last_seen.as_deref())?;
        let next_review = self.parse_timestamp("next_review", self.next_review.as_deref())?;

        Ok(Progress {
            learner_id: self.learner_id,
            word_id: self.word_id,
            mastery_level: self.mastery_level,
            times_correct: self.times_correct,
            times_wrong: self.times_wrong,
            last_seen,
            next_review,
        })
    }

    fn parse_timestamp(
        &self,
        column: &str,
        value: Option<&str>,
    ) -> LexisResult<Option<DateTime<Utc>>> {
        value
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        LexisError::corrupt_record(format!(
                            "{} of progress ({}, {}): {}",
                            column, self.learner_id, self.word_id, e
                        ))
                    })
            })
            .transpose()
    }
}

/// SQLite-backed store for words, progress and learner settings.
pub struct SqliteWordStore {
    conn: Mutex<Connection>,
}

impl SqliteWordStore {
    /// Open (or create) a store at the given database path.
    pub fn new<P: AsRef<Path>>(path: P) -> LexisResult<Self> {
        debug!(path = %path.as_ref().display(), "Opening SQLite word store");
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> LexisResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> LexisResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| LexisError::lock_poisoned(e.to_string()))
    }

    fn init_schema(&self) -> LexisResult<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS words (
                id TEXT PRIMARY KEY,
                term TEXT NOT NULL UNIQUE,
                translations TEXT NOT NULL,
                frequency_rank INTEGER NOT NULL,
                part_of_speech TEXT NOT NULL,
                distractors TEXT,
                examples TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_words_frequency_rank ON words(frequency_rank);

            CREATE TABLE IF NOT EXISTS progress (
                learner_id TEXT NOT NULL,
                word_id TEXT NOT NULL,
                mastery_level INTEGER NOT NULL DEFAULT 0,
                times_correct INTEGER NOT NULL DEFAULT 0,
                times_wrong INTEGER NOT NULL DEFAULT 0,
                last_seen TEXT,
                next_review TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (learner_id, word_id)
            );

            CREATE INDEX IF NOT EXISTS idx_progress_learner_mastery
                ON progress(learner_id, mastery_level);

            CREATE TABLE IF NOT EXISTS learner_settings (
                learner_id TEXT PRIMARY KEY,
                target_words INTEGER NOT NULL,
                use_frequency_order INTEGER NOT NULL,
                daily_goal INTEGER NOT NULL,
                required_correct_answers INTEGER NOT NULL,
                show_examples INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    fn query_one_word(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> LexisResult<Option<Word>> {
        conn.query_row(sql, params, WordRow::from_row)
            .optional()?
            .map(WordRow::into_word)
            .transpose()
    }

    fn select_progress(
        conn: &Connection,
        learner_id: &str,
        word_id: &str,
    ) -> LexisResult<Option<Progress>> {
        conn.query_row(
            "SELECT learner_id, word_id, mastery_level, times_correct, times_wrong, last_seen, next_review
             FROM progress WHERE learner_id = ?1 AND word_id = ?2",
            params![learner_id, word_id],
            ProgressRow::from_row,
        )
        .optional()?
        .map(ProgressRow::into_progress)
        .transpose()
    }
}

#[async_trait]
impl WordStore for SqliteWordStore {
    async fn find_word_by_extreme(
        &self,
        order: RankOrder,
        unseen_by: Option<&str>,
    ) -> LexisResult<Option<Word>> {
        let conn = self.lock()?;

        match unseen_by {
            Some(learner_id) => {
                let sql = format!(
                    "SELECT {} FROM words w
                     WHERE NOT EXISTS (
                         SELECT 1 FROM progress p WHERE p.word_id = w.id AND p.learner_id = ?1
                     )
                     ORDER BY w.frequency_rank {} LIMIT 1",
                    WORD_COLUMNS,
                    order.sql_keyword()
                );
                Self::query_one_word(&conn, &sql, params![learner_id])
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM words w ORDER BY w.frequency_rank {} LIMIT 1",
                    WORD_COLUMNS,
                    order.sql_keyword()
                );
                Self::query_one_word(&conn, &sql, params![])
            }
        }
    }

    async fn find_word_due_for_review(
        &self,
        learner_id: &str,
        mastery_threshold: i64,
        order: RankOrder,
    ) -> LexisResult<Option<Word>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM words w
             JOIN progress p ON p.word_id = w.id
             WHERE p.learner_id = ?1 AND p.mastery_level < ?2
             ORDER BY w.frequency_rank {} LIMIT 1",
            WORD_COLUMNS,
            order.sql_keyword()
        );
        Self::query_one_word(&conn, &sql, params![learner_id, mastery_threshold])
    }

    async fn get_word_by_key(&self, term: &str) -> LexisResult<Option<Word>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM words w WHERE w.term = ?1", WORD_COLUMNS);
        Self::query_one_word(&conn, &sql, params![term])
    }

    async fn get_word(&self, id: &str) -> LexisResult<Option<Word>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM words w WHERE w.id = ?1", WORD_COLUMNS);
        Self::query_one_word(&conn, &sql, params![id])
    }

    async fn sample_other_words(
        &self,
        exclude_term: &str,
        limit: usize,
        order: RankOrder,
    ) -> LexisResult<Vec<Word>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM words w WHERE w.term != ?1
             ORDER BY w.frequency_rank {} LIMIT ?2",
            WORD_COLUMNS,
            order.sql_keyword()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![exclude_term, limit as i64], WordRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(WordRow::into_word).collect()
    }

    async fn get_progress(&self, learner_id: &str, word_id: &str) -> LexisResult<Option<Progress>> {
        let conn = self.lock()?;
        Self::select_progress(&conn, learner_id, word_id)
    }

    async fn insert_progress_if_absent(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
    ) -> LexisResult<bool> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        let inserted = conn.execute(
            "INSERT INTO progress
             (learner_id, word_id, mastery_level, times_correct, times_wrong, last_seen, next_review, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(learner_id, word_id) DO NOTHING",
            params![
                learner_id,
                word_id,
                create.mastery_level,
                create.times_correct,
                create.times_wrong,
                create.last_seen.map(|dt| dt.to_rfc3339()),
                create.next_review.map(|dt| dt.to_rfc3339()),
                now,
            ],
        )?;

        Ok(inserted > 0)
    }

    async fn upsert_progress(
        &self,
        learner_id: &str,
        word_id: &str,
        create: ProgressCreate,
        delta: ProgressDelta,
    ) -> LexisResult<Progress> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO progress
             (learner_id, word_id, mastery_level, times_correct, times_wrong, last_seen, next_review, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
             ON CONFLICT(learner_id, word_id) DO UPDATE SET
                 times_correct = times_correct + ?9,
                 times_wrong = times_wrong + ?10,
                 mastery_level = mastery_level + ?11,
                 last_seen = ?12,
                 next_review = ?13,
                 updated_at = ?8",
            params![
                learner_id,
                word_id,
                create.mastery_level,
                create.times_correct,
                create.times_wrong,
                create.last_seen.map(|dt| dt.to_rfc3339()),
                create.next_review.map(|dt| dt.to_rfc3339()),
                now,
                delta.times_correct_increment,
                delta.times_wrong_increment,
                delta.mastery_delta,
                delta.last_seen.to_rfc3339(),
                delta.next_review.to_rfc3339(),
            ],
        )?;

        Self::select_progress(&conn, learner_id, word_id)?.ok_or_else(|| {
            LexisError::store(format!(
                "progress for learner '{}' and word '{}' missing after upsert",
                learner_id, word_id
            ))
        })
    }

    async fn get_settings(&self, learner_id: &str) -> LexisResult<Option<LearnerSettings>> {
        let conn = self.lock()?;
        let settings = conn
            .query_row(
                "SELECT target_words, use_frequency_order, daily_goal, required_correct_answers, show_examples
                 FROM learner_settings WHERE learner_id = ?1",
                params![learner_id],
                |row| {
                    Ok(LearnerSettings {
                        target_words: row.get(0)?,
                        use_frequency_order: row.get::<_, i32>(1)? != 0,
                        daily_goal: row.get(2)?,
                        required_correct_answers: row.get(3)?,
                        show_examples: row.get::<_, i32>(4)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    async fn put_settings(&self, learner_id: &str, settings: &LearnerSettings) -> LexisResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO learner_settings
             (learner_id, target_words, use_frequency_order, daily_goal, required_correct_answers, show_examples, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                learner_id,
                settings.target_words,
                if settings.use_frequency_order { 1 } else { 0 },
                settings.daily_goal,
                settings.required_correct_answers,
                if settings.show_examples { 1 } else { 0 },
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn insert_words(&self, words: Vec<Word>) -> LexisResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO words
                 (id, term, translations, frequency_rank, part_of_speech, distractors, examples, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT DO NOTHING",
            )?;

            for word in &words {
                let translations = serde_json::to_string(&word.translations)?;
                let distractors = word
                    .distractors
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?;
                let examples = serde_json::to_string(&word.examples)?;

                inserted += stmt.execute(params![
                    word.id,
                    word.term,
                    translations,
                    word.frequency_rank,
                    word.part_of_speech,
                    distractors,
                    examples,
                    now,
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    async fn clear_words(&self) -> LexisResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("DELETE FROM progress; DELETE FROM words;")?;
        Ok(())
    }

    async fn count_words(&self) -> LexisResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn learner_stats(&self, learner_id: &str, mastery_threshold: i64) -> LexisResult<LearnerStats> {
        let conn = self.lock()?;

        let total_words: i64 = conn.query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        let (seen, mastered): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN mastery_level >= ?2 THEN 1 ELSE 0 END), 0)
             FROM progress WHERE learner_id = ?1",
            params![learner_id, mastery_threshold],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(LearnerStats {
            total_words: total_words as u64,
            words_seen: seen as u64,
            words_mastered: mastered as u64,
            words_learning: (seen - mastered) as u64,
            ..Default::default()
        })
    }
}

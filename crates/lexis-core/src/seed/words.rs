//! Seeding from a JSON word list.
//!
//! The file is a JSON array of entries. Field names follow the vocabulary
//! export format (`frenchWord`, `englishTranslations`, ...) and the neutral
//! names used by [`Word`] are accepted too.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::SeedConfig;
use crate::error::{LexisError, LexisResult};
use crate::traits::WordStore;
use crate::types::{Example, Word};

/// Part-of-speech field, either a single tag or a list of tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PartOfSpeech {
    One(String),
    Many(Vec<String>),
}

impl PartOfSpeech {
    /// The primary tag, `"unknown"` for an empty list.
    pub fn primary(&self) -> String {
        match self {
            PartOfSpeech::One(tag) if !tag.is_empty() => tag.clone(),
            PartOfSpeech::Many(tags) if !tags.is_empty() => tags[0].clone(),
            _ => "unknown".to_string(),
        }
    }
}

/// One entry of the word list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedWord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "frenchWord")]
    pub term: String,
    #[serde(alias = "englishTranslations")]
    pub translations: Vec<String>,
    #[serde(default)]
    pub part_of_speech: Option<PartOfSpeech>,
    pub frequency_rank: i64,
    #[serde(default)]
    pub distractors: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub examples: Option<Vec<Example>>,
}

impl SeedWord {
    /// Convert into a stored word, assigning an id when none is given.
    pub fn into_word(self) -> LexisResult<Word> {
        if self.term.trim().is_empty() {
            return Err(LexisError::missing_field("term"));
        }
        if self.translations.is_empty() {
            return Err(LexisError::invalid_input(format!(
                "word '{}' has no translations",
                self.term
            )));
        }

        Ok(Word {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            term: self.term,
            translations: self.translations,
            frequency_rank: self.frequency_rank,
            part_of_speech: self
                .part_of_speech
                .map(|p| p.primary())
                .unwrap_or_else(|| "unknown".to_string()),
            distractors: self.distractors,
            examples: self.examples.unwrap_or_default(),
        })
    }
}

/// Statistics from a seeding run.
#[derive(Debug, Default, Clone)]
pub struct SeedStats {
    /// Entries read from the input.
    pub total: u64,
    /// Words written to the store.
    pub inserted: u64,
    /// Entries whose term already existed in the store.
    pub skipped: u64,
    /// Terms that appeared more than once in the input.
    pub duplicates: BTreeSet<String>,
    /// Error messages for entries or batches that failed.
    pub errors: Vec<String>,
}

impl SeedStats {
    /// Check if the run completed without errors.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load words into the store.
///
/// The first occurrence of a term wins; later ones are reported as
/// duplicates. A failing entry or batch is recorded and the run continues.
pub async fn seed_words(
    store: &dyn WordStore,
    entries: Vec<SeedWord>,
    config: &SeedConfig,
) -> LexisResult<SeedStats> {
    let mut stats = SeedStats {
        total: entries.len() as u64,
        ..Default::default()
    };

    if config.clean_first {
        info!("Cleaning existing words and progress");
        store.clear_words().await?;
    }

    let mut seen = HashSet::new();
    let mut words = Vec::with_capacity(entries.len());
    for entry in entries {
        if !seen.insert(entry.term.clone()) {
            stats.duplicates.insert(entry.term);
            continue;
        }
        let term = entry.term.clone();
        match entry.into_word() {
            Ok(word) => words.push(word),
            Err(e) => stats.errors.push(format!("Word '{}': {}", term, e)),
        }
    }

    let batch_size = config.batch_size.max(1);
    let total_batches = words.len().div_ceil(batch_size);
    info!(words = words.len(), total_batches, "Starting to seed words");

    for (index, batch) in words.chunks(batch_size).enumerate() {
        let current = index + 1;
        info!(
            "Processing batch {} of {} ({}%)",
            current,
            total_batches,
            current * 100 / total_batches
        );

        match store.insert_words(batch.to_vec()).await {
            Ok(count) => {
                stats.inserted += count as u64;
                stats.skipped += (batch.len() - count) as u64;
            }
            Err(e) => stats
                .errors
                .push(format!("Batch {} failed: {}", current, e)),
        }
    }

    if !stats.duplicates.is_empty() {
        warn!(
            count = stats.duplicates.len(),
            terms = ?stats.duplicates,
            "Skipped duplicate words"
        );
    }
    info!(inserted = stats.inserted, skipped = stats.skipped, "Seeding finished");

    Ok(stats)
}

/// Read a JSON word list from disk and seed it.
pub async fn seed_from_file(
    store: &dyn WordStore,
    path: impl AsRef<Path>,
    config: &SeedConfig,
) -> LexisResult<SeedStats> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let entries: Vec<SeedWord> = serde_json::from_str(&content)?;
    seed_words(store, entries, config).await
}

//! Vocabulary entries.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Separator used when several translations are shown as one option.
pub const OPTION_SEPARATOR: &str = " / ";

/// Direction in which the frequency ranking is walked.
///
/// Lower ranks are more common words, so `Ascending` surfaces the most
/// frequent vocabulary first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RankOrder {
    #[default]
    Ascending,
    Descending,
}

impl RankOrder {
    /// SQL keyword for an `ORDER BY` clause.
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            RankOrder::Ascending => "ASC",
            RankOrder::Descending => "DESC",
        }
    }

    /// Map a coin flip to a direction.
    pub fn from_coin(heads: bool) -> Self {
        if heads {
            RankOrder::Ascending
        } else {
            RankOrder::Descending
        }
    }
}

/// Example sentence attached to a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    /// Sentence in the source language.
    #[serde(alias = "frenchSentence")]
    pub source_sentence: String,
    /// Its translation.
    #[serde(alias = "englishTranslation")]
    pub translation: String,
}

/// An immutable vocabulary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    /// Unique identifier.
    pub id: String,
    /// Source-language term, unique across the vocabulary.
    pub term: String,
    /// Target-language translations, never empty.
    pub translations: Vec<String>,
    /// Frequency rank (lower = more common).
    pub frequency_rank: i64,
    /// Part-of-speech tag.
    pub part_of_speech: String,
    /// Precomputed decoy translation groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distractors: Option<Vec<Vec<String>>>,
    /// Example sentences.
    #[serde(default)]
    pub examples: Vec<Example>,
}

impl Word {
    /// Create a word with a fresh UUID and no distractors or examples.
    pub fn new(
        term: impl Into<String>,
        translations: Vec<String>,
        frequency_rank: i64,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            term: term.into(),
            translations,
            frequency_rank,
            part_of_speech: part_of_speech.into(),
            distractors: None,
            examples: Vec::new(),
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the distractor groups.
    pub fn with_distractors(mut self, distractors: Vec<Vec<String>>) -> Self {
        self.distractors = Some(distractors);
        self
    }

    /// Add an example sentence.
    pub fn with_example(mut self, source_sentence: impl Into<String>, translation: impl Into<String>) -> Self {
        self.examples.push(Example {
            source_sentence: source_sentence.into(),
            translation: translation.into(),
        });
        self
    }

    /// Translations joined into a single option string.
    pub fn joined_translations(&self) -> String {
        self.translations.join(OPTION_SEPARATOR)
    }

    /// Stored distractor groups, if any are present.
    pub fn distractor_groups(&self) -> Option<&[Vec<String>]> {
        self.distractors
            .as_deref()
            .filter(|groups| !groups.is_empty())
    }
}

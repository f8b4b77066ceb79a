//! lexis-core - Core library for lexis.
//!
//! This crate provides the word scheduler, its storage trait and backends,
//! and the vocabulary seeding importer for the lexis flashcard service.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lexis_core::{LexisConfig, Scheduler, create_store};
//!
//! let config = LexisConfig::from_env();
//! let scheduler = Scheduler::new(create_store(&config)?);
//!
//! let settings = scheduler
//!     .settings_for_selection(Some("learner-1"), &config.default_settings)
//!     .await?;
//! let word = scheduler.select_next_word(Some("learner-1"), &settings).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod random;
pub mod scheduler;
pub mod seed;
pub mod store;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{LexisConfig, SeedConfig};
pub use error::{ErrorCode, LexisError, LexisResult};
pub use events::{EventBus, EventSubscriber, StudyEvent};
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use scheduler::{next_review_time, review_delay, Scheduler};
pub use seed::{seed_from_file, seed_words, SeedStats, SeedWord};
pub use store::{create_store, InMemoryWordStore, SqliteWordStore};
pub use traits::WordStore;
pub use types::{
    Example, LearnerSettings, LearnerStats, Progress, ProgressCreate, ProgressDelta, RankOrder,
    SettingsUpdate, Word, OPTION_SEPARATOR,
};

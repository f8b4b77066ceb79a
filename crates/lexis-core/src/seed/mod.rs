//! One-time vocabulary bulk load.
//!
//! # Example
//!
//! ```ignore
//! use lexis_core::seed::seed_from_file;
//!
//! let stats = seed_from_file(store.as_ref(), "words.json", &config.seed).await?;
//! println!("Inserted {}/{}", stats.inserted, stats.total);
//! ```

mod words;

pub use words::{seed_from_file, seed_words, PartOfSpeech, SeedStats, SeedWord};

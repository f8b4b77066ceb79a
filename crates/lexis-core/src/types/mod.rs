//! Core types for lexis.

mod progress;
mod settings;
mod word;

pub use progress::{LearnerStats, Progress, ProgressCreate, ProgressDelta};
pub use settings::{LearnerSettings, SettingsUpdate};
pub use word::{Example, RankOrder, Word, OPTION_SEPARATOR};

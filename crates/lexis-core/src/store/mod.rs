//! Word store backends.

mod memory;
mod sqlite;

use std::sync::Arc;

use tracing::debug;

pub use memory::InMemoryWordStore;
pub use sqlite::SqliteWordStore;

use crate::config::LexisConfig;
use crate::error::LexisResult;
use crate::traits::WordStore;

/// Create the store described by the configuration.
///
/// A configured database path selects SQLite; otherwise words live in memory
/// for the lifetime of the process.
pub fn create_store(config: &LexisConfig) -> LexisResult<Arc<dyn WordStore>> {
    match config.database_path {
        Some(ref path) => Ok(Arc::new(SqliteWordStore::new(path)?)),
        None => {
            debug!("Creating in-memory word store");
            Ok(Arc::new(InMemoryWordStore::new()))
        }
    }
}

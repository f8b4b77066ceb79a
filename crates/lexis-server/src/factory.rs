//! Building the scheduler from configuration.

use std::path::Path;
use std::sync::Arc;

use lexis_core::{
    create_store, seed_from_file, EventBus, LexisConfig, LexisResult, Scheduler, SeedConfig,
    SeedStats, WordStore,
};
use tracing::{debug, info, warn};

/// Open the configured store, creating the database directory if needed.
pub fn open_store(config: &LexisConfig) -> LexisResult<Arc<dyn WordStore>> {
    if let Some(parent) = config.database_path.as_ref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let store = create_store(config)?;
    match config.database_path {
        Some(ref path) => info!(path = %path.display(), "Using SQLite word store"),
        None => info!("Using in-memory word store"),
    }

    Ok(store)
}

/// Create a scheduler over the configured store, announcing on `events`.
pub fn create_scheduler(config: &LexisConfig, events: EventBus) -> LexisResult<Scheduler> {
    let store = open_store(config)?;
    Ok(Scheduler::new(store).with_events(events))
}

/// Load a word list into a running store without touching existing data.
///
/// Words already present are skipped and learner progress is kept, whatever
/// `clean_first` says. Wiping the store is left to `lexis-seed`.
pub async fn seed_on_startup(
    store: &dyn WordStore,
    path: impl AsRef<Path>,
    config: &SeedConfig,
) -> LexisResult<SeedStats> {
    let path = path.as_ref();
    let config = SeedConfig {
        clean_first: false,
        ..config.clone()
    };

    let stats = seed_from_file(store, path, &config).await?;
    info!(
        file = %path.display(),
        total = stats.total,
        inserted = stats.inserted,
        skipped = stats.skipped,
        "Seeded vocabulary"
    );
    for err in &stats.errors {
        warn!(error = %err, "Seeding error");
    }

    Ok(stats)
}

/// Log every study event until the bus closes.
pub fn spawn_event_logger(events: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut subscriber = events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscriber.recv().await {
            debug!(
                event = event.name(),
                learner_id = event.learner_id(),
                "Study event"
            );
        }
    })
}

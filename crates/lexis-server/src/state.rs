//! Server state management.

use std::sync::Arc;

use lexis_core::{EventBus, LexisConfig, LexisResult, Scheduler};

use crate::factory::create_scheduler;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler>,
    pub config: Arc<LexisConfig>,
    pub events: EventBus,
    /// Key expected by the auth middleware. `None` lets every request through.
    pub api_key: Option<String>,
}

impl AppState {
    /// Create state around an existing scheduler.
    pub fn new(scheduler: Scheduler, config: LexisConfig, events: EventBus) -> Self {
        Self {
            scheduler: Arc::new(scheduler),
            config: Arc::new(config),
            events,
            api_key: None,
        }
    }

    /// Open the configured store and build a scheduler over it.
    pub fn from_config(config: LexisConfig) -> LexisResult<Self> {
        let events = EventBus::new();
        let scheduler = create_scheduler(&config, events.clone())?;
        Ok(Self::new(scheduler, config, events))
    }

    /// Require this key on every request served with auth.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

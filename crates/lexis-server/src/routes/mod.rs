//! Route definitions for the REST API.

mod health;
mod settings;
mod study;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Study session
        .route("/study/next", get(study::next_word))
        .route("/study/words/:term/options", get(study::word_options))
        .route("/study/answers", post(study::submit_answer))
        .route("/study/stats", get(study::learner_stats))
        // Learner settings
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .with_state(state)
}

pub use health::*;
pub use settings::*;
pub use study::*;

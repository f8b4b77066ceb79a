//! Learner settings endpoints.

use axum::{extract::State, Json};
use lexis_core::{LearnerSettings, SettingsUpdate};

use crate::error::{ApiError, ApiResult};
use crate::extract::Learner;
use crate::state::AppState;

/// Get the learner's settings, or the defaults if none are saved.
/// GET /settings
pub async fn get_settings(
    State(state): State<AppState>,
    learner: Learner,
) -> ApiResult<Json<LearnerSettings>> {
    let learner_id = learner.require()?;
    let settings = state
        .scheduler
        .settings_for_selection(Some(learner_id), &state.config.default_settings)
        .await?;

    Ok(Json(settings))
}

/// Update some or all of the learner's settings.
/// PUT /settings
pub async fn update_settings(
    State(state): State<AppState>,
    learner: Learner,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<LearnerSettings>> {
    let learner_id = learner.require()?;
    if update.is_empty() {
        return Err(ApiError::validation("No settings given"));
    }

    let settings = state
        .scheduler
        .update_settings(learner_id, &update, &state.config.default_settings)
        .await?;

    Ok(Json(settings))
}

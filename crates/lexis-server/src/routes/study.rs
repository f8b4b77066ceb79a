//! Study session endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lexis_core::{LearnerStats, Word};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extract::Learner;
use crate::state::AppState;

/// Response for the next word.
#[derive(Debug, Serialize)]
pub struct NextWordResponse {
    /// `null` when there is nothing to study.
    pub word: Option<Word>,
}

/// Get the next word to study.
/// GET /study/next
pub async fn next_word(
    State(state): State<AppState>,
    learner: Learner,
) -> ApiResult<Json<NextWordResponse>> {
    let settings = state
        .scheduler
        .settings_for_selection(learner.id(), &state.config.default_settings)
        .await?;
    let word = state
        .scheduler
        .select_next_word(learner.id(), &settings)
        .await?;

    Ok(Json(NextWordResponse { word }))
}

/// Query parameters for answer options.
#[derive(Debug, Default, Deserialize)]
pub struct OptionsQuery {
    pub count: Option<usize>,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub term: String,
    pub options: Vec<String>,
}

/// Get answer options for a word.
/// GET /study/words/:term/options
pub async fn word_options(
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(query): Query<OptionsQuery>,
) -> ApiResult<Json<OptionsResponse>> {
    let count = query.count.unwrap_or(state.config.option_count);
    let mut options = state.scheduler.generate_options(&term, count).await?;
    if query.shuffle {
        state.scheduler.shuffle_options(&mut options);
    }

    Ok(Json(OptionsResponse { term, options }))
}

/// Request body for an answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub word_id: String,
    pub correct: bool,
}

/// Record an answer. Anonymous answers are accepted and dropped.
/// POST /study/answers
pub async fn submit_answer(
    State(state): State<AppState>,
    learner: Learner,
    Json(request): Json<AnswerRequest>,
) -> ApiResult<StatusCode> {
    state
        .scheduler
        .submit_answer(learner.id(), &request.word_id, request.correct)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get progress statistics for the learner.
/// GET /study/stats
pub async fn learner_stats(
    State(state): State<AppState>,
    learner: Learner,
) -> ApiResult<Json<LearnerStats>> {
    let learner_id = learner.require()?;
    let stats = state
        .scheduler
        .learner_stats(learner_id, &state.config.default_settings)
        .await?;

    Ok(Json(stats))
}

//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::domain::{TestConfig, MAX_QUESTIONS, MIN_QUESTIONS};
use crate::error::ApiError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, generator: state.openai.is_some() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(PanelConfigOut {
    topics: state.config.topics.clone(),
    defaults: state.config.default_test_config(),
    min_count: MIN_QUESTIONS,
    max_count: MAX_QUESTIONS,
  })
}

#[instrument(level = "info", skip(state, body), fields(count = body.count, topics = body.topics.len()))]
pub async fn http_post_test(
  State(state): State<Arc<AppState>>,
  Json(body): Json<TestConfig>,
) -> Result<Json<SessionView>, ApiError> {
  let view = logic::generate_test(&state, body).await?;
  info!(target: "exam", id = %view.id, questions = view.questions.len(), "HTTP test generated");
  Ok(Json(view))
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_sample(State(state): State<Arc<AppState>>) -> Json<SessionView> {
  Json(logic::open_sample(&state).await)
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  Ok(Json(logic::get_session(&state, &id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id, question_id = %body.question_id, value_len = body.value.len()))]
pub async fn http_put_answer(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<SessionView>, ApiError> {
  Ok(Json(logic::set_answer(&state, &id, &body.question_id, body.value).await?))
}

#[instrument(level = "info", skip(state, body), fields(%id, show = body.show))]
pub async fn http_post_reveal(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(body): Json<RevealIn>,
) -> Result<Json<SessionView>, ApiError> {
  Ok(Json(logic::reveal(&state, &id, body.show).await?))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_submit(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<GradeReport>, ApiError> {
  let report = logic::submit(&state, &id).await?;
  info!(target: "exam", %id, score = %report.score_display, rank = report.feedback.rank_label, "HTTP submit graded");
  Ok(Json(report))
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_post_retry(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  Ok(Json(logic::retry(&state, &id).await?))
}

#[instrument(level = "info", skip(body))]
pub async fn http_post_grade(Json(body): Json<GradeIn>) -> Result<Json<GradeReport>, ApiError> {
  Ok(Json(logic::grade_stateless(&body)?))
}

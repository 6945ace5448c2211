//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Acquiring a test (generator or built-in sample) and opening a session
//!   - Recording answers, revealing keys, submitting and retrying
//!   - Stateless grading of a caller-supplied test

use tracing::{info, instrument};

use crate::domain::TestConfig;
use crate::error::ApiError;
use crate::grading::{grade, Feedback, RandomChooser};
use crate::protocol::{session_view, GradeIn, GradeReport, SessionView};
use crate::seeds::sample_test;
use crate::state::AppState;

#[instrument(level = "info", skip(state, config), fields(count = config.count, difficulty = ?config.difficulty))]
pub async fn generate_test(state: &AppState, config: TestConfig) -> Result<SessionView, ApiError> {
  let session = state.generate_session(config).await?;
  info!(target: "exam", id = %session.id, origin = "generator", "Test served");
  Ok(session_view(&session))
}

#[instrument(level = "info", skip(state))]
pub async fn open_sample(state: &AppState) -> SessionView {
  let test = sample_test();
  let mut config = state.config.default_test_config();
  config.title = test.title.clone();
  config.count = test.questions.len() as u32;
  let session = state.open_session(config, test).await;
  info!(target: "exam", id = %session.id, origin = "sample", "Test served");
  session_view(&session)
}

pub async fn get_session(state: &AppState, session_id: &str) -> Result<SessionView, ApiError> {
  Ok(session_view(&state.get_session(session_id).await?))
}

#[instrument(level = "info", skip(state, value), fields(%session_id, %question_id, value_len = value.len()))]
pub async fn set_answer(
  state: &AppState,
  session_id: &str,
  question_id: &str,
  value: String,
) -> Result<SessionView, ApiError> {
  Ok(session_view(&state.set_answer(session_id, question_id, value).await?))
}

pub async fn reveal(state: &AppState, session_id: &str, show: bool) -> Result<SessionView, ApiError> {
  Ok(session_view(&state.reveal(session_id, show).await?))
}

#[instrument(level = "info", skip(state), fields(%session_id))]
pub async fn submit(state: &AppState, session_id: &str) -> Result<GradeReport, ApiError> {
  let graded = state.submit(session_id).await?;
  Ok(GradeReport::from(&graded))
}

pub async fn retry(state: &AppState, session_id: &str) -> Result<SessionView, ApiError> {
  Ok(session_view(&state.retry(session_id).await?))
}

/// Grade a test the caller already holds. Empty tests cannot be graded.
#[instrument(level = "info", skip(body), fields(questions = body.test.questions.len(), answered = body.answers.len()))]
pub fn grade_stateless(body: &GradeIn) -> Result<GradeReport, ApiError> {
  if body.test.questions.is_empty() {
    return Err(ApiError::BadRequest("test has no questions".into()));
  }
  let result = grade(&body.test, &body.answers);
  let feedback = Feedback::for_score(result.score, &mut RandomChooser::thread());
  Ok(GradeReport::new(&result, &feedback))
}

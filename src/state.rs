//! Application state: in-memory exam sessions, quiz config, and the optional generator.
//!
//! This module owns:
//!   - exam sessions by id
//!   - the quiz config (prompts, topic catalog, defaults) from TOML or defaults
//!   - optional OpenAI client used to acquire tests
//!
//! Tests only come from the generator or the explicit sample endpoint. A failed
//! generation creates no session.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::domain::{Test, TestConfig};
use crate::error::{GenerateError, SessionError};
use crate::openai::OpenAI;
use crate::session::{ExamSession, GradedExam};
use crate::grading::RandomChooser;

#[derive(Clone)]
pub struct AppState {
  pub sessions: Arc<RwLock<HashMap<String, ExamSession>>>,
  pub openai: Option<OpenAI>,
  pub config: QuizConfig,
}

impl AppState {
  /// Build state from env: load config, init OpenAI.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let config = load_quiz_config_from_env().unwrap_or_default();

    let openai = OpenAI::from_env();
    if let Some(oa) = &openai {
      info!(target: "toan2_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
    } else {
      info!(target: "toan2_backend", "OpenAI disabled (no OPENAI_API_KEY). Only the sample test is available.");
    }

    Self::with_parts(config, openai)
  }

  pub fn with_parts(config: QuizConfig, openai: Option<OpenAI>) -> Self {
    Self { sessions: Arc::new(RwLock::new(HashMap::new())), openai, config }
  }

  /// Acquire a test for `config` and open a session on it.
  #[instrument(level = "info", skip(self, config), fields(count = config.count, topics = config.topics.len()))]
  pub async fn generate_session(&self, config: TestConfig) -> Result<ExamSession, GenerateError> {
    config.validate()?;
    let Some(oa) = &self.openai else {
      error!(target: "exam", "OPENAI_API_KEY not set; cannot generate a test");
      return Err(GenerateError::NotConfigured);
    };
    let test = oa
      .generate_math_test(&self.config.prompts, &self.config.defaults, &config)
      .await?;
    Ok(self.open_session(config, test).await)
  }

  /// Open a session on an already acquired test.
  #[instrument(level = "debug", skip(self, config, test), fields(questions = test.questions.len()))]
  pub async fn open_session(&self, config: TestConfig, test: Test) -> ExamSession {
    let session = ExamSession::new(Uuid::new_v4().to_string(), config, test);
    self.sessions.write().await.insert(session.id.clone(), session.clone());
    info!(target: "exam", id = %session.id, questions = session.test.questions.len(), "Exam session opened");
    session
  }

  /// Read-only access to a session by id.
  #[instrument(level = "debug", skip(self), fields(%id))]
  pub async fn get_session(&self, id: &str) -> Result<ExamSession, SessionError> {
    self
      .sessions
      .read()
      .await
      .get(id)
      .cloned()
      .ok_or_else(|| SessionError::UnknownSession(id.to_string()))
  }

  /// Run `f` on the session under the write lock; returns the updated session.
  async fn with_session<T>(
    &self,
    id: &str,
    f: impl FnOnce(&mut ExamSession) -> Result<T, SessionError>,
  ) -> Result<(T, ExamSession), SessionError> {
    let mut sessions = self.sessions.write().await;
    let session = sessions
      .get_mut(id)
      .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;
    let out = f(session)?;
    Ok((out, session.clone()))
  }

  #[instrument(level = "debug", skip(self, value), fields(%id, %question_id, value_len = value.len()))]
  pub async fn set_answer(&self, id: &str, question_id: &str, value: String) -> Result<ExamSession, SessionError> {
    self.with_session(id, |s| s.set_answer(question_id, value)).await.map(|(_, s)| s)
  }

  #[instrument(level = "debug", skip(self), fields(%id))]
  pub async fn reveal(&self, id: &str, show: bool) -> Result<ExamSession, SessionError> {
    self
      .with_session(id, |s| {
        s.toggle_answers(show);
        Ok(())
      })
      .await
      .map(|(_, s)| s)
  }

  #[instrument(level = "info", skip(self), fields(%id))]
  pub async fn submit(&self, id: &str) -> Result<GradedExam, SessionError> {
    self
      .with_session(id, |s| Ok(s.submit(&mut RandomChooser::thread())))
      .await
      .map(|(graded, _)| graded)
  }

  #[instrument(level = "info", skip(self), fields(%id))]
  pub async fn retry(&self, id: &str) -> Result<ExamSession, SessionError> {
    self
      .with_session(id, |s| {
        s.retry();
        Ok(())
      })
      .await
      .map(|(_, s)| s)
  }
}

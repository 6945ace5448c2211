//! Error types for acquisition and exam sessions, and their HTTP mapping.
//!
//! Grading itself has no error type: every answer gets a verdict.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::ConfigError;

/// Failures while acquiring a test from the generator.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("test generator is not configured (set OPENAI_API_KEY)")]
  NotConfigured,

  #[error("invalid test config: {0}")]
  InvalidConfig(#[from] ConfigError),

  #[error("network error: {0}")]
  Network(String),

  #[error("provider error (HTTP {status}): {message}")]
  Provider { status: u16, message: String },

  #[error("malformed generator response: {0}")]
  Malformed(String),

  #[error("generated test has no questions")]
  EmptyTest,
}

/// Failures of session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("unknown session: {0}")]
  UnknownSession(String),

  #[error("unknown question: {0}")]
  UnknownQuestion(String),

  #[error("answers are locked after grading")]
  AlreadyGraded,
}

#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Generate(#[from] GenerateError),

  #[error(transparent)]
  Session(#[from] SessionError),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Generate(GenerateError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Generate(GenerateError::InvalidConfig(_)) => StatusCode::BAD_REQUEST,
      ApiError::Generate(_) => StatusCode::BAD_GATEWAY,
      ApiError::Session(SessionError::AlreadyGraded) => StatusCode::CONFLICT,
      ApiError::Session(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_mapping() {
    assert_eq!(ApiError::from(GenerateError::NotConfigured).status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ApiError::from(GenerateError::EmptyTest).status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
      ApiError::from(GenerateError::from(ConfigError::NoTopics)).status(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(ApiError::from(SessionError::AlreadyGraded).status(), StatusCode::CONFLICT);
    assert_eq!(ApiError::from(SessionError::UnknownSession("x".into())).status(), StatusCode::NOT_FOUND);
  }
}

//! Domain models: test configuration, questions, tests and submissions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_QUESTIONS: u32 = 5;
pub const MAX_QUESTIONS: u32 = 20;

/// Difficulty picked in the config panel. The label is what the generator sees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn label(self) -> &'static str {
    match self {
      Difficulty::Easy => "Dễ",
      Difficulty::Medium => "Trung bình",
      Difficulty::Hard => "Khó (Nâng cao)",
    }
  }
}

/// Question kinds. Everything except `MultipleChoice` is graded as free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionType {
  MultipleChoice,
  FillInBlank,
  Calculation,
  WordProblem,
}

impl QuestionType {
  /// Vietnamese label used on the wire and in the generator schema.
  pub fn label(self) -> &'static str {
    match self {
      QuestionType::MultipleChoice => "Trắc nghiệm",
      QuestionType::FillInBlank => "Điền vào chỗ trống",
      QuestionType::Calculation => "Đặt tính rồi tính",
      QuestionType::WordProblem => "Bài toán có lời văn",
    }
  }

  pub fn is_multiple_choice(self) -> bool {
    matches!(self, QuestionType::MultipleChoice)
  }
}

impl From<String> for QuestionType {
  fn from(raw: String) -> Self {
    let key = raw.trim().to_lowercase();
    match key.as_str() {
      "trắc nghiệm" | "multiple_choice" | "multiplechoice" => QuestionType::MultipleChoice,
      "điền vào chỗ trống" | "fill_in_blank" | "fill_in_the_blank" | "fillinblank" => QuestionType::FillInBlank,
      "đặt tính rồi tính" | "calculation" => QuestionType::Calculation,
      // "Bài toán có lời văn", "word_problem" and anything unrecognized: free text.
      _ => QuestionType::WordProblem,
    }
  }
}

impl From<QuestionType> for String {
  fn from(t: QuestionType) -> Self {
    t.label().to_string()
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  #[serde(default)]
  pub id: String,
  #[serde(rename = "type")]
  pub kind: QuestionType,
  pub content: String,
  /// Only meaningful for multiple choice; index `i` is option letter `'A' + i`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
  pub correct_answer: String,
  #[serde(default)]
  pub explanation: String,
}

impl Question {
  pub fn options(&self) -> &[String] {
    self.options.as_deref().unwrap_or(&[])
  }
}

/// A generated test. Immutable once acquired.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
  pub title: String,
  pub questions: Vec<Question>,
  #[serde(default = "Utc::now")]
  pub created_at: DateTime<Utc>,
}

impl Test {
  pub fn question(&self, id: &str) -> Option<&Question> {
    self.questions.iter().find(|q| q.id == id)
  }
}

/// Question id -> raw answer text. Missing entries read as "".
pub type Submission = HashMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Vui lòng chọn ít nhất một chủ đề!")]
  NoTopics,
  #[error("question count must be between 5 and 20, got {0}")]
  CountOutOfRange(u32),
  #[error("test title must not be empty")]
  EmptyTitle,
}

/// What the config panel submits to acquisition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
  pub topics: Vec<String>,
  pub count: u32,
  pub difficulty: Difficulty,
  pub title: String,
}

impl TestConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.topics.iter().all(|t| t.trim().is_empty()) {
      return Err(ConfigError::NoTopics);
    }
    if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.count) {
      return Err(ConfigError::CountOutOfRange(self.count));
    }
    if self.title.trim().is_empty() {
      return Err(ConfigError::EmptyTitle);
    }
    Ok(())
  }
}

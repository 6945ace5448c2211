//! Grading engine: per-question verdicts and the aggregate score.
//!
//! Pure and synchronous. Reads a test and a submission snapshot, never
//! mutates either, and tolerates any answer-key format the generator
//! produces (bare letter, "A. 50", numbers with units, full sentences).

pub mod feedback;
pub mod matchers;
pub mod text;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{Question, Submission, Test};
use matchers::{first_match, AnswerCase, FREE_TEXT_RULES, MULTIPLE_CHOICE_RULES};

pub use feedback::{Feedback, FeedbackTier, MessageChooser, RandomChooser, Rank};
#[cfg(test)]
pub use feedback::FixedChooser;

/// Correctness of one question, plus the rule that accepted it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
  pub question_id: String,
  pub correct: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub matched_by: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeResult {
  pub verdicts: Vec<Verdict>,
  pub correct_count: usize,
  pub total_count: usize,
  /// `correct / total * 10`, unrounded.
  pub score: f64,
}

impl GradeResult {
  pub fn tier(&self) -> FeedbackTier {
    FeedbackTier::for_score(self.score)
  }

  pub fn rank(&self) -> Rank {
    Rank::for_score(self.score)
  }

  /// Score rounded to one decimal for display ("8.0").
  pub fn score_display(&self) -> String {
    format!("{:.1}", self.score)
  }

  pub fn is_correct(&self, question_id: &str) -> Option<bool> {
    self
      .verdicts
      .iter()
      .find(|v| v.question_id == question_id)
      .map(|v| v.correct)
  }
}

/// Judge one raw answer against a question's key.
pub fn grade_question(question: &Question, user_value: &str) -> Verdict {
  let case = AnswerCase {
    user: user_value,
    correct: &question.correct_answer,
    options: question.options(),
  };
  let rules = if question.kind.is_multiple_choice() {
    MULTIPLE_CHOICE_RULES
  } else {
    FREE_TEXT_RULES
  };
  let matched_by = first_match(rules, &case);
  Verdict { question_id: question.id.clone(), correct: matched_by.is_some(), matched_by }
}

/// Grade every question in test order.
///
/// The test must have at least one question; acquisition rejects empty tests
/// before they reach this point.
#[instrument(level = "debug", skip_all, fields(questions = test.questions.len(), answered = submission.len()))]
pub fn grade(test: &Test, submission: &Submission) -> GradeResult {
  debug_assert!(!test.questions.is_empty(), "grading requires at least one question");

  let verdicts: Vec<Verdict> = test
    .questions
    .iter()
    .map(|q| {
      let answer = submission.get(&q.id).map(String::as_str).unwrap_or("");
      grade_question(q, answer)
    })
    .collect();

  let correct_count = verdicts.iter().filter(|v| v.correct).count();
  let total_count = verdicts.len();
  let score = (correct_count as f64 / total_count as f64) * 10.0;
  debug!(target: "exam", correct_count, total_count, score, "Test graded");

  GradeResult { verdicts, correct_count, total_count, score }
}

/// Letter of the option the key designates, when the key is "A", "A." or "A) ...".
pub fn answer_key_letter(question: &Question) -> Option<char> {
  if !question.kind.is_multiple_choice() {
    return None;
  }
  let mut chars = question.correct_answer.trim().chars();
  let first = chars.next()?.to_ascii_uppercase();
  let rest = chars.as_str();
  if !(rest.is_empty() || rest.starts_with('.') || rest.starts_with(')')) {
    return None;
  }
  let idx = matchers::option_index(&first.to_string())?;
  (idx < question.options().len()).then_some(first)
}

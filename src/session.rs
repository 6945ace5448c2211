//! Exam session: the state one learner moves through for a single test.
//!
//! Answers are editable until submit. Submit grades once and locks the
//! answers; retry throws the grade and answers away and starts over.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{Submission, Test, TestConfig};
use crate::error::SessionError;
use crate::grading::{grade, Feedback, GradeResult, MessageChooser};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedExam {
  pub result: GradeResult,
  pub feedback: Feedback,
}

#[derive(Clone, Debug)]
pub struct ExamSession {
  pub id: String,
  pub config: TestConfig,
  pub test: Test,
  pub answers: Submission,
  pub show_answers: bool,
  pub graded: Option<GradedExam>,
}

impl ExamSession {
  pub fn new(id: String, config: TestConfig, test: Test) -> Self {
    Self { id, config, test, answers: Submission::new(), show_answers: false, graded: None }
  }

  pub fn is_graded(&self) -> bool {
    self.graded.is_some()
  }

  /// Record an answer. Rejected after grading and for ids not in the test.
  #[instrument(level = "debug", skip(self, value), fields(session = %self.id, value_len = value.len()))]
  pub fn set_answer(&mut self, question_id: &str, value: String) -> Result<(), SessionError> {
    if self.is_graded() {
      return Err(SessionError::AlreadyGraded);
    }
    if self.test.question(question_id).is_none() {
      return Err(SessionError::UnknownQuestion(question_id.to_string()));
    }
    self.answers.insert(question_id.to_string(), value);
    Ok(())
  }

  pub fn toggle_answers(&mut self, show: bool) {
    self.show_answers = show;
  }

  /// Grade the current answers. A second submit returns the stored grade.
  #[instrument(level = "info", skip(self, chooser), fields(session = %self.id))]
  pub fn submit(&mut self, chooser: &mut dyn MessageChooser) -> GradedExam {
    if let Some(graded) = &self.graded {
      debug!(target: "exam", "Exam already graded; returning stored grade");
      return graded.clone();
    }
    let result = grade(&self.test, &self.answers);
    let feedback = Feedback::for_score(result.score, chooser);
    info!(
      target: "exam",
      correct = result.correct_count,
      total = result.total_count,
      score = %result.score_display(),
      tier = ?result.tier(),
      rank = result.rank().label(),
      "Exam submitted"
    );
    let graded = GradedExam { result, feedback };
    self.show_answers = true;
    self.graded = Some(graded.clone());
    graded
  }

  /// Start over on the same test with an empty answer sheet.
  pub fn retry(&mut self) {
    self.answers.clear();
    self.graded = None;
    self.show_answers = false;
  }

  /// Whether answer keys and explanations may be shown.
  pub fn reveals_key(&self) -> bool {
    self.show_answers || self.is_graded()
  }
}

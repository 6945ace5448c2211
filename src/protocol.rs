//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{QuestionType, Submission, Test, TestConfig};
use crate::grading::{answer_key_letter, Feedback, GradeResult, Verdict};
use crate::session::{ExamSession, GradedExam};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GenerateTest {
        config: TestConfig,
    },
    SampleTest,
    SetAnswer {
        #[serde(rename = "sessionId")]
        session_id: String,
        #[serde(rename = "questionId")]
        question_id: String,
        value: String,
    },
    Reveal {
        #[serde(rename = "sessionId")]
        session_id: String,
        show: bool,
    },
    Submit {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Retry {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Session {
        session: SessionView,
    },
    AnswerSaved {
        #[serde(rename = "questionId")]
        question_id: String,
    },
    Graded {
        report: GradeReport,
    },
    Error {
        message: String,
    },
}

/// One question as the exam paper shows it. Keys are hidden until revealed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Option letter designated by the key, for highlighting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub config: TestConfig,
    pub show_answers: bool,
    pub graded: bool,
    pub questions: Vec<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<GradeReport>,
}

/// Result card: counts, score, rank badge and message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub correct_count: usize,
    pub total_count: usize,
    pub score: f64,
    pub score_display: String,
    pub feedback: Feedback,
    pub verdicts: Vec<Verdict>,
}

impl GradeReport {
    pub fn new(result: &GradeResult, feedback: &Feedback) -> Self {
        Self {
            correct_count: result.correct_count,
            total_count: result.total_count,
            score: result.score,
            score_display: result.score_display(),
            feedback: feedback.clone(),
            verdicts: result.verdicts.clone(),
        }
    }
}

impl From<&GradedExam> for GradeReport {
    fn from(g: &GradedExam) -> Self {
        GradeReport::new(&g.result, &g.feedback)
    }
}

/// Convert a session (internal) to the public view.
pub fn session_view(s: &ExamSession) -> SessionView {
    let reveal = s.reveals_key();
    let result = s.graded.as_ref().map(|g| &g.result);
    let questions = s
        .test
        .questions
        .iter()
        .map(|q| QuestionView {
            id: q.id.clone(),
            kind: q.kind,
            content: q.content.clone(),
            options: q.options.clone(),
            answer: s.answers.get(&q.id).cloned().unwrap_or_default(),
            correct_answer: reveal.then(|| q.correct_answer.clone()),
            correct_option: if reveal { answer_key_letter(q) } else { None },
            explanation: reveal.then(|| q.explanation.clone()),
            correct: result.and_then(|r| r.is_correct(&q.id)),
        })
        .collect();

    SessionView {
        id: s.id.clone(),
        title: s.test.title.clone(),
        created_at: s.test.created_at.to_rfc3339(),
        config: s.config.clone(),
        show_answers: s.show_answers,
        graded: s.is_graded(),
        questions,
        report: s.graded.as_ref().map(GradeReport::from),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub generator: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfigOut {
    pub topics: Vec<String>,
    pub defaults: TestConfig,
    pub min_count: u32,
    pub max_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerIn {
    pub question_id: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RevealIn {
    pub show: bool,
}

/// Stateless grading: a full test plus the answer sheet.
#[derive(Debug, Deserialize)]
pub struct GradeIn {
    pub test: Test,
    #[serde(default)]
    pub answers: Submission,
}

//! Built-in sample test so the exam flow can be demoed without a generator.

use chrono::Utc;

use crate::domain::{Question, QuestionType, Test};

fn q(id: &str, kind: QuestionType, content: &str, options: &[&str], correct: &str, explanation: &str) -> Question {
  Question {
    id: id.into(),
    kind,
    content: content.into(),
    options: (!options.is_empty()).then(|| options.iter().map(|s| s.to_string()).collect()),
    correct_answer: correct.into(),
    explanation: explanation.into(),
  }
}

/// Five questions covering every question type and the answer-key shapes
/// the generator tends to produce.
pub fn sample_test() -> Test {
  Test {
    title: "Bài kiểm tra Toán Lớp 2 (mẫu)".into(),
    questions: vec![
      q(
        "1",
        QuestionType::MultipleChoice,
        "5 x 10 = ?",
        &["A. 50", "B. 60", "C. 15", "D. 40"],
        "A",
        "Bảng nhân 5: 5 x 10 = 50.",
      ),
      q(
        "2",
        QuestionType::MultipleChoice,
        "Mẹ có 35 quả táo, mẹ mua thêm 15 quả. Hỏi mẹ có tất cả bao nhiêu quả táo?",
        &["A. 40 quả táo", "B. 50 quả táo", "C. 20 quả táo", "D. 45 quả táo"],
        "50 quả",
        "35 + 15 = 50 (quả táo).",
      ),
      q(
        "3",
        QuestionType::FillInBlank,
        "1 dm = ... cm",
        &[],
        "10cm",
        "1 dm = 10 cm.",
      ),
      q(
        "4",
        QuestionType::Calculation,
        "Đặt tính rồi tính: 47 + 16",
        &[],
        "63",
        "47 + 16 = 63.",
      ),
      q(
        "5",
        QuestionType::WordProblem,
        "Lớp 2A có 18 bạn nam và 14 bạn nữ. Hỏi lớp 2A có tất cả bao nhiêu bạn?",
        &[],
        "32 bạn",
        "18 + 14 = 32 (bạn).",
      ),
    ],
    created_at: Utc::now(),
  }
}

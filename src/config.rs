//! Loading quiz configuration (prompts, topic catalog, defaults) from TOML.
//!
//! See `QuizConfig` and `Prompts` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Difficulty, TestConfig};

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Topics offered by the config panel.
  #[serde(default = "default_topics")]
  pub topics: Vec<String>,
  #[serde(default)]
  pub defaults: Defaults,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self { prompts: Prompts::default(), topics: default_topics(), defaults: Defaults::default() }
  }
}

impl QuizConfig {
  /// Config the panel starts with: first catalog topic plus the defaults.
  pub fn default_test_config(&self) -> TestConfig {
    TestConfig {
      topics: self.topics.first().cloned().into_iter().collect(),
      count: self.defaults.count,
      difficulty: self.defaults.difficulty,
      title: self.defaults.title.clone(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Defaults {
  pub title: String,
  pub count: u32,
  pub difficulty: Difficulty,
  /// Sampling temperature for test generation.
  pub temperature: f32,
}

impl Default for Defaults {
  fn default() -> Self {
    Self {
      title: "Bài kiểm tra Toán Lớp 2".into(),
      count: 10,
      difficulty: Difficulty::Medium,
      temperature: 0.7,
    }
  }
}

/// Prompts used by the test generator. Placeholders: {title}, {topics}, {count}, {difficulty}.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub generate_system: String,
  pub generate_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      generate_system: "Bạn là giáo viên Toán tiểu học tại Việt Nam. Chỉ trả lời bằng JSON hợp lệ.".into(),
      generate_user_template: r#"Hãy tạo một bài kiểm tra Toán lớp 2 cho học sinh Việt Nam.
Tiêu đề: {title}
Các chủ đề cần bao quát: {topics}
Số lượng câu hỏi: {count}
Độ khó: {difficulty}

Yêu cầu:
1. Câu hỏi phải phù hợp chính xác với chương trình Toán lớp 2 (Bộ sách Kết nối tri thức, Chân trời sáng tạo hoặc Cánh diều).
2. Bao gồm đa dạng các loại câu hỏi: Trắc nghiệm, Tính toán, Giải toán có lời văn.
3. Trả về JSON: {"title": string, "questions": [{"id": string, "type": "Trắc nghiệm" | "Điền vào chỗ trống" | "Đặt tính rồi tính" | "Bài toán có lời văn", "content": string, "options": [string] (chỉ cho Trắc nghiệm, dạng "A. ..."), "correctAnswer": string, "explanation": string}]}.
4. Với câu Trắc nghiệm, correctAnswer chỉ gồm chữ cái của đáp án đúng (A, B, C hoặc D)."#
        .into(),
    }
  }
}

fn default_topics() -> Vec<String> {
  [
    "Số và phép tính phạm vi 100",
    "Số và phép tính phạm vi 1000",
    "Cộng trừ có nhớ (phạm vi 100)",
    "Bảng nhân 2, 5",
    "Bảng chia 2, 5",
    "Hình học (Khối trụ, cầu, tứ giác)",
    "Đo lường (cm, dm, m, kg, lít)",
    "Thời gian (Ngày, giờ, tháng)",
    "Giải toán có lời văn",
  ]
  .into_iter()
  .map(String::from)
  .collect()
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "toan2_backend", %path, topics = cfg.topics.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "toan2_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "toan2_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

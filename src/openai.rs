//! Minimal OpenAI-compatible client used to acquire generated tests.
//!
//! We only call chat.completions and request a strict JSON object.
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::config::{Defaults, Prompts};
use crate::domain::{Question, Test, TestConfig};
use crate::error::GenerateError;
use crate::util::{fill_template, trunc_for_log};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

/// Test as the model returns it, before ids are repaired and the timestamp stamped.
#[derive(Debug, Deserialize)]
pub struct RawTest {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub questions: Vec<Question>,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    Self::new(api_key, base_url, model)
  }

  pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Option<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(60))
      .build()
      .ok()?;
    Some(Self {
      client,
      api_key: api_key.into(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
      model: model.into(),
    })
  }

  /// JSON-object chat completion. Generic over the target type T.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, GenerateError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "toan2-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await
      .map_err(|e| GenerateError::Network(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or_else(|| trunc_for_log(&body, 200));
      return Err(GenerateError::Provider { status, message });
    }

    let body: ChatCompletionResponse = res
      .json()
      .await
      .map_err(|e| GenerateError::Malformed(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();
    info!(response_len = text.len(), "Model response received");

    serde_json::from_str::<T>(&text).map_err(|e| GenerateError::Malformed(e.to_string()))
  }

  /// Generate a grade-2 math test for the given panel config.
  #[instrument(
    level = "info",
    skip(self, prompts, defaults, config),
    fields(count = config.count, difficulty = ?config.difficulty, topics = config.topics.len())
  )]
  pub async fn generate_math_test(
    &self,
    prompts: &Prompts,
    defaults: &Defaults,
    config: &TestConfig,
  ) -> Result<Test, GenerateError> {
    config.validate()?;

    let topics = config.topics.join(", ");
    let count = config.count.to_string();
    let user = fill_template(
      &prompts.generate_user_template,
      &[
        ("title", config.title.as_str()),
        ("topics", topics.as_str()),
        ("count", count.as_str()),
        ("difficulty", config.difficulty.label()),
      ],
    );

    let start = std::time::Instant::now();
    let result = self.chat_json::<RawTest>(&prompts.generate_system, &user, defaults.temperature).await;
    let elapsed = start.elapsed();

    let raw = match result {
      Ok(raw) => raw,
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during test generation");
        return Err(e);
      }
    };

    let test = assemble_test(raw, &config.title)?;
    if test.questions.len() != config.count as usize {
      warn!(requested = config.count, received = test.questions.len(), "Generator returned a different question count");
    }
    info!(
      ?elapsed,
      questions = test.questions.len(),
      title = %trunc_for_log(&test.title, 40),
      "Test successfully generated"
    );
    Ok(test)
  }
}

/// Turn a raw model response into a gradeable test.
///
/// Blank or duplicate question ids are replaced by `q<position>` so answers
/// map to exactly one question. A test with no questions is rejected.
pub fn assemble_test(raw: RawTest, fallback_title: &str) -> Result<Test, GenerateError> {
  if raw.questions.is_empty() {
    return Err(GenerateError::EmptyTest);
  }

  let mut seen = HashSet::new();
  let mut questions = raw.questions;
  for (idx, q) in questions.iter_mut().enumerate() {
    let id = q.id.trim().to_string();
    if id.is_empty() || seen.contains(&id) {
      let mut fresh = format!("q{}", idx + 1);
      while seen.contains(&fresh) {
        fresh.push('_');
      }
      q.id = fresh;
    } else {
      q.id = id;
    }
    seen.insert(q.id.clone());
  }

  let title = if raw.title.trim().is_empty() { fallback_title.to_string() } else { raw.title };
  Ok(Test { title, questions, created_at: Utc::now() })
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, QuestionType};
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn config() -> TestConfig {
    TestConfig {
      topics: vec!["Bảng nhân 2, 5".into()],
      count: 5,
      difficulty: Difficulty::Easy,
      title: "Kiểm tra bảng nhân".into(),
    }
  }

  fn completion(content: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
      "choices": [{"message": {"role": "assistant", "content": content.to_string()}, "index": 0}],
      "usage": {"prompt_tokens": 120, "completion_tokens": 300, "total_tokens": 420}
    })
  }

  fn question(id: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "type": "Đặt tính rồi tính", "content": "2 x 5 = ?", "correctAnswer": "10"})
  }

  #[test]
  fn assemble_repairs_ids_and_title() {
    let raw: RawTest = serde_json::from_value(serde_json::json!({
      "title": "  ",
      "questions": [question("q2"), question(""), question(" 1 "), question("1")]
    }))
    .unwrap();
    let test = assemble_test(raw, "Dự phòng").unwrap();
    let ids: Vec<_> = test.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, ["q2", "q2_", "1", "q4"]);
    assert_eq!(test.title, "Dự phòng");
  }

  #[test]
  fn assemble_rejects_empty_test() {
    let raw = RawTest { title: "x".into(), questions: vec![] };
    assert!(matches!(assemble_test(raw, "x"), Err(GenerateError::EmptyTest)));
  }

  #[tokio::test]
  async fn generates_test_from_completion() {
    let server = MockServer::start().await;
    let content = serde_json::json!({
      "title": "Kiểm tra bảng nhân",
      "questions": [
        {"id": "1", "type": "Trắc nghiệm", "content": "5 x 10 = ?", "options": ["A. 50", "B. 60"], "correctAnswer": "A", "explanation": "5 x 10 = 50"},
        question("2")
      ]
    });
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .and(header("Authorization", "Bearer test-key"))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
      .mount(&server)
      .await;

    let client = OpenAI::new("test-key", format!("{}/v1", server.uri()), "gpt-4o-mini").unwrap();
    let test = client
      .generate_math_test(&Prompts::default(), &Defaults::default(), &config())
      .await
      .unwrap();
    assert_eq!(test.title, "Kiểm tra bảng nhân");
    assert_eq!(test.questions.len(), 2);
    assert_eq!(test.questions[0].kind, QuestionType::MultipleChoice);
    assert_eq!(test.questions[1].kind, QuestionType::Calculation);
  }

  #[tokio::test]
  async fn provider_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(
        ResponseTemplate::new(401).set_body_json(serde_json::json!({"error": {"message": "Incorrect API key"}})),
      )
      .mount(&server)
      .await;

    let client = OpenAI::new("bad", format!("{}/v1", server.uri()), "m").unwrap();
    let err = client
      .generate_math_test(&Prompts::default(), &Defaults::default(), &config())
      .await
      .unwrap_err();
    match err {
      GenerateError::Provider { status, message } => {
        assert_eq!(status, 401);
        assert_eq!(message, "Incorrect API key");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[tokio::test]
  async fn malformed_json_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/v1/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": "not json"}, "index": 0}]
      })))
      .mount(&server)
      .await;

    let client = OpenAI::new("k", format!("{}/v1", server.uri()), "m").unwrap();
    let err = client
      .generate_math_test(&Prompts::default(), &Defaults::default(), &config())
      .await
      .unwrap_err();
    assert!(matches!(err, GenerateError::Malformed(_)));
  }

  #[tokio::test]
  async fn invalid_config_never_calls_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

    let client = OpenAI::new("k", server.uri(), "m").unwrap();
    let mut cfg = config();
    cfg.count = 3;
    let err = client
      .generate_math_test(&Prompts::default(), &Defaults::default(), &cfg)
      .await
      .unwrap_err();
    assert!(matches!(err, GenerateError::InvalidConfig(_)));
  }
}

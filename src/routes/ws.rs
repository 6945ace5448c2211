//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::ApiError;
use crate::logic;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "toan2_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "toan2_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "toan2_backend", msg_len = txt.len(), "WS message received");
            handle_client_ws(incoming, &state).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "toan2_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "toan2_backend", "WebSocket disconnected");
}

fn reply<T>(res: Result<T, ApiError>, ok: impl FnOnce(T) -> ServerWsMessage) -> ServerWsMessage {
  match res {
    Ok(v) => ok(v),
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[instrument(level = "info", skip(msg, state))]
pub(crate) async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::GenerateTest { config } => {
      let res = logic::generate_test(state, config).await;
      reply(res, |session| ServerWsMessage::Session { session })
    }

    ClientWsMessage::SampleTest => ServerWsMessage::Session { session: logic::open_sample(state).await },

    ClientWsMessage::SetAnswer { session_id, question_id, value } => {
      let res = logic::set_answer(state, &session_id, &question_id, value).await;
      reply(res, |_| ServerWsMessage::AnswerSaved { question_id })
    }

    ClientWsMessage::Reveal { session_id, show } => {
      let res = logic::reveal(state, &session_id, show).await;
      reply(res, |session| ServerWsMessage::Session { session })
    }

    ClientWsMessage::Submit { session_id } => {
      let res = logic::submit(state, &session_id).await;
      if let Ok(report) = &res {
        info!(target: "exam", id = %session_id, score = %report.score_display, "WS submit graded");
      }
      reply(res, |report| ServerWsMessage::Graded { report })
    }

    ClientWsMessage::Retry { session_id } => {
      let res = logic::retry(state, &session_id).await;
      reply(res, |session| ServerWsMessage::Session { session })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::QuizConfig;

  async fn send(state: &AppState, raw: serde_json::Value) -> serde_json::Value {
    let msg: ClientWsMessage = serde_json::from_value(raw).unwrap();
    serde_json::to_value(handle_client_ws(msg, state).await).unwrap()
  }

  #[tokio::test]
  async fn ws_exam_flow() {
    let state = AppState::with_parts(QuizConfig::default(), None);

    assert_eq!(send(&state, serde_json::json!({ "type": "ping" })).await["type"], "pong");

    let opened = send(&state, serde_json::json!({ "type": "sample_test" })).await;
    assert_eq!(opened["type"], "session");
    let id = opened["session"]["id"].as_str().unwrap().to_string();

    let saved = send(
      &state,
      serde_json::json!({ "type": "set_answer", "sessionId": id, "questionId": "1", "value": "A" }),
    )
    .await;
    assert_eq!(saved, serde_json::json!({ "type": "answer_saved", "questionId": "1" }));

    let graded = send(&state, serde_json::json!({ "type": "submit", "sessionId": id })).await;
    assert_eq!(graded["type"], "graded");
    assert_eq!(graded["report"]["correctCount"], 1);

    let locked = send(
      &state,
      serde_json::json!({ "type": "set_answer", "sessionId": id, "questionId": "1", "value": "B" }),
    )
    .await;
    assert_eq!(locked["type"], "error");
  }

  #[tokio::test]
  async fn ws_generate_without_key_reports_error() {
    let state = AppState::with_parts(QuizConfig::default(), None);
    let res = send(
      &state,
      serde_json::json!({
        "type": "generate_test",
        "config": { "topics": ["Bảng chia 2, 5"], "count": 10, "difficulty": "hard", "title": "T" }
      }),
    )
    .await;
    assert_eq!(res["type"], "error");
  }
}

//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws`
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/config", get(http::http_get_config))
        .route("/api/v1/tests", post(http::http_post_test))
        .route("/api/v1/tests/sample", post(http::http_post_sample))
        .route("/api/v1/sessions/:id", get(http::http_get_session))
        .route("/api/v1/sessions/:id/answers", put(http::http_put_answer))
        .route("/api/v1/sessions/:id/reveal", post(http::http_post_reveal))
        .route("/api/v1/sessions/:id/submit", post(http::http_post_submit))
        .route("/api/v1/sessions/:id/retry", post(http::http_post_retry))
        .route("/api/v1/grade", post(http::http_post_grade))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::QuizConfig;

    fn app() -> Router {
        build_router(Arc::new(AppState::with_parts(QuizConfig::default(), None)))
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_generator_off() {
        let (status, body) = call(&app(), Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true, "generator": false }));
    }

    #[tokio::test]
    async fn config_lists_catalog() {
        let (status, body) = call(&app(), Method::GET, "/api/v1/config", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["topics"].as_array().unwrap().len(), 9);
        assert_eq!(body["defaults"]["count"], 10);
        assert_eq!(body["defaults"]["difficulty"], "medium");
        assert_eq!(body["minCount"], 5);
        assert_eq!(body["maxCount"], 20);
    }

    #[tokio::test]
    async fn generate_without_key_is_unavailable() {
        let cfg = json!({ "topics": ["Bảng nhân 2, 5"], "count": 10, "difficulty": "easy", "title": "T" });
        let (status, body) = call(&app(), Method::POST, "/api/v1/tests", Some(cfg)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn generate_with_bad_count_is_bad_request() {
        let cfg = json!({ "topics": ["Bảng nhân 2, 5"], "count": 30, "difficulty": "easy", "title": "T" });
        let (status, _) = call(&app(), Method::POST, "/api/v1/tests", Some(cfg)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sample_session_round_trip() {
        let app = app();
        let (status, view) = call(&app, Method::POST, "/api/v1/tests/sample", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = view["id"].as_str().unwrap().to_string();
        assert_eq!(view["questions"].as_array().unwrap().len(), 5);
        assert!(view["questions"][0].get("correctAnswer").is_none());
        assert_eq!(view["graded"], false);

        let uri = format!("/api/v1/sessions/{id}/answers");
        for (q, v) in [("1", "A"), ("2", "B"), ("3", "10 cm"), ("4", "60")] {
            let (status, _) = call(&app, Method::PUT, &uri, Some(json!({ "questionId": q, "value": v }))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, report) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/submit"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["correctCount"], 3);
        assert_eq!(report["totalCount"], 5);
        assert_eq!(report["scoreDisplay"], "6.0");
        assert_eq!(report["feedback"]["tier"], "good");
        assert_eq!(report["feedback"]["rankLabel"], "Khá");

        let (status, _) = call(&app, Method::PUT, &uri, Some(json!({ "questionId": "5", "value": "32" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, view) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(view["graded"], true);
        assert_eq!(view["questions"][0]["correctOption"], "A");
        assert_eq!(view["questions"][3]["correct"], false);
        assert_eq!(view["questions"][3]["correctAnswer"], "63");

        let (status, view) = call(&app, Method::POST, &format!("/api/v1/sessions/{id}/retry"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["graded"], false);
        assert_eq!(view["questions"][0]["answer"], "");
    }

    #[tokio::test]
    async fn reveal_shows_keys_before_grading() {
        let app = app();
        let (_, view) = call(&app, Method::POST, "/api/v1/tests/sample", None).await;
        let id = view["id"].as_str().unwrap().to_string();
        let (status, view) =
            call(&app, Method::POST, &format!("/api/v1/sessions/{id}/reveal"), Some(json!({ "show": true }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["showAnswers"], true);
        assert_eq!(view["questions"][2]["correctAnswer"], "10cm");
        assert!(view["questions"][2].get("correct").is_none());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (status, _) = call(&app(), Method::POST, "/api/v1/sessions/missing/submit", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn stateless_grade() {
        let body = json!({
            "test": {
                "title": "T",
                "questions": [
                    { "id": "a", "type": "Trắc nghiệm", "content": "?", "options": ["A. 50 quả táo", "B. 60"], "correctAnswer": "50 quả" },
                    { "id": "b", "type": "Bài toán có lời văn", "content": "?", "correctAnswer": "63" }
                ]
            },
            "answers": { "a": "A", "b": "Số 63" }
        });
        let (status, report) = call(&app(), Method::POST, "/api/v1/grade", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["correctCount"], 2);
        assert_eq!(report["score"], 10.0);
        assert_eq!(report["feedback"]["tier"], "perfect");
    }

    #[tokio::test]
    async fn stateless_grade_rejects_empty_test() {
        let body = json!({ "test": { "title": "T", "questions": [] } });
        let (status, _) = call(&app(), Method::POST, "/api/v1/grade", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

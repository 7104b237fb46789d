//! HTTP request handlers

use super::types::{ChatRequest, ChatResponse, ErrorResponse, VersionResponse};
use super::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/version", get(get_version))
        .with_state(state)
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = state
        .relay
        .respond(req.message.as_deref(), req.thread_id.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(kind = e.kind(), error = %e, "Chat API error");
            AppError::Internal(e.to_string())
        })?;

    Ok(Json(ChatResponse {
        response: reply.reply,
        thread_id: reply.thread_id,
    }))
}

async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::testing::{FailAt, MockAssistants};
    use crate::assistant::RunStatus;
    use crate::config::{AssistantConfig, PollPolicy, DEFAULT_BASE_URL};
    use crate::relay::Relay;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(mock: &Arc<MockAssistants>, api_key: Option<&str>) -> Router {
        let config = AssistantConfig {
            api_key: api_key.map(String::from),
            assistant_id: Some("asst_1".to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll: PollPolicy {
                interval: Duration::ZERO,
                max_attempts: 3,
            },
        };
        create_router(AppState::new(Relay::new(config, mock.clone())))
    }

    async fn post_chat(app: Router, body: String) -> (StatusCode, Value) {
        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_chat_end_to_end() {
        let mock = Arc::new(MockAssistants::new("t1", "Hello!"));
        let (status, body) = post_chat(
            app(&mock, Some("sk-test")),
            json!({ "message": "Hi", "threadId": null }).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "Hello!", "threadId": "t1" }));
    }

    #[tokio::test]
    async fn test_missing_key_is_500_without_network() {
        let mock = Arc::new(MockAssistants::new("t1", "Hello!"));
        let (status, body) = post_chat(
            app(&mock, None),
            json!({ "message": "Hi", "threadId": null }).to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "OpenAI API key not configured" }));
        assert!(mock.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_relay_errors_are_500() {
        let mock = Arc::new(MockAssistants::new("t1", "x").failing_at(FailAt::CreateRun));
        let (status, body) = post_chat(
            app(&mock, Some("sk-test")),
            json!({ "message": "Hi", "threadId": "t1" }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to create run"));

        let mock = Arc::new(
            MockAssistants::new("t1", "x").with_statuses(&[], RunStatus::Queued),
        );
        let (status, body) = post_chat(
            app(&mock, Some("sk-test")),
            json!({ "message": "Hi" }).to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Assistant response timeout" }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let mock = Arc::new(MockAssistants::new("t1", "x"));
        let (status, body) = post_chat(app(&mock, Some("sk-test")), "not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert!(mock.recorded_calls().is_empty());
    }

    #[tokio::test]
    async fn test_version() {
        let mock = Arc::new(MockAssistants::new("t1", "x"));
        let resp = app(&mock, Some("sk-test"))
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

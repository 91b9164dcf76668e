// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Hosted VLM backend tests against a local OpenAI-compatible mock server

use super::support::{hammer_claims, png_bytes, HAMMER_LABEL};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use label_verifier::vision::{VlmClient, VlmOcrProvider};
use label_verifier::{LabelVerifier, OcrError, OcrProvider};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Requests seen by the mock and the reply it gives
#[derive(Clone)]
struct MockVlm {
    hits: Arc<AtomicUsize>,
    last_auth: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<Value>>>,
    status: StatusCode,
    reply: Value,
}

impl MockVlm {
    fn new(status: StatusCode, reply: Value) -> Self {
        Self {
            hits: Arc::new(AtomicUsize::new(0)),
            last_auth: Arc::new(Mutex::new(None)),
            last_body: Arc::new(Mutex::new(None)),
            status,
            reply,
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    fn last_body(&self) -> Value {
        self.last_body.lock().unwrap().clone().expect("no request seen")
    }
}

async fn chat_completions(
    State(mock): State<MockVlm>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.hits.fetch_add(1, Ordering::SeqCst);
    *mock.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *mock.last_body.lock().unwrap() = Some(body);
    (mock.status, Json(mock.reply.clone()))
}

async fn health(State(mock): State<MockVlm>) -> StatusCode {
    mock.status
}

/// Serve the mock on an ephemeral port; returns its base URL
async fn spawn_mock(mock: MockVlm) -> String {
    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn reply_with(text: &str) -> Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": text}}],
        "usage": {"prompt_tokens": 900, "completion_tokens": 40, "total_tokens": 940}
    })
}

fn provider(endpoint: &str, api_key: Option<&str>) -> VlmOcrProvider {
    let client = VlmClient::new(endpoint, "qwen3-vl")
        .unwrap()
        .with_api_key(api_key.map(str::to_string));
    VlmOcrProvider::new(client)
}

#[cfg(test)]
mod vlm_provider_tests {
    use super::*;

    /// Test 1: Image goes out as a data URL with the label prompt
    #[tokio::test]
    async fn test_request_shape() {
        let mock = MockVlm::new(StatusCode::OK, reply_with("HAMMER WHISKEY"));
        let endpoint = spawn_mock(mock.clone()).await;

        let text = provider(&endpoint, None)
            .extract_text(&png_bytes())
            .await
            .unwrap();

        assert_eq!(text, "HAMMER WHISKEY");
        assert_eq!(mock.hits(), 1);

        let body = mock.last_body();
        assert_eq!(body["model"], "qwen3-vl");
        let content = &body["messages"][0]["content"];
        assert!(content[0]["text"]
            .as_str()
            .unwrap()
            .contains("beverage label"));
        assert!(content[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
        assert!(mock.last_auth().is_none());
    }

    /// Test 2: API key sent as a bearer token
    #[tokio::test]
    async fn test_bearer_auth() {
        let mock = MockVlm::new(StatusCode::OK, reply_with("text"));
        let endpoint = spawn_mock(mock.clone()).await;

        provider(&endpoint, Some("secret-key"))
            .extract_text(&png_bytes())
            .await
            .unwrap();

        assert_eq!(mock.last_auth().as_deref(), Some("Bearer secret-key"));
    }

    /// Test 3: Remote error status is an extraction failure
    #[tokio::test]
    async fn test_http_error_status() {
        let mock = MockVlm::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "model overloaded"}),
        );
        let endpoint = spawn_mock(mock.clone()).await;

        let err = provider(&endpoint, None)
            .extract_text(&png_bytes())
            .await
            .unwrap_err();

        match err {
            OcrError::Extraction { backend, message } => {
                assert_eq!(backend, "vlm");
                assert!(message.contains("500"), "{}", message);
            }
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    /// Test 4: Null reply content reads as empty text
    #[tokio::test]
    async fn test_null_content_is_empty_text() {
        let mock = MockVlm::new(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        );
        let endpoint = spawn_mock(mock).await;

        let text = provider(&endpoint, None)
            .extract_text(&png_bytes())
            .await
            .unwrap();
        assert!(text.is_empty());
    }

    /// Test 5: Undecodable image never reaches the service
    #[tokio::test]
    async fn test_decode_failure_no_request() {
        let mock = MockVlm::new(StatusCode::OK, reply_with("text"));
        let endpoint = spawn_mock(mock.clone()).await;

        let err = provider(&endpoint, None)
            .extract_text(b"GIF87 but not really")
            .await
            .unwrap_err();

        assert!(err.is_decode());
        assert_eq!(mock.hits(), 0);
    }

    /// Test 6: Unreachable endpoint is an extraction failure
    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let err = provider("http://127.0.0.1:1", None)
            .extract_text(&png_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, OcrError::Extraction { .. }));
    }

    /// Test 7: Full verification through the hosted backend
    #[tokio::test]
    async fn test_verify_through_vlm() {
        let mock = MockVlm::new(StatusCode::OK, reply_with(HAMMER_LABEL));
        let endpoint = spawn_mock(mock.clone()).await;

        let verifier = LabelVerifier::new(Arc::new(provider(&endpoint, None)));
        let result = verifier.verify(&hammer_claims(), &png_bytes()).await.unwrap();

        assert!(result.success);
        assert_eq!(verifier.ocr_backend(), "vlm");
        assert_eq!(mock.hits(), 1);
    }

    /// Test 8: Availability follows the service health endpoint
    #[tokio::test]
    async fn test_availability_from_health_endpoint() {
        let healthy = MockVlm::new(StatusCode::OK, reply_with("text"));
        let endpoint = spawn_mock(healthy.clone()).await;
        assert!(provider(&endpoint, None).is_available().await);

        let failing = MockVlm::new(StatusCode::SERVICE_UNAVAILABLE, json!({}));
        let endpoint = spawn_mock(failing.clone()).await;
        assert!(!provider(&endpoint, None).is_available().await);

        assert!(!provider("http://127.0.0.1:1", None).is_available().await);
        assert_eq!(healthy.hits() + failing.hits(), 0);
    }
}

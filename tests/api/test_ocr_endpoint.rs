// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! OCR endpoint tests for POST /v1/ocr

use super::support::{app, png_bytes, send, FormBody, Reply, ScriptedProvider, HAMMER_LABEL};
use axum::http::StatusCode;

#[cfg(test)]
mod ocr_endpoint_tests {
    use super::*;

    /// Test 1: Raw text with backend and timing
    #[tokio::test]
    async fn test_extract_text() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new().file("label_image", "label.png", "image/png", &png_bytes());

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/ocr")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["text"], HAMMER_LABEL);
        assert_eq!(json["backend"], "scripted");
        assert!(json["processingTimeMs"].is_u64());
        assert_eq!(provider.calls(), 1);
    }

    /// Test 2: Missing image
    #[tokio::test]
    async fn test_missing_image() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new().text("brand_name", "ignored");

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/ocr")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"]["field"], "label_image");
        assert_eq!(provider.calls(), 0);
    }

    /// Test 3: Empty image part
    #[tokio::test]
    async fn test_empty_image() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new().file("label_image", "label.png", "image/png", b"");

        let (status, _) = send(app(provider.clone()), form.into_request("/v1/ocr")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(provider.calls(), 0);
    }

    /// Test 4: Backend failure maps to 502
    #[tokio::test]
    async fn test_backend_failure() {
        let provider = ScriptedProvider::new(Reply::Fail);
        let form = FormBody::new().file("label_image", "label.gif", "image/gif", &png_bytes());

        let (status, json) = send(app(provider), form.into_request("/v1/ocr")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["message"].as_str().unwrap().contains("engine crashed"));
    }

    /// Test 5: Not multipart at all
    #[tokio::test]
    async fn test_rejects_json_body() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/v1/ocr")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(r#"{"image":"abc"}"#))
            .unwrap();

        let (status, _) = send(app(provider.clone()), request).await;

        assert!(status.is_client_error(), "got {}", status);
        assert_eq!(provider.calls(), 0);
    }
}

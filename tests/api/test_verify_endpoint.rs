// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Verify endpoint tests for POST /v1/verify
//!
//! Covers form validation, the verification response shape and the mapping
//! of OCR failures to HTTP status codes.

use super::support::{
    app, app_with_limit, hammer_form, png_bytes, send, FormBody, Reply, ScriptedProvider,
    HAMMER_LABEL,
};
use axum::http::StatusCode;

#[cfg(test)]
mod verify_endpoint_tests {
    use super::*;

    // =============================================================================
    // Successful Verification
    // =============================================================================

    /// Test 1: Matching label returns success with every check
    #[tokio::test]
    async fn test_matching_label() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let (status, json) = send(app(provider.clone()), hammer_form().into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["backend"], "scripted");
        assert_eq!(json["extractedText"], HAMMER_LABEL);

        let checks = json["checks"].as_array().unwrap();
        assert_eq!(checks.len(), 5);
        assert_eq!(checks[3]["field"], "Net Contents");
        assert_eq!(checks[3]["expected"], "750 mL");
        assert_eq!(provider.calls(), 1);
    }

    /// Test 2: Mismatch is still 200, with success false
    #[tokio::test]
    async fn test_mismatch_is_not_an_error() {
        let provider = ScriptedProvider::new(Reply::Text("HAMMER WHISKEY\nGOVERNMENT WARNING"));
        let (status, json) = send(app(provider), hammer_form().into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["checks"][0]["found"], true);
        assert_eq!(json["checks"][2]["field"], "Alcohol Content");
        assert_eq!(json["checks"][2]["found"], false);
    }

    /// Test 3: Net contents omitted means no net contents check
    #[tokio::test]
    async fn test_without_net_contents() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Kentucky Straight Bourbon Whiskey")
            .text("alcohol_content", "45")
            .text("net_contents", "")
            .text("net_contents_unit", "Select unit...")
            .file("label_image", "label.png", "image/png", &png_bytes());

        let (status, json) = send(app(provider), form.into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["checks"].as_array().unwrap().len(), 4);
    }

    // =============================================================================
    // Validation Errors (provider never called)
    // =============================================================================

    /// Test 4: Alcohol content out of range
    #[tokio::test]
    async fn test_alcohol_out_of_range() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Bourbon")
            .text("alcohol_content", "150")
            .file("label_image", "label.png", "image/png", &png_bytes());

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_type"], "validation_error");
        assert_eq!(json["details"]["field"], "alcohol_content");
        assert_eq!(provider.calls(), 0);
    }

    /// Test 5: Missing image
    #[tokio::test]
    async fn test_missing_image() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Bourbon")
            .text("alcohol_content", "45");

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"]["field"], "label_image");
        assert_eq!(provider.calls(), 0);
    }

    /// Test 6: Bare amount without a unit
    #[tokio::test]
    async fn test_bare_amount_without_unit() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Bourbon")
            .text("alcohol_content", "45")
            .text("net_contents", "750")
            .text("net_contents_unit", "Select unit...")
            .file("label_image", "label.png", "image/png", &png_bytes());

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"]["field"], "net_contents_unit");
        assert_eq!(provider.calls(), 0);
    }

    /// Test 7: Non-image upload type
    #[tokio::test]
    async fn test_wrong_content_type() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Bourbon")
            .text("alcohol_content", "45")
            .file("label_image", "label.pdf", "application/pdf", b"%PDF-1.4");

        let (status, json) = send(app(provider.clone()), form.into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("application/pdf"));
        assert_eq!(provider.calls(), 0);
    }

    /// Test 8: Body over the upload limit is refused before OCR
    #[tokio::test]
    async fn test_body_limit() {
        let provider = ScriptedProvider::new(Reply::Text(HAMMER_LABEL));
        let big = vec![0u8; 256 * 1024];
        let form = FormBody::new()
            .text("brand_name", "Hammer Whiskey")
            .text("product_type", "Bourbon")
            .text("alcohol_content", "45")
            .file("label_image", "label.png", "image/png", &big);

        let (status, _) = send(
            app_with_limit(provider.clone(), 1024),
            form.into_request("/v1/verify"),
        )
        .await;

        assert!(status.is_client_error(), "got {}", status);
        assert_eq!(provider.calls(), 0);
    }

    // =============================================================================
    // OCR Failures
    // =============================================================================

    /// Test 9: Backend failure maps to 502
    #[tokio::test]
    async fn test_extraction_failure() {
        let provider = ScriptedProvider::new(Reply::Fail);
        let (status, json) = send(app(provider), hammer_form().into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error_type"], "extraction_failed");
        assert_eq!(json["details"]["backend"], "scripted");
    }

    /// Test 10: Unavailable backend maps to 503
    #[tokio::test]
    async fn test_backend_unavailable() {
        let provider = ScriptedProvider::new(Reply::Unavailable);
        let (status, json) = send(app(provider), hammer_form().into_request("/v1/verify")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["error_type"], "service_unavailable");
    }
}

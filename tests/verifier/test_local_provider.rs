// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Local PaddleOCR backend tests
//!
//! Tests marked `#[ignore]` need the ONNX models on disk:
//! `det_model.onnx`, `rec_model.onnx` and `ppocr_keys_v1.txt` under
//! `OCR_MODEL_DIR` (default `/workspace/models/paddleocr-onnx`).
//! Run with: cargo test --test verifier_tests -- --ignored

use super::support::png_bytes;
use label_verifier::vision::ocr::LocalOcrProvider;
use label_verifier::{build_provider, OcrBackendConfig, OcrBackendKind, OcrError, OcrProvider};

fn model_dir() -> String {
    std::env::var("OCR_MODEL_DIR").unwrap_or_else(|_| "/workspace/models/paddleocr-onnx".to_string())
}

#[cfg(test)]
mod local_provider_tests {
    use super::*;

    /// Test 1: Missing model directory is reported, not papered over
    #[tokio::test]
    async fn test_missing_models_unavailable() {
        let dir = tempfile::tempdir().unwrap();

        let config = OcrBackendConfig {
            kind: OcrBackendKind::Local,
            model_dir: dir.path().join("absent").display().to_string(),
            ..OcrBackendConfig::default()
        };

        match build_provider(&config).await {
            Err(OcrError::Unavailable(msg)) => assert!(msg.contains("not found"), "{}", msg),
            Err(other) => panic!("expected unavailable, got {:?}", other),
            Ok(provider) => panic!("expected failure, built {}", provider.name()),
        }
    }

    /// Test 2: Real models load and name themselves
    #[tokio::test]
    #[ignore]
    async fn test_paddle_models_load() {
        let provider = LocalOcrProvider::paddle(model_dir())
            .await
            .expect("PaddleOCR models should load");
        assert_eq!(provider.name(), "paddleocr");
    }

    /// Test 3: A blank image reads as empty text, not an error
    #[tokio::test]
    #[ignore]
    async fn test_blank_image_yields_no_text() {
        let provider = LocalOcrProvider::paddle(model_dir())
            .await
            .expect("PaddleOCR models should load");

        let text = provider.extract_text(&png_bytes()).await.unwrap();
        assert!(text.trim().is_empty(), "unexpected text: {:?}", text);
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Builds the configured OCR backend once at startup

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::vision::ocr::{LocalOcrProvider, OcrError, OcrProvider};
use crate::vision::vlm_client::{VlmClient, VlmOcrProvider};

/// Which OCR backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrBackendKind {
    /// Offline PaddleOCR models
    Local,
    /// Hosted vision-language model
    Vlm,
}

impl FromStr for OcrBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "paddleocr" => Ok(Self::Local),
            "vlm" | "hosted" => Ok(Self::Vlm),
            other => Err(format!(
                "unknown OCR backend '{}', expected 'local' or 'vlm'",
                other
            )),
        }
    }
}

impl fmt::Display for OcrBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Vlm => write!(f, "vlm"),
        }
    }
}

/// Settings for building an OCR provider
#[derive(Debug, Clone)]
pub struct OcrBackendConfig {
    pub kind: OcrBackendKind,
    /// Directory with det_model.onnx, rec_model.onnx, ppocr_keys_v1.txt
    pub model_dir: String,
    pub vlm_endpoint: String,
    pub vlm_model: String,
    pub vlm_api_key: Option<String>,
    pub max_image_bytes: usize,
}

impl Default for OcrBackendConfig {
    fn default() -> Self {
        Self {
            kind: OcrBackendKind::Local,
            model_dir: "./models/paddleocr-onnx".to_string(),
            vlm_endpoint: "http://localhost:8081".to_string(),
            vlm_model: "qwen3-vl".to_string(),
            vlm_api_key: None,
            max_image_bytes: crate::vision::image_utils::MAX_IMAGE_SIZE,
        }
    }
}

/// Construct the provider selected by `config`
///
/// A backend that cannot be set up is reported as [`OcrError::Unavailable`];
/// there is no silent fallback to another backend.
pub async fn build_provider(config: &OcrBackendConfig) -> Result<Arc<dyn OcrProvider>, OcrError> {
    match config.kind {
        OcrBackendKind::Local => {
            let provider = LocalOcrProvider::paddle(&config.model_dir)
                .await?
                .with_max_image_bytes(config.max_image_bytes);
            tracing::info!("✅ Local OCR backend ready ({})", config.model_dir);
            Ok(Arc::new(provider))
        }
        OcrBackendKind::Vlm => {
            let client = VlmClient::new(&config.vlm_endpoint, &config.vlm_model)
                .map_err(|e| OcrError::Unavailable(format!("{:#}", e)))?
                .with_api_key(config.vlm_api_key.clone());
            let provider = VlmOcrProvider::new(client).with_max_image_bytes(config.max_image_bytes);
            tracing::info!("✅ VLM OCR backend ready ({})", config.vlm_endpoint);
            Ok(Arc::new(provider))
        }
    }
}

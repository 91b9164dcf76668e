// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR response types

use serde::{Deserialize, Serialize};

/// Response from raw label text extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    /// Full extracted text
    pub text: String,
    /// OCR backend used ("paddleocr" or "vlm")
    pub backend: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl OcrResponse {
    pub fn new(text: String, backend: &str, processing_time_ms: u64) -> Self {
        Self {
            text,
            backend: backend.to_string(),
            processing_time_ms,
        }
    }
}

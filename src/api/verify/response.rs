// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Verification response types

use serde::Serialize;

use crate::verify::VerificationResult;

/// Response body for POST /v1/verify
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    #[serde(flatten)]
    pub result: VerificationResult,
    /// OCR backend that read the label
    pub backend: String,
    pub processing_time_ms: u64,
}

impl VerifyResponse {
    pub fn new(result: VerificationResult, backend: &str, processing_time_ms: u64) -> Self {
        Self {
            result,
            backend: backend.to_string(),
            processing_time_ms,
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{info, warn};

use super::response::OcrResponse;
use crate::api::errors::ApiError;
use crate::api::form::UploadForm;
use crate::api::http_server::AppState;

/// POST /v1/ocr - Extract raw text from a label image
///
/// Operator aid for inspecting what the verifier sees. Takes the same
/// `label_image` multipart field as /v1/verify.
///
/// # Errors
/// - 400 Bad Request: missing, non-image or undecodable upload
/// - 502 Bad Gateway: OCR backend failed
pub async fn ocr_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, ApiError> {
    let mut form = UploadForm::read(multipart).await?;
    let image = form.take_image(state.max_image_bytes)?;

    let start = Instant::now();
    let text = state.ocr.extract_text(&image.data).await.map_err(|e| {
        warn!("OCR extraction failed: {}", e);
        ApiError::from(e)
    })?;
    let elapsed = start.elapsed().as_millis() as u64;

    info!(
        "OCR complete: {} chars, {}ms ({})",
        text.len(),
        elapsed,
        state.ocr.name()
    );

    Ok(Json(OcrResponse::new(text, state.ocr.name(), elapsed)))
}

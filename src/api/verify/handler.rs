// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Verification endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::request::VerifyForm;
use super::response::VerifyResponse;
use crate::api::errors::ApiError;
use crate::api::form::UploadForm;
use crate::api::http_server::AppState;

/// POST /v1/verify - Check a label image against the submitted claims
///
/// # Request (multipart/form-data)
/// - `brand_name`, `product_type`: required text
/// - `alcohol_content`: required, percent in [0, 100]
/// - `net_contents`: optional, e.g. "750 mL" or a bare "750"
/// - `net_contents_unit`: unit for a bare `net_contents`
/// - `label_image`: JPEG, PNG or GIF file
///
/// # Response
/// `VerificationResult` fields plus `backend` and `processingTimeMs`. A label
/// that fails verification is still 200 with `success: false`.
///
/// # Errors
/// - 400 Bad Request: invalid form or undecodable image
/// - 502 Bad Gateway: OCR backend failed
/// - 503 Service Unavailable: OCR backend not set up
pub async fn verify_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<VerifyResponse>, ApiError> {
    let form = VerifyForm::from(UploadForm::read(multipart).await?);
    let request = form.validate(state.max_image_bytes).map_err(|e| {
        warn!("Verification form rejected: {}", e);
        e
    })?;

    debug!(
        "Verifying '{}' against {} byte image",
        request.claims.brand_name,
        request.image.data.len()
    );

    let start = Instant::now();
    let result = state
        .verifier
        .verify(&request.claims, &request.image.data)
        .await
        .map_err(|e| {
            warn!("Label verification failed: {}", e);
            ApiError::from(e)
        })?;
    let elapsed = start.elapsed().as_millis() as u64;

    info!(
        "Verification complete: success={}, {}ms ({})",
        result.success,
        elapsed,
        state.verifier.ocr_backend()
    );

    Ok(Json(VerifyResponse::new(
        result,
        state.verifier.ocr_backend(),
        elapsed,
    )))
}

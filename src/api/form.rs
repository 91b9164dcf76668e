// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form reading shared by the upload endpoints

use axum::http::StatusCode;
use axum_extra::extract::multipart::MultipartError;
use axum_extra::extract::Multipart;
use bytes::Bytes;
use std::collections::HashMap;
use tracing::debug;

use crate::api::errors::ApiError;

/// Form field carrying the label image
pub const IMAGE_FIELD: &str = "label_image";

/// Content types accepted for label uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg", "image/gif"];

/// An uploaded file part
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ImageUpload {
    /// Reject empty, oversized or non-image uploads
    pub fn validate(&self, max_image_bytes: usize) -> Result<(), ApiError> {
        if self.data.is_empty() {
            return Err(ApiError::validation(IMAGE_FIELD, "Please upload a label image."));
        }

        if self.data.len() > max_image_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "{} is {} bytes (max: {} bytes)",
                IMAGE_FIELD,
                self.data.len(),
                max_image_bytes
            )));
        }

        let content_type = self.content_type.as_deref().unwrap_or("");
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.to_lowercase().as_str()) {
            return Err(ApiError::validation(
                IMAGE_FIELD,
                format!(
                    "Please upload an image file. Received: {}",
                    if content_type.is_empty() { "unknown" } else { content_type }
                ),
            ));
        }

        Ok(())
    }
}

/// Text fields and the image part of a submitted form
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl UploadForm {
    /// Drain a multipart body. Unknown text fields are kept; later values win.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| form_error("form data", e))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| form_error(IMAGE_FIELD, e))?;
                debug!(
                    "Received {} ({:?}, {} bytes)",
                    IMAGE_FIELD,
                    content_type,
                    data.len()
                );
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await.map_err(|e| form_error(&name, e))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text field; blank counts as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Validated image part
    pub fn take_image(&mut self, max_image_bytes: usize) -> Result<ImageUpload, ApiError> {
        let image = self
            .image
            .take()
            .ok_or_else(|| ApiError::validation(IMAGE_FIELD, "Please upload a label image."))?;
        image.validate(max_image_bytes)?;
        Ok(image)
    }
}

/// Body-limit overruns surface as 413, anything else as a bad request
fn form_error(part: &str, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(format!("{} exceeds the upload limit", part))
    } else {
        ApiError::InvalidRequest(format!("Failed to read {}: {}", part, err))
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types shared by all OCR backends

use thiserror::Error;

use crate::vision::image_utils::ImageError;

/// Errors returned by [`OcrProvider::extract_text`](super::OcrProvider::extract_text)
///
/// A label on which nothing could be read is `Ok(String::new())`, never an
/// error. These variants are infrastructure failures.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The payload could not be decoded as a raster image. Raised before any
    /// backend work starts.
    #[error("Invalid label image: {0}")]
    Decode(#[from] ImageError),

    /// The backend ran and failed (engine error, worker panic, network, remote
    /// service error, malformed reply)
    #[error("{backend} extraction failed: {message}")]
    Extraction {
        /// Backend name, e.g. "paddleocr" or "vlm"
        backend: String,
        /// Backend-specific failure description
        message: String,
    },

    /// The backend could not be set up (missing model files, bad endpoint)
    #[error("OCR backend unavailable: {0}")]
    Unavailable(String),
}

impl OcrError {
    /// Build an extraction error for the named backend
    pub fn extraction(backend: &str, message: impl ToString) -> Self {
        OcrError::Extraction {
            backend: backend.to_string(),
            message: message.to_string(),
        }
    }

    /// True when the failure happened while decoding the input
    pub fn is_decode(&self) -> bool {
        matches!(self, OcrError::Decode(_))
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR provider trait definition

use async_trait::async_trait;

use super::error::OcrError;

/// Trait for implementing OCR backends
///
/// A provider turns raw image bytes into a single best-effort text blob.
/// The verification engine only ever talks to this trait, so local and
/// hosted backends (and test doubles) are interchangeable.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    /// Extract all readable text from an encoded image
    ///
    /// # Errors
    /// - [`OcrError::Decode`] if the bytes are not a decodable raster image;
    ///   no backend work is attempted in that case
    /// - [`OcrError::Extraction`] if the backend itself failed
    async fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError>;

    /// Get the provider name for logging and responses
    fn name(&self) -> &'static str;

    /// Whether the backend can take work right now
    async fn is_available(&self) -> bool {
        true
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local, offline OCR backend
//!
//! Recognition is CPU-bound and slow, so each call is moved onto tokio's
//! blocking pool and awaited. The async runtime keeps serving other requests
//! while a label is being read.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::error::OcrError;
use super::model::{PaddleOcrModel, RecognitionEngine};
use super::provider::OcrProvider;
use crate::vision::image_utils::{decode_image_bytes_with_limit, MAX_IMAGE_SIZE};

/// OCR provider backed by an in-process recognition engine
#[derive(Clone)]
pub struct LocalOcrProvider {
    engine: Arc<dyn RecognitionEngine>,
    max_image_bytes: usize,
}

impl LocalOcrProvider {
    /// Wrap an already-loaded recognition engine
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        Self {
            engine,
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }

    /// Load PaddleOCR models from `model_dir` without blocking the runtime
    pub async fn paddle(model_dir: impl AsRef<Path>) -> Result<Self, OcrError> {
        let dir = model_dir.as_ref().to_path_buf();
        let model = tokio::task::spawn_blocking(move || PaddleOcrModel::load(&dir))
            .await
            .map_err(|e| OcrError::Unavailable(format!("model loader panicked: {}", e)))?
            .map_err(|e| OcrError::Unavailable(format!("{:#}", e)))?;

        Ok(Self::new(Arc::new(model)))
    }

    /// Override the maximum accepted payload size
    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }
}

#[async_trait]
impl OcrProvider for LocalOcrProvider {
    async fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let (image, info) = decode_image_bytes_with_limit(image_bytes, self.max_image_bytes)?;
        debug!(
            "Decoded label image: {}x{}, {} bytes",
            info.width, info.height, info.size_bytes
        );

        let engine = Arc::clone(&self.engine);
        let backend = engine.name();
        let result = tokio::task::spawn_blocking(move || engine.recognize(&image))
            .await
            .map_err(|e| OcrError::extraction(backend, format!("worker failed: {}", e)))?
            .map_err(|e| OcrError::extraction(backend, format!("{:#}", e)))?;

        info!(
            "{} OCR complete: {} regions, {:.2} confidence, {}ms",
            backend,
            result.regions.len(),
            result.confidence,
            result.processing_time_ms
        );

        Ok(result.text)
    }

    fn name(&self) -> &'static str {
        self.engine.name()
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR backends for label text extraction
//!
//! Components:
//! - `provider` - The `OcrProvider` trait every backend implements
//! - `local` - Offline PaddleOCR backend, offloaded to the blocking pool
//! - `detection` / `recognition` / `preprocessing` / `model` - The PaddleOCR pipeline
//!
//! The hosted vision-model backend lives in `vision::vlm_client`.

pub mod detection;
pub mod error;
pub mod local;
pub mod model;
pub mod preprocessing;
pub mod provider;
pub mod recognition;

pub use detection::{OcrDetectionModel, TextBox};
pub use error::OcrError;
pub use local::LocalOcrProvider;
pub use model::{OcrResult, PaddleOcrModel, RecognitionEngine, TextRegion};
pub use provider::OcrProvider;
pub use recognition::{OcrRecognitionModel, RecognizedText};

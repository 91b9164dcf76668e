// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label image reading
//!
//! This module provides:
//! - Image decoding shared by every backend
//! - The `OcrProvider` abstraction with a local PaddleOCR backend
//! - A hosted vision-language model backend
//!
//! The local backend runs on CPU and off the async runtime threads.

pub mod image_utils;
pub mod model_manager;
pub mod ocr;
pub mod vlm_client;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use model_manager::{build_provider, OcrBackendConfig, OcrBackendKind};
pub use ocr::{LocalOcrProvider, OcrError, OcrProvider};
pub use vlm_client::{VlmClient, VlmOcrProvider};

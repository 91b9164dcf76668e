// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! OCR API endpoint module
//!
//! Provides POST /v1/ocr for extracting text from label images.

pub mod handler;
pub mod response;

pub use handler::ocr_handler;
pub use response::OcrResponse;

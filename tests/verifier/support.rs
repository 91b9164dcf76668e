// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for verification tests

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use label_verifier::vision::ocr::{OcrResult, RecognitionEngine};
use label_verifier::{LabelClaims, OcrError, OcrProvider};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// OCR text of a compliant bourbon label
pub const HAMMER_LABEL: &str = "\
HAMMER WHISKEY
Kentucky Straight Bourbon Whiskey
45% Alc./Vol.
750 mL
GOVERNMENT WARNING: (1) According to the Surgeon General, women should not
drink alcoholic beverages during pregnancy because of the risk of birth defects.";

/// Same label with the ABV statement missing
pub const HAMMER_LABEL_NO_ABV: &str = "\
HAMMER WHISKEY
Kentucky Straight Bourbon Whiskey
750 mL
GOVERNMENT WARNING: (1) According to the Surgeon General...";

pub fn hammer_claims() -> LabelClaims {
    LabelClaims::new("Hammer Whiskey", "Kentucky Straight Bourbon Whiskey", 45.0)
        .with_net_contents("750 mL")
}

/// A small, valid PNG
pub fn png_bytes() -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255])));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test png");
    buffer.into_inner()
}

/// Provider that returns fixed text and counts calls
pub struct FixedTextProvider {
    text: String,
    calls: AtomicUsize,
}

impl FixedTextProvider {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrProvider for FixedTextProvider {
    async fn extract_text(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Recognition engine that returns fixed text and counts calls
pub struct StubEngine {
    text: String,
    calls: Arc<AtomicUsize>,
}

impl StubEngine {
    pub fn new(text: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                text: text.to_string(),
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl RecognitionEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn recognize(&self, _image: &DynamicImage) -> anyhow::Result<OcrResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(OcrResult {
            text: self.text.clone(),
            confidence: 0.9,
            regions: vec![],
            processing_time_ms: 1,
        })
    }
}

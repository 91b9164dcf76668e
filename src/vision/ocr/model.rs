// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end PaddleOCR pipeline: detect lines, crop, recognize, assemble text

use anyhow::Result;
use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use super::detection::{OcrDetectionModel, TextBox};
use super::preprocessing::{crop_text_region, prepare_detection_input, preprocess_for_recognition};
use super::recognition::OcrRecognitionModel;

/// File names expected inside the model directory
pub const DETECTION_MODEL_FILE: &str = "det_model.onnx";
pub const RECOGNITION_MODEL_FILE: &str = "rec_model.onnx";
pub const DICTIONARY_FILE: &str = "ppocr_keys_v1.txt";

/// Recognized lines below this confidence are dropped
const MIN_LINE_CONFIDENCE: f32 = 0.1;

/// One recognized text region
#[derive(Debug, Clone)]
pub struct TextRegion {
    pub text: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Location in detection-input coordinates
    pub bounding_box: TextBox,
}

/// Result of running the full pipeline on one image
#[derive(Debug, Clone)]
pub struct OcrResult {
    /// All regions joined in reading order, one label line per text line
    pub text: String,
    /// Average confidence over kept regions
    pub confidence: f32,
    pub regions: Vec<TextRegion>,
    pub processing_time_ms: u64,
}

/// Synchronous, CPU-bound text recognition over a decoded image
///
/// Implementations may take seconds per image and must only be called from a
/// blocking context; `LocalOcrProvider` takes care of that.
pub trait RecognitionEngine: Send + Sync + 'static {
    /// Engine name for logs and responses
    fn name(&self) -> &'static str;

    /// Recognize all text in the image
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult>;
}

/// PaddleOCR detection + recognition models, CPU only
#[derive(Debug, Clone)]
pub struct PaddleOcrModel {
    detector: OcrDetectionModel,
    recognizer: OcrRecognitionModel,
}

impl PaddleOcrModel {
    /// Load both models and the dictionary from `model_dir`
    ///
    /// Expected files: `det_model.onnx`, `rec_model.onnx`, `ppocr_keys_v1.txt`
    pub fn load<P: AsRef<Path>>(model_dir: P) -> Result<Self> {
        let dir = model_dir.as_ref();
        info!("Loading PaddleOCR models from {}", dir.display());

        let detector = OcrDetectionModel::load(dir.join(DETECTION_MODEL_FILE))?;
        let recognizer =
            OcrRecognitionModel::load(dir.join(RECOGNITION_MODEL_FILE), dir.join(DICTIONARY_FILE))?;

        info!("PaddleOCR models loaded (CPU-only)");
        Ok(Self {
            detector,
            recognizer,
        })
    }

    /// Detect and read every text line on the image
    pub fn process(&self, image: &DynamicImage) -> Result<OcrResult> {
        let start = Instant::now();

        let input = prepare_detection_input(image);
        let boxes = self.detector.detect(&input.tensor)?;

        let mut regions = Vec::with_capacity(boxes.len());
        for text_box in boxes {
            let Some(crop) = crop_text_region(image, &text_box, &input.info) else {
                continue;
            };
            let recognized = self
                .recognizer
                .recognize(&preprocess_for_recognition(&crop))?;

            if recognized.is_empty() || recognized.confidence < MIN_LINE_CONFIDENCE {
                continue;
            }

            regions.push(TextRegion {
                text: recognized.text,
                confidence: recognized.confidence,
                bounding_box: text_box,
            });
        }

        let confidence = if regions.is_empty() {
            0.0
        } else {
            regions.iter().map(|r| r.confidence).sum::<f32>() / regions.len() as f32
        };
        let text = assemble_lines(&regions);
        let processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "PaddleOCR read {} regions in {}ms",
            regions.len(),
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            confidence,
            regions,
            processing_time_ms,
        })
    }
}

impl RecognitionEngine for PaddleOcrModel {
    fn name(&self) -> &'static str {
        "paddleocr"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult> {
        self.process(image)
    }
}

/// Join regions into lines: boxes whose vertical centers sit within half a
/// box height of the line's first box share a line and are space-separated.
///
/// `regions` must already be in reading order.
pub fn assemble_lines(regions: &[TextRegion]) -> String {
    let mut lines: Vec<(f32, f32, Vec<&TextRegion>)> = Vec::new();

    for region in regions {
        let center = region.bounding_box.center_y();
        let tolerance = region.bounding_box.height / 2.0;

        let existing = lines.iter().position(|(line_center, line_tol, _)| {
            (center - *line_center).abs() <= (*line_tol).max(tolerance)
        });

        match existing {
            Some(idx) => lines[idx].2.push(region),
            None => lines.push((center, tolerance, vec![region])),
        }
    }

    lines
        .into_iter()
        .map(|(_, _, mut members)| {
            members.sort_by(|a, b| {
                a.bounding_box
                    .x
                    .partial_cmp(&b.bounding_box.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            members
                .iter()
                .map(|r| r.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

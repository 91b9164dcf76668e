// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text detection model
//!
//! Finds text lines on a letterboxed label image. The model emits a per-pixel
//! text probability map; connected regions above the threshold become boxes.

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::OCR_INPUT_SIZE;

/// Expected input size for detection model
pub const DETECTION_INPUT_SIZE: u32 = OCR_INPUT_SIZE;

/// Pixel probability above which a pixel counts as text
pub const DEFAULT_PIXEL_THRESHOLD: f32 = 0.3;

/// Minimum mean probability for a region to be kept
pub const DEFAULT_BOX_THRESHOLD: f32 = 0.5;

/// Growth factor applied to each region (DB "unclip")
pub const UNCLIP_RATIO: f32 = 1.5;

/// Regions with fewer pixels than this are noise
const MIN_REGION_PIXELS: usize = 10;

/// A detected text box in detection-input coordinates
#[derive(Debug, Clone)]
pub struct TextBox {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Mean text probability over the region (0.0-1.0)
    pub confidence: f32,
}

impl TextBox {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.confidence > 0.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Grow the box so it covers the glyph edges the probability map shrinks away
    fn unclip(self, ratio: f32, limit: f32) -> Self {
        let area = self.width * self.height;
        let perimeter = 2.0 * (self.width + self.height);
        let distance = if perimeter > 0.0 { area * ratio / perimeter } else { 0.0 };

        let x = (self.x - distance).max(0.0);
        let y = (self.y - distance).max(0.0);
        let right = (self.x + self.width + distance).min(limit);
        let bottom = (self.y + self.height + distance).min(limit);

        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
            confidence: self.confidence,
        }
    }
}

/// Pixel bounds and score accumulated while flood-filling one region
struct Region {
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
    pixels: usize,
    score_sum: f32,
}

/// PaddleOCR text detection model (CPU only)
#[derive(Clone)]
pub struct OcrDetectionModel {
    session: Arc<Mutex<Session>>,
    input_name: String,
    pixel_threshold: f32,
    box_threshold: f32,
}

impl std::fmt::Debug for OcrDetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrDetectionModel")
            .field("input_name", &self.input_name)
            .field("pixel_threshold", &self.pixel_threshold)
            .field("box_threshold", &self.box_threshold)
            .finish_non_exhaustive()
    }
}

impl OcrDetectionModel {
    /// Load the detection model (`det_model.onnx`)
    ///
    /// # Errors
    /// Returns error if the file is missing or ONNX Runtime rejects it
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("OCR detection model not found: {}", model_path.display());
        }

        info!("Loading OCR detection model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("Failed to load OCR detection model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        debug!("Detection model input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            pixel_threshold: DEFAULT_PIXEL_THRESHOLD,
            box_threshold: DEFAULT_BOX_THRESHOLD,
        })
    }

    /// Set the per-pixel threshold
    pub fn with_pixel_threshold(mut self, threshold: f32) -> Self {
        self.pixel_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Run text detection on a tensor from `preprocess_for_detection()`
    pub fn detect(&self, input: &Array4<f32>) -> Result<Vec<TextBox>> {
        let shape = input.shape();
        if shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }
        let (input_height, input_width) = (shape[2], shape[3]);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Detection session lock poisoned"))?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let probability_map = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let boxes = self.boxes_from_probability_map(
            probability_map.view(),
            input_height,
            input_width,
        )?;

        debug!("Detected {} text regions", boxes.len());
        Ok(boxes)
    }

    /// Turn a [1, 1, H, W] or [1, H, W] probability map into sorted text boxes
    fn boxes_from_probability_map(
        &self,
        output: ArrayViewD<f32>,
        input_height: usize,
        input_width: usize,
    ) -> Result<Vec<TextBox>> {
        let dims = output.shape().to_vec();
        let (map_height, map_width) = match dims.as_slice() {
            [1, 1, h, w] | [1, h, w] => (*h, *w),
            _ => anyhow::bail!("Unexpected detection output shape: {:?}", dims),
        };
        let four_d = dims.len() == 4;
        let prob_at = |x: usize, y: usize| -> f32 {
            if four_d {
                output[IxDyn(&[0, 0, y, x])]
            } else {
                output[IxDyn(&[0, y, x])]
            }
        };

        let scale_y = input_height as f32 / map_height as f32;
        let scale_x = input_width as f32 / map_width as f32;
        let limit = input_width.max(input_height) as f32;

        let mut visited = vec![false; map_width * map_height];
        let mut boxes = Vec::new();

        for y in 0..map_height {
            for x in 0..map_width {
                if visited[y * map_width + x] || prob_at(x, y) < self.pixel_threshold {
                    continue;
                }

                let region = self.flood_fill(&prob_at, &mut visited, x, y, map_width, map_height);
                if region.pixels < MIN_REGION_PIXELS {
                    continue;
                }

                let confidence = region.score_sum / region.pixels as f32;
                if confidence < self.box_threshold {
                    continue;
                }

                let text_box = TextBox {
                    x: region.min_x as f32 * scale_x,
                    y: region.min_y as f32 * scale_y,
                    width: (region.max_x - region.min_x + 1) as f32 * scale_x,
                    height: (region.max_y - region.min_y + 1) as f32 * scale_y,
                    confidence,
                }
                .unclip(UNCLIP_RATIO, limit);

                if text_box.is_valid() {
                    boxes.push(text_box);
                }
            }
        }

        sort_reading_order(&mut boxes);
        Ok(boxes)
    }

    /// 4-connected flood fill over pixels above the pixel threshold
    fn flood_fill(
        &self,
        prob_at: &impl Fn(usize, usize) -> f32,
        visited: &mut [bool],
        start_x: usize,
        start_y: usize,
        width: usize,
        height: usize,
    ) -> Region {
        let mut region = Region {
            min_x: start_x,
            max_x: start_x,
            min_y: start_y,
            max_y: start_y,
            pixels: 0,
            score_sum: 0.0,
        };
        let mut stack = vec![(start_x, start_y)];

        while let Some((x, y)) = stack.pop() {
            let idx = y * width + x;
            if visited[idx] {
                continue;
            }
            let prob = prob_at(x, y);
            if prob < self.pixel_threshold {
                continue;
            }

            visited[idx] = true;
            region.pixels += 1;
            region.score_sum += prob;
            region.min_x = region.min_x.min(x);
            region.max_x = region.max_x.max(x);
            region.min_y = region.min_y.min(y);
            region.max_y = region.max_y.max(y);

            if x > 0 {
                stack.push((x - 1, y));
            }
            if x + 1 < width {
                stack.push((x + 1, y));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
            if y + 1 < height {
                stack.push((x, y + 1));
            }
        }

        region
    }
}

/// Sort boxes top to bottom, then left to right
pub fn sort_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });
}

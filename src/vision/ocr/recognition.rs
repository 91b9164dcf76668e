// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text recognition model
//!
//! Reads the characters of one cropped text line. Output is a per-timestep
//! distribution over the character dictionary, decoded greedily (CTC).

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::REC_INPUT_HEIGHT;

/// Recognition model input height
pub const RECOGNITION_INPUT_HEIGHT: u32 = REC_INPUT_HEIGHT;

/// CTC blank token index
const BLANK_INDEX: usize = 0;

/// Recognized text with confidence score
#[derive(Debug, Clone)]
pub struct RecognizedText {
    pub text: String,
    /// Mean probability of the emitted characters (0.0-1.0)
    pub confidence: f32,
}

impl RecognizedText {
    pub fn new(text: String, confidence: f32) -> Self {
        Self { text, confidence }
    }

    /// Check if the text is empty or whitespace only
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// PaddleOCR text recognition model (CPU only)
#[derive(Clone)]
pub struct OcrRecognitionModel {
    session: Arc<Mutex<Session>>,
    /// Index 0 is the CTC blank; the last entry is the space character
    dictionary: Arc<Vec<char>>,
    input_name: String,
}

impl std::fmt::Debug for OcrRecognitionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrRecognitionModel")
            .field("dictionary_size", &self.dictionary.len())
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl OcrRecognitionModel {
    /// Load the recognition model (`rec_model.onnx`) and its character dictionary
    ///
    /// # Errors
    /// Returns error if either file is missing or ONNX Runtime rejects the model
    pub fn load<P: AsRef<Path>>(model_path: P, dict_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();
        let dict_path = dict_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("OCR recognition model not found: {}", model_path.display());
        }
        if !dict_path.exists() {
            anyhow::bail!("OCR character dictionary not found: {}", dict_path.display());
        }

        info!("Loading OCR recognition model from {}", model_path.display());

        let file = File::open(dict_path)
            .with_context(|| format!("Failed to open dictionary: {}", dict_path.display()))?;
        let dictionary = parse_dictionary(BufReader::new(file))?;
        info!("Loaded character dictionary with {} entries", dictionary.len());

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
                format!("Failed to load OCR recognition model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        debug!("Recognition model input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            dictionary: Arc::new(dictionary),
            input_name,
        })
    }

    pub fn dictionary_size(&self) -> usize {
        self.dictionary.len()
    }

    /// Recognize one text line from a tensor built by `preprocess_for_recognition()`
    pub fn recognize(&self, input: &Array4<f32>) -> Result<RecognizedText> {
        let shape = input.shape();
        if shape[0] != 1
            || shape[1] != 3
            || shape[2] != RECOGNITION_INPUT_HEIGHT as usize
            || shape[3] < 4
        {
            anyhow::bail!(
                "Invalid input shape: {:?}, expected [1, 3, {}, W>=4]",
                shape,
                RECOGNITION_INPUT_HEIGHT
            );
        }

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Recognition session lock poisoned"))?;

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Recognition inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        ctc_greedy_decode(output_tensor.view(), &self.dictionary)
    }
}

/// Parse a PaddleOCR character dictionary, one character per line
///
/// Index 0 is reserved for the CTC blank and a trailing space entry is
/// appended, matching how the PP-OCR English models were trained.
pub fn parse_dictionary<R: BufRead>(reader: R) -> Result<Vec<char>> {
    let mut dictionary = vec!['\u{0}'];

    for line in reader.lines() {
        let line = line.context("Failed to read dictionary line")?;
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(ch) = line.chars().next() {
            dictionary.push(ch);
        }
    }

    dictionary.push(' ');
    Ok(dictionary)
}

/// Greedy CTC decoding: best class per timestep, collapse repeats, drop blanks
///
/// Accepts `[1, T, C]` or `[T, C]` shaped output.
pub fn ctc_greedy_decode(output: ArrayViewD<f32>, dictionary: &[char]) -> Result<RecognizedText> {
    let dims = output.shape().to_vec();
    let (seq_len, num_classes, batched) = match dims.as_slice() {
        [1, t, c] => (*t, *c, true),
        [t, c] => (*t, *c, false),
        _ => anyhow::bail!("Unexpected recognition output shape: {:?}", dims),
    };

    let mut text = String::new();
    let mut score_sum = 0.0f32;
    let mut emitted = 0usize;
    let mut prev_index: Option<usize> = None;

    for t in 0..seq_len {
        let (best_index, best_prob) = (0..num_classes)
            .map(|c| {
                let prob = if batched {
                    output[IxDyn(&[0, t, c])]
                } else {
                    output[IxDyn(&[t, c])]
                };
                (c, prob)
            })
            .fold((BLANK_INDEX, f32::NEG_INFINITY), |best, cur| {
                if cur.1 > best.1 {
                    cur
                } else {
                    best
                }
            });

        if best_index != BLANK_INDEX && Some(best_index) != prev_index {
            if let Some(ch) = dictionary.get(best_index) {
                text.push(*ch);
                score_sum += best_prob;
                emitted += 1;
            }
        }

        prev_index = (best_index != BLANK_INDEX).then_some(best_index);
    }

    let confidence = if emitted == 0 {
        0.0
    } else {
        (score_sum / emitted as f32).clamp(0.0, 1.0)
    };

    Ok(RecognizedText::new(text.trim().to_string(), confidence))
}

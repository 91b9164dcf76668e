// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label claim verification
//!
//! Takes the submitter's claims and a label image, reads the label through an
//! `OcrProvider`, and reports per field whether the claim appears on it.

pub mod engine;
pub mod matching;
pub mod types;

pub use engine::{check_claims, LabelVerifier};
pub use types::{FieldCheck, LabelClaims, LabelField, VerificationResult};

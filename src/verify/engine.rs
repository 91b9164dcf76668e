// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label verification engine

use std::sync::Arc;
use tracing::{debug, info};

use super::matching::{
    alcohol_found, contains_normalized, government_warning_found, net_contents_found, normalize,
    render_alcohol,
};
use super::types::{FieldCheck, LabelClaims, LabelField, VerificationResult};
use crate::vision::ocr::{OcrError, OcrProvider};

/// Expected-value text shown for the government warning check
pub const WARNING_EXPECTED: &str = "Present";

/// Checks a label image against the submitter's claims
///
/// Holds no per-call state; clones share the same OCR provider and may run
/// concurrently.
#[derive(Clone)]
pub struct LabelVerifier {
    ocr: Arc<dyn OcrProvider>,
}

impl LabelVerifier {
    pub fn new(ocr: Arc<dyn OcrProvider>) -> Self {
        Self { ocr }
    }

    /// Name of the OCR backend in use
    pub fn ocr_backend(&self) -> &'static str {
        self.ocr.name()
    }

    /// Read the label once and check every claimed field against the text
    ///
    /// # Errors
    /// OCR failures (undecodable image, backend error) are returned unchanged.
    /// A claim missing from the label is not an error; it is a check with
    /// `found == false`.
    pub async fn verify(
        &self,
        claims: &LabelClaims,
        image_bytes: &[u8],
    ) -> Result<VerificationResult, OcrError> {
        let extracted_text = self.ocr.extract_text(image_bytes).await?;
        debug!(
            "{} extracted {} chars of label text",
            self.ocr.name(),
            extracted_text.len()
        );

        let result = check_claims(claims, extracted_text);

        info!(
            "Verified label for '{}': success={}, {} of {} checks found",
            claims.brand_name,
            result.success,
            result.checks.iter().filter(|c| c.found).count(),
            result.checks.len()
        );

        Ok(result)
    }
}

/// Evaluate all field checks against already-extracted text
///
/// Order: Brand Name, Product Type, Alcohol Content, Net Contents (only if
/// claimed), Government Warning.
pub fn check_claims(claims: &LabelClaims, extracted_text: String) -> VerificationResult {
    let normalized = normalize(&extracted_text);
    let mut checks = Vec::with_capacity(5);

    checks.push(FieldCheck::new(
        LabelField::BrandName,
        claims.brand_name.clone(),
        contains_normalized(&normalized, &claims.brand_name),
    ));

    checks.push(FieldCheck::new(
        LabelField::ProductType,
        claims.product_type.clone(),
        contains_normalized(&normalized, &claims.product_type),
    ));

    let numeral = render_alcohol(claims.alcohol_content);
    checks.push(FieldCheck::new(
        LabelField::AlcoholContent,
        format!("{}%", numeral),
        alcohol_found(&extracted_text, &numeral),
    ));

    if let Some(net_contents) = claims.claimed_net_contents() {
        checks.push(FieldCheck::new(
            LabelField::NetContents,
            net_contents,
            net_contents_found(&extracted_text, &normalized, net_contents),
        ));
    }

    checks.push(FieldCheck::new(
        LabelField::GovernmentWarning,
        WARNING_EXPECTED,
        government_warning_found(&normalized),
    ));

    VerificationResult::from_checks(checks, extracted_text)
}

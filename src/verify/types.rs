// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Claims, per-field verdicts and the verification result

use serde::{Deserialize, Serialize};
use std::fmt;

/// Facts the submitter declares about their label
///
/// Range checks (alcohol in [0, 100], non-empty names) are the caller's job;
/// the engine takes claims as given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelClaims {
    pub brand_name: String,
    pub product_type: String,
    /// Alcohol by volume, percent
    pub alcohol_content: f64,
    /// Volume with unit, e.g. "750 mL"
    #[serde(default)]
    pub net_contents: Option<String>,
}

impl LabelClaims {
    pub fn new(
        brand_name: impl Into<String>,
        product_type: impl Into<String>,
        alcohol_content: f64,
    ) -> Self {
        Self {
            brand_name: brand_name.into(),
            product_type: product_type.into(),
            alcohol_content,
            net_contents: None,
        }
    }

    pub fn with_net_contents(mut self, net_contents: impl Into<String>) -> Self {
        self.net_contents = Some(net_contents.into());
        self
    }

    /// Net contents claim, if one was actually made (blank counts as none)
    pub fn claimed_net_contents(&self) -> Option<&str> {
        self.net_contents
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The label fields the engine checks, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelField {
    BrandName,
    ProductType,
    AlcoholContent,
    NetContents,
    GovernmentWarning,
}

impl LabelField {
    pub fn display_name(&self) -> &'static str {
        match self {
            LabelField::BrandName => "Brand Name",
            LabelField::ProductType => "Product Type",
            LabelField::AlcoholContent => "Alcohol Content",
            LabelField::NetContents => "Net Contents",
            LabelField::GovernmentWarning => "Government Warning",
        }
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for LabelField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// One claim-vs-evidence verdict
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldCheck {
    pub field: LabelField,
    /// Human-readable rendering of what was claimed
    pub expected: String,
    /// Whether supporting evidence was found in the extracted text
    pub found: bool,
}

impl FieldCheck {
    pub fn new(field: LabelField, expected: impl Into<String>, found: bool) -> Self {
        Self {
            field,
            expected: expected.into(),
            found,
        }
    }
}

/// Outcome of one `verify()` call
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// True iff every check was found
    pub success: bool,
    pub checks: Vec<FieldCheck>,
    /// Raw OCR output, kept for operator review
    pub extracted_text: String,
}

impl VerificationResult {
    /// Assemble a result; `success` is derived from the checks
    pub fn from_checks(checks: Vec<FieldCheck>, extracted_text: String) -> Self {
        Self {
            success: checks.iter().all(|c| c.found),
            checks,
            extracted_text,
        }
    }

    pub fn check(&self, field: LabelField) -> Option<&FieldCheck> {
        self.checks.iter().find(|c| c.field == field)
    }

    /// Checks that did not find their claim on the label
    pub fn failed_checks(&self) -> impl Iterator<Item = &FieldCheck> {
        self.checks.iter().filter(|c| !c.found)
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Verification form fields and validation

use crate::api::errors::ApiError;
use crate::api::form::{ImageUpload, UploadForm, IMAGE_FIELD};
use crate::verify::LabelClaims;

/// Placeholder the form's unit selector submits when nothing was chosen
pub const UNIT_PLACEHOLDER: &str = "Select unit...";

/// Raw fields of a verification submission
#[derive(Debug, Clone, Default)]
pub struct VerifyForm {
    pub brand_name: Option<String>,
    pub product_type: Option<String>,
    pub alcohol_content: Option<String>,
    pub net_contents: Option<String>,
    pub net_contents_unit: Option<String>,
    pub label_image: Option<ImageUpload>,
}

/// A submission that passed validation
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub claims: LabelClaims,
    pub image: ImageUpload,
}

impl From<UploadForm> for VerifyForm {
    fn from(mut form: UploadForm) -> Self {
        let text = |form: &UploadForm, name: &str| form.text(name).map(str::to_string);
        Self {
            brand_name: text(&form, "brand_name"),
            product_type: text(&form, "product_type"),
            alcohol_content: text(&form, "alcohol_content"),
            net_contents: text(&form, "net_contents"),
            net_contents_unit: text(&form, "net_contents_unit"),
            label_image: form.image.take(),
        }
    }
}

impl VerifyForm {
    /// Check the submission and build the claims handed to the engine
    pub fn validate(self, max_image_bytes: usize) -> Result<VerifyRequest, ApiError> {
        let brand_name = self
            .brand_name
            .ok_or_else(|| ApiError::validation("brand_name", "Brand name is required."))?;
        let product_type = self
            .product_type
            .ok_or_else(|| ApiError::validation("product_type", "Product type is required."))?;

        let alcohol_content = parse_alcohol_content(self.alcohol_content.as_deref())?;

        let image = self
            .label_image
            .ok_or_else(|| ApiError::validation(IMAGE_FIELD, "Please upload a label image."))?;

        let net_contents =
            compose_net_contents(self.net_contents.as_deref(), self.net_contents_unit.as_deref())?;

        image.validate(max_image_bytes)?;

        let mut claims = LabelClaims::new(brand_name, product_type, alcohol_content);
        claims.net_contents = net_contents;

        Ok(VerifyRequest { claims, image })
    }
}

/// Alcohol by volume, percent, within [0, 100]
fn parse_alcohol_content(raw: Option<&str>) -> Result<f64, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::validation("alcohol_content", "Alcohol content is required."))?;
    let value: f64 = raw.parse().map_err(|_| {
        ApiError::validation(
            "alcohol_content",
            format!("Alcohol content must be a number, got '{}'.", raw),
        )
    })?;

    if !(0.0..=100.0).contains(&value) {
        return Err(ApiError::validation(
            "alcohol_content",
            "Alcohol content must be between 0 and 100%.",
        ));
    }

    Ok(value)
}

/// Net contents claim with its unit attached
///
/// A bare amount ("750") needs a unit from the selector; an amount that
/// already carries a unit ("750 mL") is taken as typed.
fn compose_net_contents(
    amount: Option<&str>,
    unit: Option<&str>,
) -> Result<Option<String>, ApiError> {
    let Some(amount) = amount else {
        return Ok(None);
    };

    if !is_bare_amount(amount) {
        return Ok(Some(amount.to_string()));
    }

    match unit.filter(|u| *u != UNIT_PLACEHOLDER) {
        Some(unit) => Ok(Some(format!("{} {}", amount, unit))),
        None => Err(ApiError::validation(
            "net_contents_unit",
            "Please select a unit for net contents.",
        )),
    }
}

fn is_bare_amount(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
}

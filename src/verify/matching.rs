// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text matching rules for each label field
//!
//! OCR output drops and inserts spaces unpredictably, so names are compared
//! on a normalized form (lower-case, no whitespace). Numbers are matched on
//! the raw text with patterns tolerant of how labels actually print them.

use regex::Regex;
use std::sync::OnceLock;

/// Suffixes accepted after an alcohol numeral. "proof" is matched as the
/// same literal numeral, not converted to ABV.
const ALCOHOL_SUFFIXES: &str = r"(?:%|alc|abv|alcohol|proof)";

/// Most whitespace characters allowed between a volume and its unit
const MAX_UNIT_GAP: usize = 3;

/// Volume must not continue a longer number (the "750" in "1750" or "1.750").
/// A period after a word ("CONTENTS.750") still starts a new token.
const VOLUME_START: &str = r"(?:^|[^0-9.]|^\.|[^0-9]\.)";

/// Lower-case and strip every whitespace character
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Claim appears in the normalized text, ignoring case and spacing
pub fn contains_normalized(normalized_text: &str, claim: &str) -> bool {
    normalized_text.contains(&normalize(claim))
}

/// Render an ABV claim the way labels print it: 45.0 -> "45", 45.5 -> "45.5"
pub fn render_alcohol(alcohol_content: f64) -> String {
    if alcohol_content.fract() == 0.0 {
        format!("{}", alcohol_content as i64)
    } else {
        format!("{}", alcohol_content)
    }
}

/// Numeral followed by %, alc, abv, alcohol or proof (any case, optional space)
///
/// Only what follows the numeral is constrained, so "145%" also carries "45".
pub fn alcohol_found(text: &str, numeral: &str) -> bool {
    let pattern = format!(r"(?i){}\s*{}", regex::escape(numeral), ALCOHOL_SUFFIXES);
    compile(&pattern).is_match(text)
}

/// Canonical volume unit of a net contents claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeUnit {
    Milliliters,
    Liters,
    FluidOunces,
    /// Unrecognized unit, matched literally
    Other(String),
}

impl VolumeUnit {
    /// Normalize a unit token: case, periods and spaces are ignored
    pub fn parse(unit: &str) -> Self {
        let key: String = unit
            .chars()
            .filter(|c| *c != '.' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "ml" => VolumeUnit::Milliliters,
            "l" => VolumeUnit::Liters,
            "oz" | "floz" => VolumeUnit::FluidOunces,
            _ => VolumeUnit::Other(unit.trim().to_string()),
        }
    }

    /// Regex fragment matching the unit's common spellings as a whole token
    fn pattern(&self) -> String {
        match self {
            VolumeUnit::Milliliters => r"(?:ml|millilit(?:er|re)s?)\b".to_string(),
            VolumeUnit::Liters => r"(?:l|lit(?:er|re)s?)\b".to_string(),
            VolumeUnit::FluidOunces => r"(?:fl\.?\s?)?oz\b".to_string(),
            VolumeUnit::Other(unit) => {
                let escaped = regex::escape(unit);
                if unit.ends_with(|c: char| c.is_alphanumeric()) {
                    format!(r"{}\b", escaped)
                } else {
                    escaped
                }
            }
        }
    }
}

/// A net contents claim split into numeral and unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetContents {
    /// Numeral exactly as claimed, e.g. "750" or "1.75"
    pub amount: String,
    pub unit: VolumeUnit,
}

impl NetContents {
    /// Parse "digits[.digits] unit"; `None` if the claim has another shape
    pub fn parse(claim: &str) -> Option<Self> {
        static CLAIM_PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = CLAIM_PATTERN.get_or_init(|| {
            Regex::new(r"^\s*(\d+(?:\.\d*)?)\s*([A-Za-z][A-Za-z.\s]*?)\s*$")
                .expect("net contents claim pattern is valid")
        });

        let caps = re.captures(claim)?;
        let amount = caps.get(1)?.as_str().trim_end_matches('.').to_string();
        let unit = VolumeUnit::parse(caps.get(2)?.as_str());
        Some(Self { amount, unit })
    }

    /// Pattern requiring numeral and unit as whole tokens, at most
    /// `MAX_UNIT_GAP` whitespace characters apart
    pub fn pattern(&self) -> String {
        format!(
            r"(?i){}{}\s{{0,{}}}{}",
            VOLUME_START,
            regex::escape(&self.amount),
            MAX_UNIT_GAP,
            self.unit.pattern()
        )
    }
}

/// Net contents claim is on the label
///
/// Claims that do not parse as numeral + unit fall back to the normalized
/// substring rule used for names.
pub fn net_contents_found(text: &str, normalized_text: &str, claim: &str) -> bool {
    match NetContents::parse(claim) {
        Some(net) => compile(&net.pattern()).is_match(text),
        None => contains_normalized(normalized_text, claim),
    }
}

/// Both "government" and "warning" occur somewhere in the normalized text
pub fn government_warning_found(normalized_text: &str) -> bool {
    normalized_text.contains("government") && normalized_text.contains("warning")
}

/// Claim text only ever reaches a pattern through `regex::escape`
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("label patterns are built from escaped claims")
}

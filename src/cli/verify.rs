// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::verify::{LabelClaims, LabelVerifier, VerificationResult};
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::model_manager::{build_provider, OcrBackendConfig, OcrBackendKind};
use crate::vision::ocr::OcrProvider;

/// OCR backend selection shared by all commands
#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// OCR backend (local/vlm)
    #[arg(long, env = "OCR_BACKEND", default_value = "local")]
    pub backend: OcrBackendKind,

    /// Directory holding the PaddleOCR ONNX models
    #[arg(long, env = "OCR_MODEL_DIR", default_value = "./models/paddleocr-onnx")]
    pub model_dir: String,

    /// Base URL of the OpenAI-compatible vision endpoint
    #[arg(long, env = "VLM_ENDPOINT", default_value = "http://localhost:8081")]
    pub vlm_endpoint: String,

    /// Vision model name sent to the endpoint
    #[arg(long, env = "VLM_MODEL", default_value = "qwen3-vl")]
    pub vlm_model: String,

    /// Bearer token for the vision endpoint
    #[arg(long, env = "VLM_API_KEY", hide_env_values = true)]
    pub vlm_api_key: Option<String>,

    /// Largest accepted image, in bytes
    #[arg(long, env = "MAX_IMAGE_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_image_bytes: usize,
}

impl BackendArgs {
    pub fn to_config(&self) -> OcrBackendConfig {
        OcrBackendConfig {
            kind: self.backend,
            model_dir: self.model_dir.clone(),
            vlm_endpoint: self.vlm_endpoint.clone(),
            vlm_model: self.vlm_model.clone(),
            vlm_api_key: self.vlm_api_key.clone().filter(|k| !k.is_empty()),
            max_image_bytes: self.max_image_bytes,
        }
    }

    async fn provider(&self) -> Result<Arc<dyn OcrProvider>> {
        build_provider(&self.to_config())
            .await
            .with_context(|| format!("Failed to set up {} OCR backend", self.backend))
    }
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Label image (JPEG, PNG, GIF or WebP)
    #[arg(long)]
    pub image: PathBuf,

    /// Brand name claimed on the application
    #[arg(long)]
    pub brand_name: String,

    /// Product class/type, e.g. "Kentucky Straight Bourbon Whiskey"
    #[arg(long)]
    pub product_type: String,

    /// Alcohol by volume, percent
    #[arg(long)]
    pub alcohol_content: f64,

    /// Net contents with unit, e.g. "750 mL"
    #[arg(long)]
    pub net_contents: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Label image (JPEG, PNG, GIF or WebP)
    #[arg(long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub backend: BackendArgs,
}

/// Verify a label image against the given claims
///
/// Fails (non-zero exit) when any check is not found on the label.
pub async fn verify_label(args: VerifyArgs) -> Result<()> {
    if !(0.0..=100.0).contains(&args.alcohol_content) {
        return Err(anyhow!(
            "Alcohol content must be between 0 and 100%, got {}",
            args.alcohol_content
        ));
    }

    let image = read_image(&args.image).await?;
    let verifier = LabelVerifier::new(args.backend.provider().await?);

    let mut claims = LabelClaims::new(args.brand_name, args.product_type, args.alcohol_content);
    claims.net_contents = args.net_contents;

    let result = verifier.verify(&claims, &image).await?;
    info!(
        "Verified {} with {} backend",
        args.image.display(),
        verifier.ocr_backend()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_report(&result));
    }

    if result.success {
        Ok(())
    } else {
        Err(anyhow!(
            "Label verification failed: {} of {} checks not found",
            result.failed_checks().count(),
            result.checks.len()
        ))
    }
}

/// Print the raw text the configured backend reads from an image
pub async fn extract_text(args: ExtractArgs) -> Result<()> {
    let image = read_image(&args.image).await?;
    let provider = args.backend.provider().await?;

    let text = provider.extract_text(&image).await?;
    info!(
        "Extracted {} chars from {} with {}",
        text.len(),
        args.image.display(),
        provider.name()
    );

    println!("{}", text);
    Ok(())
}

async fn read_image(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))
}

/// Per-field table of a verification result
pub fn format_report(result: &VerificationResult) -> String {
    let width = result
        .checks
        .iter()
        .map(|c| c.field.display_name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for check in &result.checks {
        let mark = if check.found { "✓" } else { "✗" };
        out.push_str(&format!(
            "{} {:<width$}  {}\n",
            mark,
            check.field.display_name(),
            check.expected,
            width = width
        ));
    }

    out.push_str(if result.success {
        "\n✅ Label matches all claims\n"
    } else {
        "\n❌ Label does not match all claims\n"
    });
    out
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use label_verifier::{
    api::{start_server, AppState},
    config::AppConfig,
    version,
    vision::build_provider,
};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Label Verifier...\n");
    println!("📦 BUILD VERSION: {}", version::VERSION);
    println!("📅 Build Date: {}", version::BUILD_DATE);
    println!();

    let config = AppConfig::from_env().context("Invalid configuration")?;

    println!("🔎 Initializing {} OCR backend...", config.ocr.kind);
    let provider = build_provider(&config.ocr)
        .await
        .with_context(|| format!("Failed to set up {} OCR backend", config.ocr.kind))?;
    println!("✅ OCR backend ready: {}", provider.name());

    let state = AppState::new(provider).with_max_image_bytes(config.ocr.max_image_bytes);

    println!(
        "🌐 API server on http://{}:{} (max upload {} bytes)",
        config.api_host, config.api_port, config.ocr.max_image_bytes
    );
    start_server(&config, state).await?;

    println!("👋 Label Verifier stopped");
    Ok(())
}

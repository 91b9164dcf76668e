// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::ocr::ocr_handler;
use super::verify::verify_handler;
use crate::config::AppConfig;
use crate::verify::LabelVerifier;
use crate::version;
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::ocr::OcrProvider;

/// Room for the text fields and multipart framing on top of the image itself
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub verifier: LabelVerifier,
    pub ocr: Arc<dyn OcrProvider>,
    /// Largest accepted label image
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(ocr: Arc<dyn OcrProvider>) -> Self {
        Self {
            verifier: LabelVerifier::new(ocr.clone()),
            ocr,
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: serde_json::Value,
    pub ocr_backend: String,
    pub ocr_available: bool,
}

/// Build the API router; bodies above the state's image limit are refused
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/verify", post(verify_handler))
        .route("/v1/ocr", post(ocr_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &AppConfig, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ocr_available = state.ocr.is_available().await;
    if !ocr_available {
        tracing::warn!("OCR backend {} is not available", state.ocr.name());
    }

    Json(HealthResponse {
        status: if ocr_available { "ok" } else { "degraded" }.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        build: version::get_version_info(),
        ocr_backend: state.ocr.name().to_string(),
        ocr_available,
    })
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration loaded from environment variables

use anyhow::{anyhow, Result};
use std::env;
use std::net::SocketAddr;

use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::model_manager::{OcrBackendConfig, OcrBackendKind};

/// Configuration for the label verification service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface the HTTP API binds to
    pub api_host: String,
    pub api_port: u16,
    /// OCR backend settings
    pub ocr: OcrBackendConfig,
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let kind = match lookup("OCR_BACKEND") {
            Some(value) => value.parse::<OcrBackendKind>().map_err(|e| anyhow!(e))?,
            None => defaults.ocr.kind,
        };

        let config = Self {
            api_host: lookup("API_HOST").unwrap_or(defaults.api_host),
            api_port: lookup("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.api_port),
            ocr: OcrBackendConfig {
                kind,
                model_dir: lookup("OCR_MODEL_DIR").unwrap_or(defaults.ocr.model_dir),
                vlm_endpoint: lookup("VLM_ENDPOINT").unwrap_or(defaults.ocr.vlm_endpoint),
                vlm_model: lookup("VLM_MODEL").unwrap_or(defaults.ocr.vlm_model),
                vlm_api_key: lookup("VLM_API_KEY").filter(|k| !k.is_empty()),
                max_image_bytes: lookup("MAX_IMAGE_BYTES")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ocr.max_image_bytes),
            },
        };

        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_port == 0 {
            return Err("API_PORT must be greater than 0".to_string());
        }
        if self.ocr.max_image_bytes == 0 {
            return Err("MAX_IMAGE_BYTES must be greater than 0".to_string());
        }
        if self.ocr.kind == OcrBackendKind::Vlm && self.ocr.vlm_endpoint.trim().is_empty() {
            return Err("VLM_ENDPOINT is required for the vlm backend".to_string());
        }
        Ok(())
    }

    /// Socket address for the HTTP API
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.api_host, self.api_port)
            .parse()
            .map_err(|e| anyhow!("Invalid API address {}:{}: {}", self.api_host, self.api_port, e))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_host: "127.0.0.1".to_string(),
            api_port: 8080,
            ocr: OcrBackendConfig {
                max_image_bytes: MAX_IMAGE_SIZE,
                ..OcrBackendConfig::default()
            },
        }
    }
}

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted vision-language model OCR backend via an OpenAI-compatible API

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::vision::image_utils::{decode_image_bytes_with_limit, to_data_url, MAX_IMAGE_SIZE};
use crate::vision::ocr::{OcrError, OcrProvider};

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// Reply text of the first choice; empty when missing or null
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

/// Result from VLM-based OCR
pub struct VlmOcrResult {
    pub text: String,
    pub model: String,
    pub processing_time_ms: u64,
    pub tokens_used: u32,
}

/// Fixed instruction sent with every label image
pub const LABEL_OCR_PROMPT: &str = "Extract all text visible on this beverage label, including brand, type, ABV, volume, warnings.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a vision-language model behind an OpenAI-compatible API
pub struct VlmClient {
    client: Client,
    endpoint: String,
    model_name: String,
    api_key: Option<String>,
}

impl VlmClient {
    pub fn new(endpoint: &str, model_name: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "VLM client configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
            api_key: None,
        })
    }

    /// Send a bearer token with each request (hosted providers)
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    /// Check if the VLM service answers its health endpoint
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("VLM health check failed: {}", e);
                false
            }
        }
    }

    /// Ask the model to transcribe a label image given as a `data:` URL
    pub async fn ocr(&self, data_url: &str) -> Result<VlmOcrResult> {
        let start = Instant::now();

        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": LABEL_OCR_PROMPT},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]),
            }],
            max_tokens: 4096,
            temperature: 0.1,
        };

        let mut builder = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.context("VLM request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("VLM returned HTTP {}: {}", status.as_u16(), body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Malformed VLM response")?;
        let tokens_used = chat_response
            .usage
            .as_ref()
            .map(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(VlmOcrResult {
            text: chat_response.into_text(),
            model: self.model_name.clone(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            tokens_used,
        })
    }
}

/// OCR provider that delegates to a hosted vision-language model
pub struct VlmOcrProvider {
    client: VlmClient,
    max_image_bytes: usize,
}

impl VlmOcrProvider {
    pub fn new(client: VlmClient) -> Self {
        Self {
            client,
            max_image_bytes: MAX_IMAGE_SIZE,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }
}

#[async_trait]
impl OcrProvider for VlmOcrProvider {
    async fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        let (_, info) = decode_image_bytes_with_limit(image_bytes, self.max_image_bytes)?;
        let data_url = to_data_url(image_bytes, &info);

        let result = self.client.ocr(&data_url).await.map_err(|e| {
            warn!("VLM OCR failed: {:#}", e);
            OcrError::extraction(self.name(), format!("{:#}", e))
        })?;

        info!(
            "VLM OCR complete: {} chars, {} tokens, {}ms (model: {})",
            result.text.len(),
            result.tokens_used,
            result.processing_time_ms,
            result.model
        );

        Ok(result.text)
    }

    fn name(&self) -> &'static str {
        "vlm"
    }

    async fn is_available(&self) -> bool {
        self.client.health_check().await
    }
}

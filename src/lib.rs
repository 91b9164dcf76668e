// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod verify;
pub mod version;
pub mod vision;

// Re-export main types
pub use config::AppConfig;
pub use verify::{check_claims, FieldCheck, LabelClaims, LabelField, LabelVerifier, VerificationResult};
pub use vision::{build_provider, OcrBackendConfig, OcrBackendKind, OcrError, OcrProvider};

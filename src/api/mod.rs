// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod form;
pub mod http_server;
pub mod ocr;
pub mod verify;

pub use errors::{ApiError, ErrorResponse};
pub use form::{ImageUpload, UploadForm};
pub use http_server::{router, start_server, AppState, HealthResponse};
pub use ocr::{ocr_handler, OcrResponse};
pub use verify::{verify_handler, VerifyForm, VerifyRequest, VerifyResponse};

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Label verification API endpoint module
//!
//! Provides POST /v1/verify for checking a label image against claims.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::verify_handler;
pub use request::{VerifyForm, VerifyRequest};
pub use response::VerifyResponse;

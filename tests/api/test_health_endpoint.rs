// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Health endpoint and route registration tests

use super::support::{app, send, Reply, ScriptedProvider};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use label_verifier::version;

#[cfg(test)]
mod health_endpoint_tests {
    use super::*;

    /// Test 1: Health reports version and backend
    #[tokio::test]
    async fn test_health() {
        let provider = ScriptedProvider::new(Reply::Text(""));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, json) = send(app(provider.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], version::VERSION_NUMBER);
        assert_eq!(json["ocrBackend"], "scripted");
        assert_eq!(json["ocrAvailable"], true);
        assert_eq!(json["build"]["version"], version::VERSION_NUMBER);
        assert!(json["build"]["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "label-verification"));
        assert_eq!(provider.calls(), 0);
    }

    /// Test 2: Health stays 200 but reports a backend that cannot take work
    #[tokio::test]
    async fn test_health_degraded_backend() {
        let provider = ScriptedProvider::new(Reply::Unavailable);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, json) = send(app(provider.clone()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["ocrAvailable"], false);
        assert_eq!(provider.calls(), 0);
    }

    /// Test 3: Unknown route is 404
    #[tokio::test]
    async fn test_unknown_route() {
        let provider = ScriptedProvider::new(Reply::Text(""));
        let request = Request::builder()
            .uri("/v1/inference")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(app(provider), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    /// Test 4: Verify only accepts POST
    #[tokio::test]
    async fn test_verify_requires_post() {
        let provider = ScriptedProvider::new(Reply::Text(""));
        let request = Request::builder()
            .uri("/v1/verify")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(app(provider), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}

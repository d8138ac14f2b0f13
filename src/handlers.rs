// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the contact form relay.
//!
//! Thin glue between axum and the pipeline: extracts the method,
//! origin header, body and client address, and maps the pipeline
//! outcome to a status code, CORS headers and a JSON body.

use crate::config::Config;
use crate::pipeline::{InboundRequest, Pipeline, PipelineOutcome};
use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Shared application state.
pub struct AppState {
    pub pipeline: Pipeline,
    pub config: Config,
}

/// Response body for every pipeline outcome.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-form-relay",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Contact form endpoint. Routed for every method; the pipeline owns
/// the method gate, including the OPTIONS preflight.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    debug!(
        client = %addr.ip(),
        method = %method,
        origin = ?origin,
        "processing contact request"
    );

    let request = InboundRequest {
        method,
        origin,
        body: if body.is_empty() { None } else { Some(body) },
        client_addr: Some(addr.ip().to_string()),
    };

    let outcome = state.pipeline.handle(request).await;
    outcome_response(outcome, &state.config)
}

/// Map a pipeline outcome to its HTTP response. Every response carries
/// the CORS headers reflecting the configured policy, rejections
/// included.
pub fn outcome_response(outcome: PipelineOutcome, config: &Config) -> Response {
    let (status, body) = match outcome {
        PipelineOutcome::Sent { message_id } => (
            StatusCode::OK,
            ApiResponse {
                success: true,
                message: Some("Message sent successfully".to_string()),
                error: None,
                message_id: Some(message_id),
                details: None,
            },
        ),
        PipelineOutcome::Preflight => (
            StatusCode::OK,
            ApiResponse {
                success: true,
                message: Some("OK".to_string()),
                error: None,
                message_id: None,
                details: None,
            },
        ),
        PipelineOutcome::Rejected {
            kind,
            message,
            detail,
        } => (
            kind.status(),
            ApiResponse {
                success: false,
                message: None,
                error: Some(message),
                message_id: None,
                details: detail,
            },
        ),
    };

    let mut response = (status, Json(body)).into_response();
    apply_cors_headers(response.headers_mut(), config);
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, config: &Config) {
    if let Ok(origin) = HeaderValue::from_str(&config.cors.allowed_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorsConfig;
    use crate::pipeline::RejectKind;

    fn config_with_origin(origin: &str) -> Config {
        Config {
            cors: CorsConfig {
                allowed_origin: origin.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_preflight_response_carries_cors_headers() {
        let response = outcome_response(
            PipelineOutcome::Preflight,
            &config_with_origin("https://example.com"),
        );

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://example.com"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "POST, OPTIONS"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type"
        );
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[test]
    fn test_rejection_response_keeps_cors_headers() {
        let response = outcome_response(
            PipelineOutcome::Rejected {
                kind: RejectKind::RateLimited,
                message: "Too many requests".to_string(),
                detail: None,
            },
            &config_with_origin("*"),
        );

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[test]
    fn test_sent_response_shape() {
        let response = outcome_response(
            PipelineOutcome::Sent {
                message_id: "abc-123".to_string(),
            },
            &Config::default(),
        );
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_api_response_skips_absent_fields() {
        let body = ApiResponse {
            success: false,
            message: None,
            error: Some("Too many requests".to_string()),
            message_id: None,
            details: None,
        };
        let json = serde_json::to_value(&body).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Too many requests"})
        );
    }
}

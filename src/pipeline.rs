// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pipeline orchestrator.
//!
//! Composes the rate limiter, origin check, schema validator, threat
//! detector, sanitizer and the mail transport into the end-to-end
//! decision flow. Gates run in a fixed order and each short-circuits
//! to a rejection; exactly one outcome is produced per request.
//! Outcomes are returned, never raised, so every failure path is
//! visible at the call site.

use crate::config::Config;
use crate::limiter::{RateLimiter, SHARED_IDENTITY};
use crate::mailer::{MailTransport, OutboundEmail, TransportError};
use crate::origin::is_allowed_origin;
use crate::sanitize::sanitize;
use crate::threat::ThreatDetector;
use crate::validator::{ContactMessage, SchemaValidator, ValidationOutcome};
use axum::http::{Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Subject used when the submitter supplied none.
pub const DEFAULT_SUBJECT: &str = "New contact form submission";

/// A raw inbound request, reduced to what the pipeline needs.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Declared `Origin` header, if any
    pub origin: Option<String>,
    /// Raw request body text, if any
    pub body: Option<String>,
    /// Client network address, if extractable
    pub client_addr: Option<String>,
}

/// Closed enumeration of rejection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    MethodNotAllowed,
    RateLimited,
    ForbiddenOrigin,
    ValidationFailed,
    SuspiciousContent,
    TransportFailure,
    InternalError,
}

impl RejectKind {
    /// HTTP status this rejection maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ForbiddenOrigin => StatusCode::FORBIDDEN,
            Self::ValidationFailed | Self::SuspiciousContent => StatusCode::BAD_REQUEST,
            Self::TransportFailure | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for RejectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::RateLimited => "rate_limited",
            Self::ForbiddenOrigin => "forbidden_origin",
            Self::ValidationFailed => "validation_failed",
            Self::SuspiciousContent => "suspicious_content",
            Self::TransportFailure => "transport_failure",
            Self::InternalError => "internal_error",
        };
        write!(f, "{}", name)
    }
}

/// Tagged result of the whole flow.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// Mail was dispatched
    Sent { message_id: String },
    /// Neutral success for the preflight method; no later stage ran
    Preflight,
    /// Request was rejected at one of the gates
    Rejected {
        kind: RejectKind,
        /// Client-safe message
        message: String,
        /// Optional client-safe detail
        detail: Option<String>,
    },
}

impl PipelineOutcome {
    fn rejected(kind: RejectKind, message: impl Into<String>) -> Self {
        Self::Rejected {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Catch-all outcome for unclassified internal failures. Carries a
    /// fixed message; detail stays in the logs.
    pub fn internal_error() -> Self {
        Self::rejected(RejectKind::InternalError, "Internal server error")
    }
}

/// The end-to-end contact form pipeline.
pub struct Pipeline {
    limiter: RateLimiter,
    validator: SchemaValidator,
    detector: ThreatDetector,
    transport: Arc<dyn MailTransport>,
    config: Config,
}

impl Pipeline {
    /// Assemble the pipeline. Configuration is passed in explicitly;
    /// nothing here reads ambient environment state.
    pub fn new(config: Config, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            limiter: RateLimiter::new(),
            validator: SchemaValidator::new(),
            detector: ThreatDetector::new(),
            transport,
            config,
        }
    }

    /// Run a request through every gate, producing exactly one outcome.
    ///
    /// Anything that escapes the classified gates is logged with full
    /// detail and reported as an internal error with a fixed message.
    pub async fn handle(&self, request: InboundRequest) -> PipelineOutcome {
        let outcome = match self.run(request).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(error = %err, "unclassified pipeline failure");
                PipelineOutcome::internal_error()
            }
        };
        if let PipelineOutcome::Rejected { kind, .. } = &outcome {
            debug!(kind = %kind, "request rejected");
        }
        outcome
    }

    async fn run(&self, request: InboundRequest) -> anyhow::Result<PipelineOutcome> {
        // Gate 1: method. Preflight succeeds without touching later
        // stages; anything but the submission method is rejected.
        if request.method == Method::OPTIONS {
            return Ok(PipelineOutcome::Preflight);
        }
        if request.method != Method::POST {
            debug!(method = %request.method, "method rejected");
            return Ok(PipelineOutcome::rejected(
                RejectKind::MethodNotAllowed,
                "Method not allowed",
            ));
        }

        // Gate 2: rate limit, keyed by client address. Requests with
        // no extractable address share one identity.
        let identity = request.client_addr.as_deref().unwrap_or(SHARED_IDENTITY);
        if !self.limiter.allow(
            identity,
            self.config.rate_limit.max_requests,
            self.config.rate_limit.window_duration(),
        ) {
            info!(identity, "request rate limited");
            return Ok(PipelineOutcome::rejected(
                RejectKind::RateLimited,
                "Too many requests",
            ));
        }

        // Gate 3: origin policy.
        if !is_allowed_origin(request.origin.as_deref(), &self.config.cors.allowed_origin) {
            info!(identity, origin = ?request.origin, "origin rejected");
            return Ok(PipelineOutcome::rejected(
                RejectKind::ForbiddenOrigin,
                "Origin not allowed",
            ));
        }

        // Gate 4: body presence and parse.
        let body = match request.body.as_deref().map(str::trim) {
            Some(body) if !body.is_empty() => body,
            _ => {
                return Ok(PipelineOutcome::rejected(
                    RejectKind::ValidationFailed,
                    "Request body is required",
                ))
            }
        };
        let payload: Value = match serde_json::from_str(body) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(identity, error = %err, "malformed request body");
                return Ok(PipelineOutcome::Rejected {
                    kind: RejectKind::ValidationFailed,
                    message: "Request body must be valid JSON".to_string(),
                    detail: Some(err.to_string()),
                });
            }
        };

        // Gate 5: schema validation. Every violated rule is reported.
        let message = match self.validator.validate(&payload) {
            ValidationOutcome::Accepted(message) => message,
            ValidationOutcome::Rejected(reasons) => {
                return Ok(PipelineOutcome::rejected(
                    RejectKind::ValidationFailed,
                    reasons.join(", "),
                ))
            }
        };

        // Gate 6: threat detection on the validated content.
        if self.detector.is_suspicious(&message.content) {
            warn!(identity, "suspicious content blocked");
            return Ok(PipelineOutcome::rejected(
                RejectKind::SuspiciousContent,
                "Message content contains disallowed markup",
            ));
        }

        // Gate 7: sanitize free-text fields, exactly once. Email is
        // already format-validated and passes through unchanged.
        let message = ContactMessage {
            name: sanitize(&message.name),
            email: message.email,
            content: sanitize(&message.content),
            subject: message.subject.as_deref().map(sanitize),
        };

        // Gate 8: dispatch.
        if !self.config.mail.is_configured() {
            error!(error = %TransportError::NotConfigured, "cannot dispatch contact email");
            return Ok(PipelineOutcome::rejected(
                RejectKind::TransportFailure,
                "Failed to send message",
            ));
        }

        let email = self.build_email(&message);
        match self.transport.send_mail(&email).await {
            Ok(message_id) if message_id.trim().is_empty() => {
                error!(identity, error = %TransportError::MissingMessageId, "mail dispatch failed");
                Ok(PipelineOutcome::rejected(
                    RejectKind::TransportFailure,
                    "Failed to send message",
                ))
            }
            Ok(message_id) => {
                info!(identity, message_id = %message_id, "contact email sent");
                Ok(PipelineOutcome::Sent { message_id })
            }
            Err(err) => {
                // Full detail stays in the logs; the client gets a
                // generic message.
                error!(identity, error = %err, "mail dispatch failed");
                Ok(PipelineOutcome::rejected(
                    RejectKind::TransportFailure,
                    "Failed to send message",
                ))
            }
        }
    }

    /// Assemble the outbound email from sanitized fields. The default
    /// subject is substituted here, after validation and sanitization.
    fn build_email(&self, message: &ContactMessage) -> OutboundEmail {
        let subject = message
            .subject
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        let received_at = chrono::Utc::now().to_rfc3339();

        let text_body = format!(
            "Name: {}\nEmail: {}\nReceived: {}\n\n{}",
            message.name, message.email, received_at, message.content
        );
        let html_body = format!(
            "<h2>{}</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Received:</strong> {}</p>\n\
             <p>{}</p>",
            subject,
            message.name,
            message.email,
            received_at,
            message.content.replace('\n', "<br>")
        );

        OutboundEmail {
            sender: self.config.mail.sender.clone(),
            recipient: self.config.mail.sender.clone(),
            reply_to: message.email.clone(),
            subject,
            text_body,
            html_body,
        }
    }

    /// Remove stale rate-limit entries. Invoked on a schedule by the
    /// surrounding system, not by the pipeline itself.
    pub fn sweep_stale(&self) -> usize {
        self.limiter.sweep(
            self.config.rate_limit.window_duration(),
            self.config.rate_limit.retention_multiple,
        )
    }

    /// Drop all rate-limit state.
    pub fn reset_rate_limits(&self) {
        self.limiter.reset();
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Relay
//!
//! This crate accepts contact-form submissions over HTTP for static or
//! thin-client sites, running every request through an ordered
//! pipeline before any mail is dispatched:
//!
//! - Method gate (POST submissions, OPTIONS preflight)
//! - Per-identity fixed-window rate limiting
//! - Origin policy check
//! - Schema validation with combined error reporting
//! - Injection/XSS signature detection
//! - HTML-entity sanitization of free-text fields
//! - Mail dispatch through a pluggable transport
//!
//! The rate-limit counter table is per-process; distributed limiting
//! means substituting an external counter behind the same interface.

pub mod config;
pub mod handlers;
pub mod limiter;
pub mod mailer;
pub mod origin;
pub mod pipeline;
pub mod sanitize;
pub mod threat;
pub mod validator;

pub use config::Config;
pub use limiter::RateLimiter;
pub use mailer::{MailTransport, OutboundEmail, TransportError};
pub use pipeline::{InboundRequest, Pipeline, PipelineOutcome, RejectKind};
pub use validator::{ContactMessage, SchemaValidator, ValidationOutcome};

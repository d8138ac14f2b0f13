// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form relay.
//!
//! Every value has a serde default so a partial config (or an empty
//! environment) still yields a runnable service. The mail sender has no
//! default: dispatch without one is surfaced as a transport error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact form relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Cross-origin policy configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Mail dispatch configuration
    #[serde(default)]
    pub mail: MailConfig,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client identity (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Counting window in seconds (default: 60)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Entries older than `retention_multiple x window` are removed by
    /// the sweep (default: 2)
    #[serde(default = "default_retention_multiple")]
    pub retention_multiple: u32,
}

/// Cross-origin policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origin policy: `*`, `*.suffix`, or an exact origin
    /// (default: `*`)
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

/// Mail dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Verified sender address; also the recipient of every submission.
    /// Empty means unconfigured.
    #[serde(default)]
    pub sender: String,

    /// Region of the mail-sending service (default: eu-west-2)
    #[serde(default = "default_mail_region")]
    pub region: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

fn default_retention_multiple() -> u32 {
    2
}

fn default_allowed_origin() -> String {
    "*".to_string()
}

fn default_mail_region() -> String {
    "eu-west-2".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
            retention_multiple: default_retention_multiple(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: default_allowed_origin(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            region: default_mail_region(),
        }
    }
}

impl RateLimitConfig {
    /// Get the counting window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl MailConfig {
    /// Whether a sender address has been configured.
    pub fn is_configured(&self) -> bool {
        !self.sender.trim().is_empty()
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
            rate_limit: RateLimitConfig {
                max_requests: env_parse("RATE_LIMIT_MAX", default_max_requests()),
                window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", default_window_secs()),
                retention_multiple: env_parse(
                    "RATE_LIMIT_RETENTION_MULTIPLE",
                    default_retention_multiple(),
                ),
            },
            cors: CorsConfig {
                allowed_origin: std::env::var("ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| default_allowed_origin()),
            },
            mail: MailConfig {
                sender: std::env::var("MAIL_SENDER").unwrap_or_default(),
                region: std::env::var("MAIL_REGION").unwrap_or_else(|_| default_mail_region()),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

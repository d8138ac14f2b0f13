// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact form schema validator.
//!
//! Checks a raw, untrusted payload against field-level structural
//! rules and produces either a typed, normalized [`ContactMessage`] or
//! the full list of human-readable reasons. Every applicable failure
//! is collected so a client sees all problems in one round trip;
//! reasons are reported in declaration order (name, email, content,
//! subject) for deterministic output.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Name allow-list: letters, whitespace, hyphen, apostrophe, period.
const NAME_PATTERN: &str = r"^[\p{L}\s.'-]+$";

/// Standard address grammar: local part, `@`, domain with at least one
/// dot. No deliverability check.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const CONTENT_MIN_CHARS: usize = 10;
const CONTENT_MAX_CHARS: usize = 5000;
const SUBJECT_MAX_CHARS: usize = 200;

/// A validated, normalized contact submission.
///
/// An instance exists only if every schema rule passed. Fields hold
/// the trimmed input; `subject` stays `None` when the field was absent
/// so callers can distinguish "not supplied" from "supplied empty".
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub content: String,
    pub subject: Option<String>,
}

/// Result of schema validation.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// Payload passed every rule
    Accepted(ContactMessage),
    /// One or more rules failed; reasons in declaration order
    Rejected(Vec<String>),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            ValidationOutcome::Accepted(_) => &[],
            ValidationOutcome::Rejected(reasons) => reasons,
        }
    }
}

/// Contact form schema validator.
pub struct SchemaValidator {
    name_pattern: Regex,
    email_pattern: Regex,
}

impl SchemaValidator {
    /// Compile the field patterns.
    pub fn new() -> Self {
        Self {
            name_pattern: Regex::new(NAME_PATTERN).expect("name pattern is valid"),
            email_pattern: Regex::new(EMAIL_PATTERN).expect("email pattern is valid"),
        }
    }

    /// Validate a raw payload.
    ///
    /// String fields are trimmed before length and pattern checks;
    /// lengths are counted in Unicode code points. Unknown extra
    /// fields are dropped without comment.
    pub fn validate(&self, raw: &Value) -> ValidationOutcome {
        let obj = match raw.as_object() {
            Some(obj) => obj,
            None => {
                return ValidationOutcome::Rejected(vec![
                    "Request body must be a JSON object".to_string()
                ])
            }
        };

        let mut reasons = Vec::new();

        let name = match obj.get("name").and_then(Value::as_str) {
            None => {
                reasons.push("Name is required".to_string());
                None
            }
            Some(value) => {
                let trimmed = value.trim();
                let len = trimmed.chars().count();
                if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
                    reasons.push(format!(
                        "Name must be between {} and {} characters",
                        NAME_MIN_CHARS, NAME_MAX_CHARS
                    ));
                    None
                } else if !self.name_pattern.is_match(trimmed) {
                    reasons.push("Name contains invalid characters".to_string());
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        };

        let email = match obj.get("email").and_then(Value::as_str) {
            None => {
                reasons.push("Email is required".to_string());
                None
            }
            Some(value) => {
                let trimmed = value.trim();
                if !self.email_pattern.is_match(trimmed) {
                    reasons.push("Email address is invalid".to_string());
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        };

        let content = match obj.get("content").and_then(Value::as_str) {
            None => {
                reasons.push("Message content is required".to_string());
                None
            }
            Some(value) => {
                let trimmed = value.trim();
                let len = trimmed.chars().count();
                if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&len) {
                    reasons.push(format!(
                        "Message must be between {} and {} characters",
                        CONTENT_MIN_CHARS, CONTENT_MAX_CHARS
                    ));
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        };

        // Optional; the default is substituted later by the pipeline,
        // never injected here.
        let subject = match obj.get("subject") {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_str() {
                None => {
                    reasons.push("Subject must be text".to_string());
                    None
                }
                Some(value) => {
                    let trimmed = value.trim();
                    if trimmed.chars().count() > SUBJECT_MAX_CHARS {
                        reasons.push(format!(
                            "Subject must be at most {} characters",
                            SUBJECT_MAX_CHARS
                        ));
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                }
            },
        };

        // No reasons means every required field produced a value above.
        if let (true, Some(name), Some(email), Some(content)) =
            (reasons.is_empty(), name, email, content)
        {
            return ValidationOutcome::Accepted(ContactMessage {
                name,
                email,
                content,
                subject,
            });
        }

        debug!(reasons = ?reasons, "schema validation failed");
        ValidationOutcome::Rejected(reasons)
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

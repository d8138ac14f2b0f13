// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for pipeline and abuse simulation tests.

use axum::http::Method;
use contact_form_relay::pipeline::InboundRequest;
use serde_json::json;

/// Generate a pool of client identities (addresses) for testing.
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{}.{}.{}", a, b, c)
        })
        .collect()
}

/// A well-formed submission body.
pub fn valid_submission() -> String {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.org",
        "content": "I would like to know more about your work.",
    })
    .to_string()
}

/// A well-formed submission body with a subject line.
pub fn submission_with_subject(subject: &str) -> String {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.org",
        "content": "I would like to know more about your work.",
        "subject": subject,
    })
    .to_string()
}

/// A POST request carrying `body` from `identity`.
pub fn post_from(identity: &str, body: String) -> InboundRequest {
    InboundRequest {
        method: Method::POST,
        origin: None,
        body: Some(body),
        client_addr: Some(identity.to_string()),
    }
}

/// Injection payloads that must never reach the mail transport.
pub fn generate_xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
        "click here: javascript:alert(document.cookie)",
        "vbscript:msgbox(1) is old but still blocked",
        r#"<img src=x onerror=alert(1)> nice site"#,
        r#"<body onload=alert('xss')> hello"#,
        "open data:text/html,<h1>pwn</h1> in a new tab",
        "<iframe src=//evil.example></iframe> padding text",
        "<object data=//evil.example/x.swf></object> padding",
        "<embed src=//evil.example/x.swf> padding text",
    ]
}

/// Bodies that must be rejected before validation even begins.
pub fn generate_malformed_bodies() -> Vec<&'static str> {
    vec![
        "{not json",
        "[1, 2",
        "null trailing garbage",
        "<xml>nope</xml>",
        "name=Jane&email=jane@example.org",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_identities_unique() {
        let identities = generate_identities(256);
        assert_eq!(identities.len(), 256);
        let unique: std::collections::HashSet<_> = identities.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn test_valid_submission_parses() {
        let body: serde_json::Value =
            serde_json::from_str(&valid_submission()).expect("body should be valid JSON");
        assert!(body.get("name").is_some());
    }
}

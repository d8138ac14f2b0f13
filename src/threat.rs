// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Injection/XSS signature detector for submitted content.
//!
//! A fixed set of case-insensitive signatures covering markup and
//! script injection. Any single match flags the whole text. The bias
//! is deliberately conservative: benign text that happens to contain a
//! signature substring is rejected rather than risk a payload reaching
//! an email body.

use regex::Regex;

/// Signatures for known-dangerous content shapes.
const THREAT_SIGNATURES: &[&str] = &[
    // Script elements
    r"(?i)<\s*script",
    // Script-scheme URIs
    r"(?i)javascript\s*:",
    r"(?i)vbscript\s*:",
    // Inline event-handler attributes (onload=, onerror=, ...)
    r"(?i)\bon\w+\s*=",
    // HTML documents smuggled through data URIs
    r"(?i)data\s*:\s*text/html",
    // Embedding elements
    r"(?i)<\s*iframe",
    r"(?i)<\s*object",
    r"(?i)<\s*embed",
];

/// Content threat detector with signatures compiled once.
pub struct ThreatDetector {
    signatures: Vec<Regex>,
}

impl ThreatDetector {
    /// Compile the signature set.
    pub fn new() -> Self {
        Self {
            signatures: THREAT_SIGNATURES
                .iter()
                .map(|p| Regex::new(p).expect("threat signature pattern is valid"))
                .collect(),
        }
    }

    /// Whether `text` matches any signature. Returns on the first
    /// match; signature order only affects performance, not the result.
    pub fn is_suspicious(&self, text: &str) -> bool {
        self.signatures.iter().any(|re| re.is_match(text))
    }
}

impl Default for ThreatDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_script_elements() {
        let detector = ThreatDetector::new();
        assert!(detector.is_suspicious("<script>alert(1)</script>"));
        assert!(detector.is_suspicious("< SCRIPT src=x>"));
    }

    #[test]
    fn test_flags_script_scheme_uris() {
        let detector = ThreatDetector::new();
        assert!(detector.is_suspicious("click javascript:alert(1)"));
        assert!(detector.is_suspicious("JAVASCRIPT : void(0)"));
        assert!(detector.is_suspicious("vbscript:msgbox(1)"));
    }

    #[test]
    fn test_flags_event_handlers() {
        let detector = ThreatDetector::new();
        assert!(detector.is_suspicious(r#"<img src=x onerror=alert(1)>"#));
        assert!(detector.is_suspicious("onload = doEvil()"));
    }

    #[test]
    fn test_flags_data_html_uris_and_embeds() {
        let detector = ThreatDetector::new();
        assert!(detector.is_suspicious("data:text/html,<h1>x</h1>"));
        assert!(detector.is_suspicious("<iframe src=//evil>"));
        assert!(detector.is_suspicious("<object data=x>"));
        assert!(detector.is_suspicious("<embed src=x>"));
    }

    #[test]
    fn test_benign_text_passes() {
        let detector = ThreatDetector::new();
        assert!(!detector.is_suspicious("I love this <3 product"));
        assert!(!detector.is_suspicious("Please get back to me about my order."));
        assert!(!detector.is_suspicious("The data: field was empty on the form."));
    }

    #[test]
    fn test_conservative_bias_accepts_false_positives() {
        let detector = ThreatDetector::new();
        // "online=" matches the event-handler signature; rejected by design
        assert!(detector.is_suspicious("set online=true in your profile"));
    }
}

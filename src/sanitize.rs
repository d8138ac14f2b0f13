// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTML-entity escaping for free-text fields.
//!
//! Defense-in-depth encoding for the HTML email rendering; the threat
//! detector is the primary security gate. The pipeline applies this
//! exactly once per field per request: re-applying it to already
//! escaped text re-escapes the `&` of each entity, which is why raw
//! user input is the only valid argument.

/// Escape the five HTML-significant characters and trim surrounding
/// whitespace.
///
/// The replacement happens in a single pass over the characters, so
/// the `&` emitted for one entity is never revisited within one
/// application. Idempotent on text containing none of `< > & " '`.
pub fn sanitize(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_all_significant_characters() {
        assert_eq!(
            sanitize(r#"<a href="x" onclick='y'>&</a>"#),
            "&lt;a href=&quot;x&quot; onclick=&#x27;y&#x27;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize("  hello world \n"), "hello world");
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let clean = "Just a plain message with no markup at all.";
        assert_eq!(sanitize(&sanitize(clean)), sanitize(clean));
    }

    #[test]
    fn test_reapplication_reescapes_entities() {
        // The single-application contract: a second pass re-escapes
        // the ampersand of the entity produced by the first.
        assert_eq!(sanitize("<"), "&lt;");
        assert_eq!(sanitize(&sanitize("<")), "&amp;lt;");
    }

    #[test]
    fn test_preserves_unicode() {
        assert_eq!(sanitize("héllo wörld ✓"), "héllo wörld ✓");
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Origin policy check.
//!
//! Decides whether a request's declared `Origin` header is acceptable
//! under the configured policy. Absence of the header is treated
//! permissively: same-origin browsers and non-browser clients do not
//! send one.

/// Check an origin against the configured policy.
///
/// - policy `*` allows every origin, including absent;
/// - an absent origin is allowed under any policy;
/// - a `*.suffix` policy allows origins equal to or ending in the
///   suffix (plain string matching, no host parsing);
/// - any other policy requires exact equality.
pub fn is_allowed_origin(origin: Option<&str>, policy: &str) -> bool {
    if policy == "*" {
        return true;
    }

    let origin = match origin {
        Some(o) => o,
        None => return true,
    };

    if let Some(suffix) = policy.strip_prefix("*.") {
        return origin == suffix || origin.ends_with(suffix);
    }

    origin == policy
}

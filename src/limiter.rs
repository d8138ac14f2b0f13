// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by client identity.
//!
//! The counter table lives in process memory and is not shared across
//! instances; a deployment that needs distributed limiting substitutes
//! an external counter behind the same `allow` contract. Entries are
//! removed by an explicit [`RateLimiter::sweep`] which the surrounding
//! system schedules; the limiter never cleans up on its own.

use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Identity used when no client address can be extracted from a
/// request. All such requests share one counter, so the limiter fails
/// open toward permissiveness rather than denial. Known weakness.
pub const SHARED_IDENTITY: &str = "unknown";

/// Per-identity counter state. Owned exclusively by the limiter.
#[derive(Debug)]
struct RateLimitEntry {
    /// Requests counted in the current window
    count: u32,
    /// When the current window opened
    window_start: Instant,
}

/// Thread-safe fixed-window rate limiter.
///
/// The sharded map gives two guarantees the pipeline relies on:
/// different identities do not contend, and a single identity's
/// read-increment-write happens under one entry lock, so two
/// concurrent requests can never both observe `count < max` when only
/// one slot remains.
pub struct RateLimiter {
    entries: DashMap<String, RateLimitEntry>,
}

impl RateLimiter {
    /// Create a rate limiter with an empty counter table.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Check whether a request from `identity` is allowed under
    /// `max_requests` per `window`.
    ///
    /// First request in a fresh or expired window opens a new window
    /// with count 1. Within a live window the count is incremented up
    /// to `max_requests`; once the cap is reached further requests are
    /// denied without incrementing, so a denied client does not extend
    /// its own window.
    pub fn allow(&self, identity: &str, max_requests: u32, window: Duration) -> bool {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(identity.to_string())
            .or_insert_with(|| RateLimitEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) > window {
            entry.count = 1;
            entry.window_start = now;
            return true;
        }

        if entry.count < max_requests {
            entry.count += 1;
            true
        } else {
            debug!(identity, count = entry.count, "rate limit exceeded");
            false
        }
    }

    /// Remove entries whose window opened more than
    /// `retention_multiple x window` ago. Returns the number removed.
    ///
    /// Callers are responsible for invoking this periodically.
    pub fn sweep(&self, window: Duration, retention_multiple: u32) -> usize {
        let now = Instant::now();
        let cutoff = window * retention_multiple;
        // Count inside the predicate: a before/after len() difference is
        // wrong under concurrent inserts and can underflow.
        let removed = AtomicUsize::new(0);
        self.entries.retain(|_, entry| {
            let keep = now.duration_since(entry.window_start) <= cutoff;
            if !keep {
                removed.fetch_add(1, Ordering::Relaxed);
            }
            keep
        });
        let removed = removed.into_inner();
        if removed > 0 {
            debug!(
                removed,
                remaining = self.entries.len(),
                "swept stale rate limit entries"
            );
        }
        removed
    }

    /// Drop all counter state.
    pub fn reset(&self) {
        self.entries.clear();
    }

    /// Number of identities currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the counter table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

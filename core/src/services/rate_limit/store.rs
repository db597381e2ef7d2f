//! Counter storage behind the rate limiter.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// What a counter key is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitScope {
    Ip,
    Email,
}

impl RateLimitScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Email => "email",
        }
    }
}

/// Outcome of one check-and-increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether this operation pushed the key over its limit
    pub limited: bool,
    /// Count within the current window, including this operation
    pub count: u32,
    /// Seconds until the window resets
    pub retry_after_seconds: u64,
}

/// Keyed counter storage.
///
/// The check and the increment must be atomic per key: two concurrent
/// requests for the same key must never both observe "under limit".
/// Implementations are synchronous; the in-memory store holds its lock
/// only for the map operation. A shared-cache implementation is the
/// externalization point for multi-instance deployments.
pub trait RateLimiterStore: Send + Sync {
    /// Count one operation against `(scope, key)` and report whether the
    /// key is now over `limit` for the window.
    fn check_and_increment(
        &self,
        scope: RateLimitScope,
        key: &str,
        limit: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, String>;
}

#[derive(Debug, Clone, Copy)]
struct CounterWindow {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

/// Process-local counter store.
///
/// Elapsed windows are reset on access; a full sweep of stale keys runs
/// every [`PURGE_INTERVAL`] operations so abandoned keys do not
/// accumulate.
pub struct InMemoryRateLimiterStore {
    counters: Mutex<HashMap<(RateLimitScope, String), CounterWindow>>,
    ops: AtomicU64,
}

const PURGE_INTERVAL: u64 = 1024;

impl InMemoryRateLimiterStore {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            ops: AtomicU64::new(0),
        }
    }

    /// Number of live counter keys, for tests and diagnostics.
    pub fn key_count(&self) -> usize {
        self.counters.lock().unwrap().len()
    }

    /// Drop every counter whose window has elapsed.
    pub fn purge_expired(&self, now: DateTime<Utc>) {
        let mut counters = self.counters.lock().unwrap();
        counters.retain(|_, window| window.window_reset_at > now);
    }
}

impl Default for InMemoryRateLimiterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterStore for InMemoryRateLimiterStore {
    fn check_and_increment(
        &self,
        scope: RateLimitScope,
        key: &str,
        limit: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, String> {
        if self.ops.fetch_add(1, Ordering::Relaxed) % PURGE_INTERVAL == PURGE_INTERVAL - 1 {
            self.purge_expired(now);
        }

        let mut counters = self.counters.lock().unwrap();
        let entry = counters
            .entry((scope, key.to_string()))
            .or_insert(CounterWindow {
                count: 0,
                window_reset_at: now + window,
            });

        if now > entry.window_reset_at {
            entry.count = 0;
            entry.window_reset_at = now + window;
        }

        entry.count += 1;
        let retry_after_seconds = (entry.window_reset_at - now).num_seconds().max(0) as u64;

        Ok(RateLimitDecision {
            limited: entry.count > limit,
            count: entry.count,
            retry_after_seconds,
        })
    }
}

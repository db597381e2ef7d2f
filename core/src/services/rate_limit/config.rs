//! Rate limiting policy configuration.

use serde::{Deserialize, Serialize};

/// A single counter rule: at most `limit` operations per window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimitRule {
    pub limit: u32,
    pub window_seconds: u64,
}

impl RateLimitRule {
    pub const fn new(limit: u32, window_seconds: u64) -> Self {
        Self {
            limit,
            window_seconds,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_seconds as i64 * 1000
    }
}

/// Compound policy for the verification endpoint, evaluated in order
/// with the first violated rule winning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Disable all limiting (load tests, local development)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Max verification requests per IP per hour
    pub ip_hourly: RateLimitRule,

    /// Max verification requests per IP in a short burst window
    pub ip_burst: RateLimitRule,

    /// Max verification requests per email per hour
    pub email_hourly: RateLimitRule,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ip_hourly: RateLimitRule::new(10, 3600),
            ip_burst: RateLimitRule::new(3, 600),
            email_hourly: RateLimitRule::new(3, 3600),
        }
    }
}

fn default_enabled() -> bool {
    true
}

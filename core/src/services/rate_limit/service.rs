//! Rate limiter applying the compound verification policy.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, warn};

use super::config::{RateLimitPolicy, RateLimitRule};
use super::store::{RateLimitDecision, RateLimitScope, RateLimiterStore};

/// A tripped rule, with the user-facing reason for the rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitViolation {
    pub scope: RateLimitScope,
    pub reason: String,
    pub retry_after_seconds: u64,
}

/// Windowed rate limiter over a pluggable counter store.
pub struct RateLimiter<S: RateLimiterStore> {
    store: Arc<S>,
    policy: RateLimitPolicy,
}

impl<S: RateLimiterStore> RateLimiter<S> {
    pub fn new(store: Arc<S>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, RateLimitPolicy::default())
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Count one operation against `(scope, key)` under an ad-hoc rule.
    pub fn check_and_increment(
        &self,
        scope: RateLimitScope,
        key: &str,
        rule: RateLimitRule,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, String> {
        self.store.check_and_increment(
            scope,
            key,
            rule.limit,
            Duration::milliseconds(rule.window_ms()),
            now,
        )
    }

    /// Apply the compound verification policy for one request.
    ///
    /// Rules run in order (IP hourly, IP burst, email hourly) and
    /// short-circuit on the first violation, each with its own reason.
    /// A store failure fails OPEN: a broken limiter must throttle
    /// itself, not turn into a denial of service for legitimate signups.
    pub fn check_verification_request(
        &self,
        client_ip: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Option<RateLimitViolation> {
        if !self.policy.enabled {
            return None;
        }

        let checks = [
            (
                RateLimitScope::Ip,
                client_ip,
                self.policy.ip_hourly,
                "Too many verification requests from this IP address. Please try again later.",
            ),
            (
                RateLimitScope::Ip,
                client_ip,
                self.policy.ip_burst,
                "Too many verification requests in a short time. Please wait a few minutes.",
            ),
            (
                RateLimitScope::Email,
                email,
                self.policy.email_hourly,
                "Too many verification requests for this email address. Please try again later.",
            ),
        ];

        for (scope, key, rule, reason) in checks {
            match self.check_and_increment(scope, key, rule, now) {
                Ok(decision) if decision.limited => {
                    warn!(
                        scope = scope.as_str(),
                        count = decision.count,
                        limit = rule.limit,
                        event = "rate_limit_hit",
                        "Verification request rate limit exceeded"
                    );
                    return Some(RateLimitViolation {
                        scope,
                        reason: reason.to_string(),
                        retry_after_seconds: decision.retry_after_seconds,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    // Fail open: skip the broken rule and keep going.
                    error!(
                        scope = scope.as_str(),
                        error = %e,
                        event = "rate_limiter_store_error",
                        "Rate limiter store failed; allowing request"
                    );
                }
            }
        }

        None
    }
}

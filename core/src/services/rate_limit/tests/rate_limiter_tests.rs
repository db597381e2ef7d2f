//! Window behavior, compound policy and fail-open tests.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use super::super::*;

fn now() -> DateTime<Utc> {
    Utc::now()
}

#[test]
fn test_window_allows_up_to_limit_then_blocks() {
    let store = InMemoryRateLimiterStore::new();
    let t = now();
    let window = Duration::milliseconds(3_600_000);

    for i in 1..=10 {
        let decision = store
            .check_and_increment(RateLimitScope::Ip, "1.2.3.4", 10, window, t)
            .unwrap();
        assert!(!decision.limited, "call {} should not be limited", i);
        assert_eq!(decision.count, i);
    }

    let decision = store
        .check_and_increment(RateLimitScope::Ip, "1.2.3.4", 10, window, t)
        .unwrap();
    assert!(decision.limited, "call 11 should be limited");
    assert_eq!(decision.count, 11);
}

#[test]
fn test_window_resets_after_elapsing() {
    let store = InMemoryRateLimiterStore::new();
    let t = now();
    let window = Duration::milliseconds(3_600_000);

    for _ in 0..11 {
        store
            .check_and_increment(RateLimitScope::Ip, "1.2.3.4", 10, window, t)
            .unwrap();
    }

    // Simulate the clock moving past the window
    let later = t + Duration::hours(1) + Duration::seconds(1);
    let decision = store
        .check_and_increment(RateLimitScope::Ip, "1.2.3.4", 10, window, later)
        .unwrap();
    assert!(!decision.limited, "call after window reset should pass");
    assert_eq!(decision.count, 1);
}

#[test]
fn test_keys_are_independent() {
    let store = InMemoryRateLimiterStore::new();
    let t = now();
    let window = Duration::minutes(10);

    for _ in 0..4 {
        store
            .check_and_increment(RateLimitScope::Ip, "1.2.3.4", 3, window, t)
            .unwrap();
    }
    let other = store
        .check_and_increment(RateLimitScope::Ip, "5.6.7.8", 3, window, t)
        .unwrap();
    assert!(!other.limited);

    // Same key text under a different scope is a different counter
    let email_scope = store
        .check_and_increment(RateLimitScope::Email, "1.2.3.4", 3, window, t)
        .unwrap();
    assert_eq!(email_scope.count, 1);
}

#[test]
fn test_purge_drops_elapsed_windows() {
    let store = InMemoryRateLimiterStore::new();
    let t = now();

    store
        .check_and_increment(RateLimitScope::Ip, "a", 10, Duration::seconds(1), t)
        .unwrap();
    store
        .check_and_increment(RateLimitScope::Ip, "b", 10, Duration::hours(1), t)
        .unwrap();
    assert_eq!(store.key_count(), 2);

    store.purge_expired(t + Duration::seconds(2));
    assert_eq!(store.key_count(), 1);
}

#[test]
fn test_compound_policy_ip_burst_rule() {
    let limiter = RateLimiter::with_defaults(Arc::new(InMemoryRateLimiterStore::new()));
    let t = now();

    // Distinct emails so only the per-IP rules accumulate
    for i in 0..3 {
        assert!(limiter
            .check_verification_request("9.9.9.9", &format!("u{}@gmail.com", i), t)
            .is_none());
    }

    let violation = limiter
        .check_verification_request("9.9.9.9", "u3@gmail.com", t)
        .expect("burst rule should trip on the 4th rapid request");
    assert_eq!(violation.scope, RateLimitScope::Ip);
    assert!(violation.reason.contains("short time"));
}

#[test]
fn test_compound_policy_ip_hourly_rule() {
    let limiter = RateLimiter::with_defaults(Arc::new(InMemoryRateLimiterStore::new()));
    let t = now();

    // One request every 4 minutes keeps each 10-minute burst window at
    // 3 or fewer, so the hourly rule is the first to trip.
    let mut violation = None;
    for i in 0..11 {
        let at = t + Duration::minutes(i * 4);
        violation =
            limiter.check_verification_request("9.9.9.9", &format!("user{}@gmail.com", i), at);
        if violation.is_some() {
            assert_eq!(i, 10, "only the 11th request within the hour should trip");
        }
    }

    let violation = violation.expect("11th request within the hour should be limited");
    assert_eq!(violation.scope, RateLimitScope::Ip);
    assert!(violation.reason.contains("from this IP address"));
}

#[test]
fn test_compound_policy_email_rule_has_distinct_reason() {
    let limiter = RateLimiter::with_defaults(Arc::new(InMemoryRateLimiterStore::new()));
    let t = now();

    // Rotate IPs so only the per-email rule accumulates
    for i in 0..3 {
        let ip = format!("10.0.0.{}", i);
        assert!(limiter
            .check_verification_request(&ip, "aaron@gmail.com", t)
            .is_none());
    }

    let violation = limiter
        .check_verification_request("10.0.0.99", "aaron@gmail.com", t)
        .expect("4th request for the same email should be limited");
    assert_eq!(violation.scope, RateLimitScope::Email);
    assert!(violation.reason.contains("email address"));
}

#[test]
fn test_disabled_policy_allows_everything() {
    let policy = RateLimitPolicy {
        enabled: false,
        ..RateLimitPolicy::default()
    };
    let limiter = RateLimiter::new(Arc::new(InMemoryRateLimiterStore::new()), policy);
    let t = now();

    for _ in 0..50 {
        assert!(limiter
            .check_verification_request("1.2.3.4", "aaron@gmail.com", t)
            .is_none());
    }
}

#[test]
fn test_store_failure_fails_open() {
    struct BrokenStore;

    impl RateLimiterStore for BrokenStore {
        fn check_and_increment(
            &self,
            _scope: RateLimitScope,
            _key: &str,
            _limit: u32,
            _window: Duration,
            _now: DateTime<Utc>,
        ) -> Result<RateLimitDecision, String> {
            Err("store unreachable".to_string())
        }
    }

    let limiter = RateLimiter::with_defaults(Arc::new(BrokenStore));
    let t = now();

    // Every rule errors; the request must still be allowed.
    for _ in 0..20 {
        assert!(limiter
            .check_verification_request("1.2.3.4", "aaron@gmail.com", t)
            .is_none());
    }
}

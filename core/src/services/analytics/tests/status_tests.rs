//! Traffic-light status tests, including the fail-closed path.

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::clock::{Clock, FixedClock};
use crate::domain::entities::security_alert::{AlertSeverity, AlertType};
use crate::domain::entities::verification_request::VerificationRequest;
use crate::repositories::MockVerificationRequestRepository;
use crate::services::analytics::{AnalyticsService, SecurityStatusReporter, StatusColor};
use crate::services::email_rules::EmailRuleEngine;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 24, 14, 30, 0).unwrap()
}

fn reporter(
    requests: Arc<MockVerificationRequestRepository>,
    clock: Arc<FixedClock>,
) -> SecurityStatusReporter<MockVerificationRequestRepository> {
    let analytics = AnalyticsService::new(
        Arc::clone(&requests),
        Arc::new(EmailRuleEngine::default()),
        clock.clone() as Arc<dyn Clock>,
    );
    SecurityStatusReporter::new(analytics, clock as Arc<dyn Clock>)
}

fn record(email: &str, ip: &str, created_at: DateTime<Utc>) -> VerificationRequest {
    VerificationRequest::new(email, "Test User", ip, created_at)
}

#[tokio::test]
async fn test_quiet_hour_is_green() {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    let clock = Arc::new(FixedClock::new(base_time()));

    let status = reporter(requests, clock).get_status().await;
    assert_eq!(status.status, StatusColor::Green);
    assert!(status.alerts.is_empty());
    assert!(status.summary.contains("0 requests"));
}

#[tokio::test]
async fn test_low_success_rate_is_yellow() {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    let now = base_time();
    let clock = Arc::new(FixedClock::new(now));

    // 6 of 10 verified: 60% success, below the 70% yellow line, with no
    // alert-worthy behavior anywhere
    for i in 0..10 {
        let mut req = record(
            &format!("shopper.number{}@gmail.com", i),
            &format!("1.1.1.{}", i),
            now - Duration::minutes(30) + Duration::seconds(i),
        );
        if i < 6 {
            req.mark_verified(now - Duration::minutes(29));
        }
        requests.seed(req);
    }

    let status = reporter(requests, clock).get_status().await;
    assert_eq!(status.status, StatusColor::Yellow);
    assert!(status.summary.contains("60.00%"));
}

#[tokio::test]
async fn test_high_alert_is_yellow_even_with_good_success_rate() {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    let now = base_time();
    let clock = Arc::new(FixedClock::new(now));

    // Plenty of healthy traffic keeps the success rate above 70%
    for i in 0..20 {
        let mut req = record(
            &format!("shopper.number{}@gmail.com", i),
            &format!("1.1.1.{}", i),
            now - Duration::minutes(30) + Duration::seconds(i),
        );
        req.mark_verified(now - Duration::minutes(29));
        requests.seed(req);
    }

    // One email hammered with 9 failures raises a high alert
    let mut hammered = record("gina.clark@gmail.com", "2.2.2.2", now - Duration::minutes(20));
    for i in 0..9 {
        hammered.record_failed_attempt(now - Duration::minutes(19) + Duration::seconds(i * 30));
    }
    requests.seed(hammered);

    let status = reporter(requests, clock).get_status().await;
    assert_eq!(status.status, StatusColor::Yellow);
    assert!(status
        .alerts
        .iter()
        .any(|a| a.severity == AlertSeverity::High));
}

#[tokio::test]
async fn test_critical_alert_is_red() {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    let now = base_time();
    let clock = Arc::new(FixedClock::new(now));

    let mut hammered = record("hank.lewis@gmail.com", "2.2.2.2", now - Duration::minutes(20));
    for i in 0..16 {
        hammered.record_failed_attempt(now - Duration::minutes(19) + Duration::seconds(i * 30));
    }
    requests.seed(hammered);

    let status = reporter(requests, clock).get_status().await;
    assert_eq!(status.status, StatusColor::Red);
    assert!(status
        .alerts
        .iter()
        .any(|a| a.severity == AlertSeverity::Critical));
}

#[tokio::test]
async fn test_persistence_failure_fails_closed() {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    requests.set_should_fail(true);
    let clock = Arc::new(FixedClock::new(base_time()));

    let status = reporter(requests, clock).get_status().await;
    assert_eq!(status.status, StatusColor::Red);
    assert_eq!(status.alerts.len(), 1);
    assert_eq!(status.alerts[0].alert_type, AlertType::MonitoringFailure);
    assert_eq!(status.alerts[0].severity, AlertSeverity::Critical);
}

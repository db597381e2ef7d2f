//! Event log recording and best-effort failure tests.

use std::sync::Arc;

use crate::domain::clock::{Clock, FixedClock};
use crate::domain::entities::security_event::{hash_email, SecurityEventType};
use crate::repositories::MockSecurityEventRepository;

use super::{EventLogConfig, SecurityEventLog};

fn sync_log(
    repository: Arc<MockSecurityEventRepository>,
    clock: Arc<dyn Clock>,
) -> SecurityEventLog<MockSecurityEventRepository> {
    SecurityEventLog::new(
        repository,
        clock,
        EventLogConfig {
            async_writes: false,
        },
    )
}

#[tokio::test]
async fn test_record_request_captures_context() {
    let repository = Arc::new(MockSecurityEventRepository::new());
    let clock = Arc::new(FixedClock::from_system());
    let log = sync_log(Arc::clone(&repository), clock.clone());

    log.record_request("user@gmail.com", "1.2.3.4", Some("Mozilla/5.0".into()))
        .await;

    let events = repository.of_type(SecurityEventType::VerificationRequest);
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.email.as_deref(), Some("user@gmail.com"));
    assert_eq!(event.email_hash.as_deref(), Some(hash_email("user@gmail.com").as_str()));
    assert_eq!(event.ip.as_deref(), Some("1.2.3.4"));
    assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(event.timestamp, clock.now());
    assert!(!event.processed);
}

#[tokio::test]
async fn test_success_and_failure_carry_attempt_counts() {
    let repository = Arc::new(MockSecurityEventRepository::new());
    let log = sync_log(Arc::clone(&repository), Arc::new(FixedClock::from_system()));

    log.record_success("user@gmail.com", 2).await;
    log.record_failure("user@gmail.com", 3).await;

    let success = repository.of_type(SecurityEventType::VerificationSuccess);
    assert_eq!(success[0].metadata["attempts"], 2);

    let failure = repository.of_type(SecurityEventType::VerificationFailure);
    assert_eq!(failure[0].metadata["failed_attempts"], 3);
}

#[tokio::test]
async fn test_rate_limit_and_suspicious_metadata() {
    let repository = Arc::new(MockSecurityEventRepository::new());
    let log = sync_log(Arc::clone(&repository), Arc::new(FixedClock::from_system()));

    log.record_rate_limit_hit("user@gmail.com", "1.2.3.4", "too many requests")
        .await;
    log.record_suspicious("kunj24@gmail.com", "1.2.3.4", "blocklist")
        .await;

    let hit = &repository.of_type(SecurityEventType::RateLimitHit)[0];
    assert_eq!(hit.metadata["reason"], "too many requests");

    let sus = &repository.of_type(SecurityEventType::SuspiciousActivity)[0];
    assert_eq!(sus.metadata["detail"], "blocklist");
    assert_eq!(sus.email.as_deref(), Some("kunj24@gmail.com"));
}

#[tokio::test]
async fn test_storage_failure_is_swallowed() {
    let repository = Arc::new(MockSecurityEventRepository::new());
    repository.set_should_fail(true);
    let log = sync_log(Arc::clone(&repository), Arc::new(FixedClock::from_system()));

    // Must not panic or surface an error
    log.record_request("user@gmail.com", "1.2.3.4", None).await;

    repository.set_should_fail(false);
    assert!(repository.all().is_empty());
}

#[tokio::test]
async fn test_async_writes_complete_on_the_runtime() {
    let repository = Arc::new(MockSecurityEventRepository::new());
    let log = SecurityEventLog::new(
        Arc::clone(&repository),
        Arc::new(FixedClock::from_system()),
        EventLogConfig { async_writes: true },
    );

    log.record_request("user@gmail.com", "1.2.3.4", None).await;

    // The write happens on a spawned task; yield until it lands.
    for _ in 0..100 {
        if !repository.all().is_empty() {
            break;
        }
        tokio::task::yield_now().await;
    }
    assert_eq!(repository.all().len(), 1);
}

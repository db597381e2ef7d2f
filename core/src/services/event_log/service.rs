//! Security event log service.
//!
//! Writes are best-effort by contract: a storage failure is logged and
//! swallowed, never surfaced to the verification flow that produced the
//! event.

use std::sync::Arc;

use serde_json::json;

use crate::domain::clock::Clock;
use crate::domain::entities::security_event::{SecurityEvent, SecurityEventType};
use crate::repositories::SecurityEventRepository;

/// Configuration for the event log service
#[derive(Debug, Clone)]
pub struct EventLogConfig {
    /// When true, writes are spawned onto the runtime and the caller
    /// returns immediately. Tests set this to false so events are
    /// visible as soon as `record` returns.
    pub async_writes: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self { async_writes: true }
    }
}

/// Append-only recorder for security events.
pub struct SecurityEventLog<E>
where
    E: SecurityEventRepository + 'static,
{
    repository: Arc<E>,
    clock: Arc<dyn Clock>,
    config: EventLogConfig,
}

impl<E> SecurityEventLog<E>
where
    E: SecurityEventRepository + 'static,
{
    pub fn new(repository: Arc<E>, clock: Arc<dyn Clock>, config: EventLogConfig) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Record one event. Infallible: persistence errors are logged at
    /// warn level and dropped.
    pub async fn record(&self, event: SecurityEvent) {
        if self.config.async_writes {
            let repository = Arc::clone(&self.repository);
            tokio::spawn(async move {
                if let Err(e) = repository.create(&event).await {
                    tracing::warn!(
                        event = "security_event_write_failed",
                        event_type = event.event_type.as_str(),
                        error = %e,
                        "Failed to persist security event"
                    );
                }
            });
        } else if let Err(e) = self.repository.create(&event).await {
            tracing::warn!(
                event = "security_event_write_failed",
                event_type = event.event_type.as_str(),
                error = %e,
                "Failed to persist security event"
            );
        }
    }

    /// A verification code was requested and dispatched.
    pub async fn record_request(&self, email: &str, ip: &str, user_agent: Option<String>) {
        let event = SecurityEvent::new(SecurityEventType::VerificationRequest, self.clock.now())
            .with_email(email)
            .with_ip(ip)
            .with_user_agent(user_agent);
        self.record(event).await;
    }

    /// A submitted code matched.
    pub async fn record_success(&self, email: &str, attempts: u32) {
        let event = SecurityEvent::new(SecurityEventType::VerificationSuccess, self.clock.now())
            .with_email(email)
            .with_metadata(json!({ "attempts": attempts }));
        self.record(event).await;
    }

    /// A submitted code did not match.
    pub async fn record_failure(&self, email: &str, failed_attempts: u32) {
        let event = SecurityEvent::new(SecurityEventType::VerificationFailure, self.clock.now())
            .with_email(email)
            .with_metadata(json!({ "failed_attempts": failed_attempts }));
        self.record(event).await;
    }

    /// A request was refused by the rate limiter.
    pub async fn record_rate_limit_hit(&self, email: &str, ip: &str, reason: &str) {
        let event = SecurityEvent::new(SecurityEventType::RateLimitHit, self.clock.now())
            .with_email(email)
            .with_ip(ip)
            .with_metadata(json!({ "reason": reason }));
        self.record(event).await;
    }

    /// A request tripped a fraud heuristic or other suspicion signal.
    pub async fn record_suspicious(&self, email: &str, ip: &str, detail: &str) {
        let event = SecurityEvent::new(SecurityEventType::SuspiciousActivity, self.clock.now())
            .with_email(email)
            .with_ip(ip)
            .with_metadata(json!({ "detail": detail }));
        self.record(event).await;
    }
}

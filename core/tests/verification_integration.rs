//! End-to-end verification flow over the crate's public API.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::{Arc, Mutex};

use sg_core::domain::clock::{Clock, FixedClock};
use sg_core::errors::SecurityError;
use sg_core::repositories::{MockAccountDirectory, MockSecurityEventRepository, MockVerificationRequestRepository};
use sg_core::services::email_rules::EmailRuleEngine;
use sg_core::services::event_log::{EventLogConfig, SecurityEventLog};
use sg_core::services::rate_limit::{InMemoryRateLimiterStore, RateLimiter};
use sg_core::services::verification::{
    DeliveryError, EmailSenderTrait, VerificationManager, VerificationServiceConfig,
};

/// Minimal capturing mailer for the integration flow.
struct CapturingMailer {
    codes: Mutex<Vec<String>>,
}

impl CapturingMailer {
    fn new() -> Self {
        Self {
            codes: Mutex::new(Vec::new()),
        }
    }

    fn last_code(&self) -> String {
        self.codes.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl EmailSenderTrait for CapturingMailer {
    async fn send_verification_code(
        &self,
        _email: &str,
        _name: &str,
        code: &str,
    ) -> Result<String, DeliveryError> {
        let mut codes = self.codes.lock().unwrap();
        codes.push(code.to_string());
        Ok(format!("msg-{}", codes.len()))
    }
}

struct Harness {
    requests: Arc<MockVerificationRequestRepository>,
    mailer: Arc<CapturingMailer>,
    clock: Arc<FixedClock>,
    manager: VerificationManager<
        MockVerificationRequestRepository,
        MockAccountDirectory,
        CapturingMailer,
        InMemoryRateLimiterStore,
        MockSecurityEventRepository,
    >,
}

fn harness() -> Harness {
    let requests = Arc::new(MockVerificationRequestRepository::new());
    let accounts = Arc::new(MockAccountDirectory::new());
    let mailer = Arc::new(CapturingMailer::new());
    let events = Arc::new(MockSecurityEventRepository::new());
    let clock = Arc::new(FixedClock::from_system());

    let manager = VerificationManager::new(
        Arc::clone(&requests),
        accounts,
        Arc::clone(&mailer),
        RateLimiter::with_defaults(Arc::new(InMemoryRateLimiterStore::new())),
        SecurityEventLog::new(
            events,
            clock.clone() as Arc<dyn Clock>,
            EventLogConfig {
                async_writes: false,
            },
        ),
        Arc::new(EmailRuleEngine::default()),
        clock.clone() as Arc<dyn Clock>,
        VerificationServiceConfig::default(),
    );

    Harness {
        requests,
        mailer,
        clock,
        manager,
    }
}

#[tokio::test]
async fn test_three_requests_pass_then_fourth_is_limited() {
    let h = harness();

    // Distinct IPs isolate the per-email rule
    for i in 0..3 {
        let outcome = h
            .manager
            .request_code(
                "newcomer@gmail.com",
                "New Shopper",
                &format!("10.1.{}.1", i),
                None,
            )
            .await
            .unwrap();
        assert_eq!(outcome.expires_in_minutes, 10);
    }

    let err = h
        .manager
        .request_code("newcomer@gmail.com", "New Shopper", "10.1.99.1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SecurityError::RateLimited { .. }));
}

#[tokio::test]
async fn test_supersession_leaves_exactly_one_live_record() {
    let h = harness();

    h.manager
        .request_code("newcomer@gmail.com", "New Shopper", "10.1.0.1", None)
        .await
        .unwrap();
    h.manager
        .request_code("newcomer@gmail.com", "New Shopper", "10.1.1.1", None)
        .await
        .unwrap();

    let stored = h.requests.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].code, h.mailer.last_code());
}

#[tokio::test]
async fn test_expiry_boundaries_end_to_end() {
    let h = harness();

    h.manager
        .request_code("newcomer@gmail.com", "New Shopper", "10.1.0.1", None)
        .await
        .unwrap();
    let code = h.mailer.last_code();

    // Just inside the 10-minute validity window
    h.clock.advance(Duration::minutes(9) + Duration::seconds(59));
    h.manager.verify_code("newcomer@gmail.com", &code).await.unwrap();

    // A fresh request, then just past the window
    h.manager
        .request_code("latecomer@gmail.com", "Late Shopper", "10.2.0.1", None)
        .await
        .unwrap();
    let code = h.mailer.last_code();
    h.clock.advance(Duration::minutes(10) + Duration::seconds(1));
    let err = h
        .manager
        .verify_code("latecomer@gmail.com", &code)
        .await
        .unwrap_err();
    assert!(matches!(err, SecurityError::Expired));
}

//! Mock mailer for development and testing.
//!
//! Logs the code instead of sending it, so the full signup flow can be
//! exercised without a mail provider account. Failure injection covers
//! both halves of the delivery error taxonomy.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use sg_core::services::verification::{DeliveryError, EmailSenderTrait};

/// What the mailer does with the next send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MailerFailureMode {
    /// Deliver normally
    #[default]
    None,
    /// Reject as if the mailbox does not exist
    Permanent,
    /// Fail as if the provider timed out
    Transient,
}

/// Logging mailer with injectable failures.
pub struct MockMailer {
    sent_count: AtomicU64,
    failure_mode: Mutex<MailerFailureMode>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent_count: AtomicU64::new(0),
            failure_mode: Mutex::new(MailerFailureMode::None),
        }
    }

    pub fn set_failure_mode(&self, mode: MailerFailureMode) {
        *self.failure_mode.lock().unwrap() = mode;
    }

    /// Emails delivered so far.
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSenderTrait for MockMailer {
    async fn send_verification_code(
        &self,
        email: &str,
        name: &str,
        code: &str,
    ) -> Result<String, DeliveryError> {
        match *self.failure_mode.lock().unwrap() {
            MailerFailureMode::Permanent => {
                return Err(DeliveryError::Permanent(
                    "mailbox does not exist".to_string(),
                ))
            }
            MailerFailureMode::Transient => {
                return Err(DeliveryError::Transient("provider timeout".to_string()))
            }
            MailerFailureMode::None => {}
        }

        let message_id = format!("mock-{}", Uuid::new_v4());
        self.sent_count.fetch_add(1, Ordering::SeqCst);
        info!(
            email = %email,
            name = %name,
            code = %code,
            message_id = %message_id,
            event = "mock_email_sent",
            "Mock mailer delivered verification code"
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delivers_and_counts() {
        let mailer = MockMailer::new();
        let id = mailer
            .send_verification_code("a@gmail.com", "A", "123456")
            .await
            .unwrap();
        assert!(id.starts_with("mock-"));
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let mailer = MockMailer::new();

        mailer.set_failure_mode(MailerFailureMode::Permanent);
        let err = mailer
            .send_verification_code("a@gmail.com", "A", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Permanent(_)));

        mailer.set_failure_mode(MailerFailureMode::Transient);
        let err = mailer
            .send_verification_code("a@gmail.com", "A", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transient(_)));

        assert_eq!(mailer.sent_count(), 0);

        mailer.set_failure_mode(MailerFailureMode::None);
        mailer
            .send_verification_code("a@gmail.com", "A", "123456")
            .await
            .unwrap();
        assert_eq!(mailer.sent_count(), 1);
    }
}

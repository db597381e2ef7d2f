//! Outbound email delivery seam.

use async_trait::async_trait;
use thiserror::Error;

/// Why a verification email could not be delivered.
///
/// The split matters to callers: a permanent failure means the address
/// is bad and retrying is pointless, a transient one means the provider
/// or network hiccuped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Email could not be delivered to this address: {0}")]
    Permanent(String),

    #[error("Email delivery failed, please try again: {0}")]
    Transient(String),
}

/// Sends verification codes over email.
///
/// Implementations live in the infra crate (SMTP, provider APIs, mocks).
#[async_trait]
pub trait EmailSenderTrait: Send + Sync {
    /// Deliver a code to `email`, addressing the recipient by `name`.
    /// Returns the provider's message id on success.
    async fn send_verification_code(
        &self,
        email: &str,
        name: &str,
        code: &str,
    ) -> Result<String, DeliveryError>;
}

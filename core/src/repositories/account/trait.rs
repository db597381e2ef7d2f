//! Read-only seam onto the storefront's user store.

use async_trait::async_trait;

use crate::errors::SecurityError;

/// Answers whether an email already belongs to a registered account.
///
/// The user store itself lives outside this crate; verification only
/// needs this one lookup to refuse codes for already-registered emails.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn email_registered(&self, email: &str) -> Result<bool, SecurityError>;
}

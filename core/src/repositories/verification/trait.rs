//! Repository trait for verification request persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::verification_request::VerificationRequest;
use crate::errors::SecurityError;

/// Persistence contract for the `verification_requests` collection.
///
/// Backed by a document store in production; implementations map onto
/// insert-one / find-by-filter / delete-many-by-filter operations.
#[async_trait]
pub trait VerificationRequestRepository: Send + Sync {
    /// Insert a new pending request.
    async fn insert(&self, request: &VerificationRequest) -> Result<(), SecurityError>;

    /// Find the request for an email, if one exists.
    async fn find_by_email(&self, email: &str)
        -> Result<Option<VerificationRequest>, SecurityError>;

    /// Persist attempt counters and verification state for an existing
    /// request, matched by email.
    async fn update(&self, request: &VerificationRequest) -> Result<(), SecurityError>;

    /// Delete every prior request for `request.email` and insert the new
    /// one, atomically with respect to that email. Two concurrent calls
    /// for the same email must never leave two live requests behind.
    ///
    /// Returns the number of superseded records.
    async fn supersede(&self, request: &VerificationRequest) -> Result<u64, SecurityError>;

    /// Delete all requests for an email. Returns the number removed.
    async fn delete_by_email(&self, email: &str) -> Result<u64, SecurityError>;

    /// Delete all requests whose expiry lies before `now`. Idempotent.
    /// Returns the number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SecurityError>;

    /// All requests created at or after `since`, for analytics.
    async fn find_created_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationRequest>, SecurityError>;
}

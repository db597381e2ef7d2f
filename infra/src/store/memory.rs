//! In-memory repositories over single-lock collections.
//!
//! Each collection sits behind one mutex, so every repository operation
//! is atomic with respect to the others. That gives `supersede` the
//! per-email atomicity the verification flow relies on without any
//! extra locking scheme.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use sg_core::domain::entities::security_event::{SecurityEvent, SecurityEventType};
use sg_core::domain::entities::verification_request::VerificationRequest;
use sg_core::errors::SecurityError;
use sg_core::repositories::{SecurityEventRepository, VerificationRequestRepository};

/// Verification request collection backed by a locked `Vec`.
#[derive(Default)]
pub struct InMemoryVerificationStore {
    requests: Mutex<Vec<VerificationRequest>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests, for tests and diagnostics.
    pub fn len(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VerificationRequestRepository for InMemoryVerificationStore {
    async fn insert(&self, request: &VerificationRequest) -> Result<(), SecurityError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<VerificationRequest>, SecurityError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests.iter().find(|r| r.email == email).cloned())
    }

    async fn update(&self, request: &VerificationRequest) -> Result<(), SecurityError> {
        let mut requests = self.requests.lock().unwrap();
        match requests.iter_mut().find(|r| r.email == request.email) {
            Some(existing) => {
                *existing = request.clone();
                Ok(())
            }
            None => Err(SecurityError::NotFound),
        }
    }

    async fn supersede(&self, request: &VerificationRequest) -> Result<u64, SecurityError> {
        // Single critical section: delete-all-for-email plus insert.
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.email != request.email);
        let removed = (before - requests.len()) as u64;
        requests.push(request.clone());
        Ok(removed)
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, SecurityError> {
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.email != email);
        Ok((before - requests.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SecurityError> {
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.expires_at >= now);
        let removed = (before - requests.len()) as u64;
        if removed > 0 {
            tracing::debug!(
                removed,
                event = "verification_store_sweep",
                "Swept expired verification requests"
            );
        }
        Ok(removed)
    }

    async fn find_created_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationRequest>, SecurityError> {
        let requests = self.requests.lock().unwrap();
        Ok(requests
            .iter()
            .filter(|r| r.created_at >= since)
            .cloned()
            .collect())
    }
}

/// Append-only security event collection backed by a locked `Vec`.
#[derive(Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<SecurityEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SecurityEventRepository for InMemoryEventStore {
    async fn create(&self, event: &SecurityEvent) -> Result<(), SecurityError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SecurityEvent>, SecurityError> {
        let events = self.events.lock().unwrap();
        let mut result: Vec<SecurityEvent> = events
            .iter()
            .filter(|e| e.timestamp >= since)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        result.truncate(limit);
        Ok(result)
    }

    async fn count_by_type_since(
        &self,
        event_type: SecurityEventType,
        since: DateTime<Utc>,
    ) -> Result<u64, SecurityError> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| e.event_type == event_type && e.timestamp >= since)
            .count() as u64)
    }
}

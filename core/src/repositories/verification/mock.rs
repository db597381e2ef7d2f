//! Mock implementation of VerificationRequestRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::domain::entities::verification_request::VerificationRequest;
use crate::errors::SecurityError;

use super::VerificationRequestRepository;

/// In-memory mock with failure injection for unit tests.
pub struct MockVerificationRequestRepository {
    requests: Arc<Mutex<Vec<VerificationRequest>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockVerificationRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every operation return an internal error.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Snapshot of all stored requests.
    pub fn all(&self) -> Vec<VerificationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Seed a request directly, bypassing the service layer.
    pub fn seed(&self, request: VerificationRequest) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn clear(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn fail_if_configured(&self) -> Result<(), SecurityError> {
        if *self.should_fail.lock().unwrap() {
            Err(SecurityError::internal("mock repository error"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockVerificationRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationRequestRepository for MockVerificationRequestRepository {
    async fn insert(&self, request: &VerificationRequest) -> Result<(), SecurityError> {
        self.fail_if_configured()?;
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<VerificationRequest>, SecurityError> {
        self.fail_if_configured()?;
        let requests = self.requests.lock().unwrap();
        Ok(requests.iter().find(|r| r.email == email).cloned())
    }

    async fn update(&self, request: &VerificationRequest) -> Result<(), SecurityError> {
        self.fail_if_configured()?;
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
        self.fail_if_configured()?;
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.email != request.email);
        let removed = (before - requests.len()) as u64;
        requests.push(request.clone());
        Ok(removed)
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, SecurityError> {
        self.fail_if_configured()?;
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.email != email);
        Ok((before - requests.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, SecurityError> {
        self.fail_if_configured()?;
        let mut requests = self.requests.lock().unwrap();
        let before = requests.len();
        requests.retain(|r| r.expires_at >= now);
        Ok((before - requests.len()) as u64)
    }

    async fn find_created_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<VerificationRequest>, SecurityError> {
        self.fail_if_configured()?;
        let requests = self.requests.lock().unwrap();
        Ok(requests
            .iter()
            .filter(|r| r.created_at >= since)
            .cloned()
            .collect())
    }
}

//! Mock implementation of SecurityEventRepository for testing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

use crate::domain::entities::security_event::{SecurityEvent, SecurityEventType};
use crate::errors::SecurityError;

use super::SecurityEventRepository;

/// In-memory mock with failure injection for unit tests.
pub struct MockSecurityEventRepository {
    events: Arc<Mutex<Vec<SecurityEvent>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockSecurityEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Snapshot of all recorded events.
    pub fn all(&self) -> Vec<SecurityEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Events of one type, in insertion order.
    pub fn of_type(&self, event_type: SecurityEventType) -> Vec<SecurityEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn fail_if_configured(&self) -> Result<(), SecurityError> {
        if *self.should_fail.lock().unwrap() {
            Err(SecurityError::internal("mock repository error"))
        } else {
            Ok(())
        }
    }
}

impl Default for MockSecurityEventRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecurityEventRepository for MockSecurityEventRepository {
    async fn create(&self, event: &SecurityEvent) -> Result<(), SecurityError> {
        self.fail_if_configured()?;
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn find_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SecurityEvent>, SecurityError> {
        self.fail_if_configured()?;
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
        self.fail_if_configured()?;
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|e| e.event_type == event_type && e.timestamp >= since)
            .count() as u64)
    }
}

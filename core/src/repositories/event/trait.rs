//! Repository trait for security event persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::security_event::{SecurityEvent, SecurityEventType};
use crate::errors::SecurityError;

/// Persistence contract for the append-only `security_events` collection.
#[async_trait]
pub trait SecurityEventRepository: Send + Sync {
    /// Append one event. Callers treat failures as best-effort.
    async fn create(&self, event: &SecurityEvent) -> Result<(), SecurityError>;

    /// Events at or after `since`, newest first, capped at `limit`.
    async fn find_since(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SecurityEvent>, SecurityError>;

    /// Count events of one type at or after `since`.
    async fn count_by_type_since(
        &self,
        event_type: SecurityEventType,
        since: DateTime<Utc>,
    ) -> Result<u64, SecurityError>;
}

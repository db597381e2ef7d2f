//! Windowed security analytics, threat scoring and status reporting.
//!
//! Everything here is derived: snapshots are recomputed from persisted
//! verification records on every call and never cached, so monitoring
//! consumers can never read a stale threat level.

mod scorer;
mod service;
mod status;

#[cfg(test)]
mod tests;

pub use scorer::threat_level;
pub use service::AnalyticsService;
pub use status::{SecurityStatus, SecurityStatusReporter, StatusColor};

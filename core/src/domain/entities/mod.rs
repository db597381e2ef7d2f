//! Domain entities representing the security engine's core objects.

pub mod analytics;
pub mod security_alert;
pub mod security_event;
pub mod verification_request;

// Re-export commonly used types
pub use analytics::{
    AdvancedMetrics, AnalyticsSnapshot, FailedEmailEntry, IpActivityEntry, ThreatLevel, Timeframe,
    TrendMetrics, UserAgentCount,
};
pub use security_alert::{AlertSeverity, AlertType, SecurityAlert};
pub use security_event::{hash_email, SecurityEvent, SecurityEventType};
pub use verification_request::{VerificationRequest, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES};

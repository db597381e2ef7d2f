//! Business services containing the security engine's logic.

pub mod analytics;
pub mod email_rules;
pub mod event_log;
pub mod rate_limit;
pub mod threat;
pub mod verification;

// Re-export commonly used types
pub use analytics::{AnalyticsService, SecurityStatus, SecurityStatusReporter, StatusColor};
pub use email_rules::{EmailRule, EmailRuleEngine, RuleCategory};
pub use event_log::{EventLogConfig, SecurityEventLog};
pub use rate_limit::{
    InMemoryRateLimiterStore, RateLimitDecision, RateLimitPolicy, RateLimitRule, RateLimitScope,
    RateLimitViolation, RateLimiter, RateLimiterStore,
};
pub use threat::{detect_bot_traffic, detect_geo_anomaly, detect_timing_attack, BotDetection};
pub use verification::{
    DeliveryError, EmailSenderTrait, RequestCodeOutcome, VerificationManager,
    VerificationServiceConfig,
};

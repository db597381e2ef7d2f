//! Derived security alerts emitted by the analytics pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Categories of security alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    SuspiciousIp,
    RepeatedFailures,
    RapidRequests,
    FakeEmailPattern,
    BotDetection,
    GeoAnomaly,
    TimingAttack,
    /// Synthetic alert emitted when the monitoring pipeline itself fails
    MonitoringFailure,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuspiciousIp => "suspicious_ip",
            Self::RepeatedFailures => "repeated_failures",
            Self::RapidRequests => "rapid_requests",
            Self::FakeEmailPattern => "fake_email_pattern",
            Self::BotDetection => "bot_detection",
            Self::GeoAnomaly => "geo_anomaly",
            Self::TimingAttack => "timing_attack",
            Self::MonitoringFailure => "monitoring_failure",
        }
    }
}

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Contribution of one alert of this severity to the threat score.
    pub fn score_weight(&self) -> u32 {
        match self {
            Self::Low => 1,
            Self::Medium => 3,
            Self::High => 6,
            Self::Critical => 10,
        }
    }
}

/// A derived security alert.
///
/// Alerts are never the source of truth; they are recomputed from
/// persisted verification records on every analytics run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityAlert {
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub details: String,
    pub ip: Option<String>,
    pub email: Option<String>,
    pub count: Option<u64>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<JsonValue>,
}

impl SecurityAlert {
    pub fn new(
        alert_type: AlertType,
        severity: AlertSeverity,
        details: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            alert_type,
            severity,
            details: details.into(),
            ip: None,
            email: None,
            count: None,
            timestamp,
            metadata: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_and_weights() {
        assert!(AlertSeverity::Critical > AlertSeverity::High);
        assert!(AlertSeverity::High > AlertSeverity::Medium);
        assert!(AlertSeverity::Medium > AlertSeverity::Low);

        assert_eq!(AlertSeverity::Critical.score_weight(), 10);
        assert_eq!(AlertSeverity::High.score_weight(), 6);
        assert_eq!(AlertSeverity::Medium.score_weight(), 3);
        assert_eq!(AlertSeverity::Low.score_weight(), 1);
    }

    #[test]
    fn test_alert_builder() {
        let alert = SecurityAlert::new(
            AlertType::RepeatedFailures,
            AlertSeverity::High,
            "9 failed attempts without success",
            Utc::now(),
        )
        .with_email("target@gmail.com")
        .with_count(9);

        assert_eq!(alert.alert_type.as_str(), "repeated_failures");
        assert_eq!(alert.count, Some(9));
        assert_eq!(alert.email.as_deref(), Some("target@gmail.com"));
        assert!(alert.ip.is_none());
    }
}

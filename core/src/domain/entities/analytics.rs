//! Derived analytics aggregates over a reporting timeframe.
//!
//! Snapshots are recomputed from persisted verification records on every
//! call and never stored, so a stale snapshot can never masquerade as
//! current threat state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::security_alert::SecurityAlert;

/// Reporting window for analytics queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Timeframe {
    LastHour,
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl Timeframe {
    /// Wire representation used by API consumers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::Last24Hours => "24h",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1h" => Some(Self::LastHour),
            "24h" => Some(Self::Last24Hours),
            "7d" => Some(Self::Last7Days),
            "30d" => Some(Self::Last30Days),
            _ => None,
        }
    }

    /// Length of the window.
    pub fn duration(&self) -> Duration {
        match self {
            Self::LastHour => Duration::hours(1),
            Self::Last24Hours => Duration::hours(24),
            Self::Last7Days => Duration::days(7),
            Self::Last30Days => Duration::days(30),
        }
    }
}

/// Aggregated threat classification for a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// An email that keeps failing verification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedEmailEntry {
    pub email: String,
    /// Failed attempts accumulated in the window
    pub attempts: u64,
}

/// Request activity for a single IP
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IpActivityEntry {
    pub ip: String,
    pub requests: u64,
    pub successes: u64,
}

/// One bucket of the truncated user-agent histogram
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAgentCount {
    pub user_agent: String,
    pub count: u64,
}

/// Trend figures derived from the window's records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendMetrics {
    /// Percentage of requests that verified, rounded to 2 decimals.
    /// 100.0 for an empty window: no traffic is healthy traffic.
    pub success_rate: f64,
    /// Mean failed attempts per successful verification, 0 without successes
    pub average_attempts_per_verification: f64,
    /// Hour of day (0-23) with the most requests
    pub peak_hour: u8,
}

/// Behavioral metrics computed by the threat detector per record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvancedMetrics {
    /// Records whose user agent / timings classify as bot traffic
    pub bot_traffic: u64,
    /// Top user agents (truncated), most frequent first
    pub suspicious_user_agents: Vec<UserAgentCount>,
    /// Records with 5 or more failed attempts
    pub rapid_fire_attacks: u64,
    /// Records whose attempt timings are suspiciously uniform
    pub timing_attack_attempts: u64,
    /// Records whose IP is inconsistent with the email's recent history
    pub geo_anomalies: u64,
    /// Weighted classification over alerts and the metrics above
    pub threat_level: ThreatLevel,
}

/// Full analytics aggregate for one timeframe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSnapshot {
    pub timeframe: Timeframe,
    pub generated_at: DateTime<Utc>,
    pub total_requests: u64,
    pub successful_verifications: u64,
    pub unique_ips: u64,
    pub unique_emails: u64,
    /// Emails with >= 3 failed attempts and no success, worst first, top 10
    pub top_failed_emails: Vec<FailedEmailEntry>,
    /// Busiest IPs, top 10
    pub top_ips: Vec<IpActivityEntry>,
    /// Requests per hour of day
    pub hourly_histogram: [u64; 24],
    pub trends: TrendMetrics,
    pub alerts: Vec<SecurityAlert>,
    pub advanced_metrics: AdvancedMetrics,
}

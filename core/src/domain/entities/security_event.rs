//! Append-only security event entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Event types recorded by the security event log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    VerificationRequest,
    VerificationSuccess,
    VerificationFailure,
    RateLimitHit,
    SuspiciousActivity,
}

impl SecurityEventType {
    /// String representation used for document storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VerificationRequest => "verification_request",
            Self::VerificationSuccess => "verification_success",
            Self::VerificationFailure => "verification_failure",
            Self::RateLimitHit => "rate_limit_hit",
            Self::SuspiciousActivity => "suspicious_activity",
        }
    }

    /// Parse from the stored string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "verification_request" => Some(Self::VerificationRequest),
            "verification_success" => Some(Self::VerificationSuccess),
            "verification_failure" => Some(Self::VerificationFailure),
            "rate_limit_hit" => Some(Self::RateLimitHit),
            "suspicious_activity" => Some(Self::SuspiciousActivity),
            _ => None,
        }
    }
}

/// A single append-only security event.
///
/// Events are immutable once written; `processed` is flipped later by a
/// downstream consumer outside this crate. Persistence is best-effort:
/// a lost event must never fail the verification flow that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityEvent {
    /// Unique identifier for the event
    pub id: Uuid,

    /// What happened
    pub event_type: SecurityEventType,

    /// Email involved, if any
    pub email: Option<String>,

    /// SHA-256 of the email for correlation without exposing the address
    pub email_hash: Option<String>,

    /// Originating IP, if known
    pub ip: Option<String>,

    /// User agent string, if known
    pub user_agent: Option<String>,

    /// Free-form event data
    pub metadata: JsonValue,

    /// When the event occurred
    pub timestamp: DateTime<Utc>,

    /// Whether a downstream consumer has handled this event
    pub processed: bool,
}

impl SecurityEvent {
    /// Create a new event with empty context.
    pub fn new(event_type: SecurityEventType, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            email: None,
            email_hash: None,
            ip: None,
            user_agent: None,
            metadata: JsonValue::Null,
            timestamp,
            processed: false,
        }
    }

    /// Attach the email, hashing it alongside for correlation.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into();
        self.email_hash = Some(hash_email(&email));
        self.email = Some(email);
        self
    }

    /// Attach the originating IP.
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Attach the user agent, if present.
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Attach free-form metadata.
    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Hash an email address for correlation in logs and events.
pub fn hash_email(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.to_lowercase().as_bytes());
    hex::encode(hasher.finalize())
}

//! Verification request entity for email ownership checks before signup.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default expiration time for verification requests (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// A pending proof-of-email-ownership record with a short-lived numeric code.
///
/// At most one non-superseded, non-expired request exists per email:
/// creating a new request supersedes (deletes) any prior request for the
/// same address. The record is mutated in place on every verify attempt
/// and marked `verified` on success; expired and verified records are
/// removed by the opportunistic cleanup sweep or by supersession.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Email address the code was sent to (lowercased, acts as the key)
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Display name supplied with the signup attempt
    pub name: String,

    /// IP address the request originated from
    pub client_ip: String,

    /// User agent string from the request, if any
    pub user_agent: Option<String>,

    /// Timestamp when the request was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully verified
    pub verified: bool,

    /// Total number of verification attempts made
    pub attempts: u32,

    /// Number of failed verification attempts
    pub failed_attempts: u32,

    /// Timestamp of the most recent verification attempt
    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Milliseconds between consecutive failed attempts, used by the
    /// threat detector for bot and timing analysis
    pub attempt_timings: Vec<i64>,
}

impl VerificationRequest {
    /// Create a new pending request with a CSPRNG-generated code and the
    /// default 10-minute expiry.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        client_ip: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new_with_expiration(email, name, client_ip, now, DEFAULT_EXPIRATION_MINUTES)
    }

    /// Create a new pending request with a custom expiry.
    pub fn new_with_expiration(
        email: impl Into<String>,
        name: impl Into<String>,
        client_ip: impl Into<String>,
        now: DateTime<Utc>,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            email: email.into(),
            code: Self::generate_code(),
            name: name.into(),
            client_ip: client_ip.into(),
            user_agent: None,
            created_at: now,
            expires_at: now + Duration::minutes(expiration_minutes),
            verified: false,
            attempts: 0,
            failed_attempts: 0,
            last_attempt_at: None,
            attempt_timings: Vec::new(),
        }
    }

    /// Attach the request's user agent.
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Generate a cryptographically secure random 6-digit code.
    ///
    /// Uses the OS CSPRNG. The modulo introduces a negligible bias for
    /// 6-digit codes.
    pub fn generate_code() -> String {
        let mut rng = OsRng;
        let mut bytes = [0u8; 4];
        rng.fill_bytes(&mut bytes);
        let num = u32::from_le_bytes(bytes) % 1_000_000;
        format!("{:06}", num)
    }

    /// Whether the request has passed its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether the request can still accept verification attempts.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.verified && !self.is_expired(now)
    }

    /// Constant-time comparison against a candidate code.
    pub fn matches_code(&self, candidate: &str) -> bool {
        self.code.len() == candidate.len()
            && constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Record a failed verification attempt.
    ///
    /// Increments both counters, appends the inter-attempt interval in
    /// milliseconds (0 for the first attempt) and stamps
    /// `last_attempt_at`.
    pub fn record_failed_attempt(&mut self, now: DateTime<Utc>) {
        let interval_ms = self
            .last_attempt_at
            .map(|last| (now - last).num_milliseconds().max(0))
            .unwrap_or(0);
        self.attempts += 1;
        self.failed_attempts += 1;
        self.attempt_timings.push(interval_ms);
        self.last_attempt_at = Some(now);
    }

    /// Mark the request verified after a successful code match.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.attempts += 1;
        self.verified = true;
        self.last_attempt_at = Some(now);
    }

    /// Time remaining until expiry, zero if already expired.
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

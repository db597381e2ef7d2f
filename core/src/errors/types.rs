//! Error taxonomy for verification, rate limiting and analytics.
//!
//! Validation, rate-limit and heuristic rejections carry actionable,
//! user-facing messages and are returned to the caller directly.
//! Internal and persistence faults are logged in full by the services
//! and surface here with a generic message only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of an outbound email delivery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryFailureKind {
    /// The mailbox does not exist or the provider rejected the address.
    Permanent,
    /// Network or provider fault; the caller may retry later.
    Transient,
}

/// Errors surfaced by the security engine.
#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{reason}")]
    RateLimited {
        reason: String,
        retry_after_seconds: u64,
    },

    #[error("This email address was rejected. Please use a valid personal email address.")]
    HeuristicRejected,

    #[error("{message}")]
    DeliveryFailed {
        kind: DeliveryFailureKind,
        message: String,
    },

    #[error("Verification code has expired. Please request a new one.")]
    Expired,

    #[error("Invalid verification code.")]
    CodeMismatch,

    #[error("No active verification request found for this email.")]
    NotFound,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SecurityError {
    /// Stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            Self::HeuristicRejected => "EMAIL_REJECTED",
            Self::DeliveryFailed { .. } => "DELIVERY_FAILED",
            Self::Expired => "CODE_EXPIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::NotFound => "REQUEST_NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// HTTP status the surrounding transport layer maps this error to.
    ///
    /// The HTTP layer itself lives outside this crate; the mapping is
    /// kept here so both sides agree on it.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. }
            | Self::HeuristicRejected
            | Self::Expired
            | Self::CodeMismatch
            | Self::NotFound => 400,
            Self::RateLimited { .. } => 429,
            Self::DeliveryFailed { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Shorthand for an internal error wrapping a lower-level failure.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

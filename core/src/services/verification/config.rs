//! Verification service configuration.

use serde::{Deserialize, Serialize};

use crate::domain::entities::verification_request::DEFAULT_EXPIRATION_MINUTES;

fn default_expiration_minutes() -> i64 {
    DEFAULT_EXPIRATION_MINUTES
}

fn default_allowed_domains() -> Vec<String> {
    vec!["gmail.com".to_string()]
}

fn default_cleanup() -> bool {
    true
}

/// Configuration for [`super::VerificationManager`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationServiceConfig {
    /// Minutes a code stays valid after issue
    #[serde(default = "default_expiration_minutes")]
    pub code_expiration_minutes: i64,

    /// Domains accepted for signup. Empty means any domain.
    #[serde(default = "default_allowed_domains")]
    pub allowed_email_domains: Vec<String>,

    /// Run an expired-record sweep at the start of each code request
    #[serde(default = "default_cleanup")]
    pub cleanup_before_request: bool,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: default_expiration_minutes(),
            allowed_email_domains: default_allowed_domains(),
            cleanup_before_request: default_cleanup(),
        }
    }
}

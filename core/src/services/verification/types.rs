//! Result types for the verification service.

use serde::{Deserialize, Serialize};

/// Successful outcome of a code request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestCodeOutcome {
    /// Normalized (lowercased, trimmed) email the code was sent to
    pub email: String,

    /// Minutes until the code expires
    pub expires_in_minutes: i64,

    /// Provider message id of the delivery
    pub message_id: String,
}

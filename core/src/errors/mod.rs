//! Error types for the security engine.

mod types;

pub use types::{DeliveryFailureKind, SecurityError};

/// Convenience alias used throughout the crate.
pub type SecurityResult<T> = Result<T, SecurityError>;

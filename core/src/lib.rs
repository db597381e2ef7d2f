//! # StoreGate Security Core
//!
//! Pre-signup abuse prevention and security analytics for the StoreGate
//! backend. This crate contains the verification-code lifecycle, keyed
//! rate limiting, heuristic fraud filtering of email addresses, the
//! append-only security event log, and the windowed analytics and
//! threat-scoring pipeline.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

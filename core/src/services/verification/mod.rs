//! Email verification before account signup.
//!
//! Owns the full lifecycle of a verification request: issuing a code,
//! emailing it, checking submitted codes and cleaning up expired
//! records. The rate limiter, email heuristics and event log are all
//! applied here so callers get a single entry point.

mod config;
mod service;
mod traits;
mod types;


pub use config::VerificationServiceConfig;
pub use service::VerificationManager;
pub use traits::{DeliveryError, EmailSenderTrait};
pub use types::RequestCodeOutcome;

//! Keyed rate limiting with fixed time windows.
//!
//! Counters are ephemeral and owned by the limiter store; the compound
//! verification policy (per-IP hourly, per-IP burst, per-email hourly)
//! is applied by [`RateLimiter`] on top of any [`RateLimiterStore`]
//! implementation. The bundled in-memory store is per process instance;
//! scale-out deployments swap in a shared store behind the same trait.

mod config;
mod service;
mod store;

#[cfg(test)]
mod tests;

pub use config::{RateLimitPolicy, RateLimitRule};
pub use service::{RateLimitViolation, RateLimiter};
pub use store::{InMemoryRateLimiterStore, RateLimitDecision, RateLimitScope, RateLimiterStore};

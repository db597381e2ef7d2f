//! Tests for the rate limiter.

#[cfg(test)]
mod rate_limiter_tests;

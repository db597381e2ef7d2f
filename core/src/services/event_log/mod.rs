//! Fire-and-forget security event logging.

mod service;

#[cfg(test)]
mod tests;

pub use service::{EventLogConfig, SecurityEventLog};

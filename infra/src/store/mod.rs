//! In-memory document store stand-ins for the two collections.

mod memory;

pub use memory::{InMemoryEventStore, InMemoryVerificationStore};

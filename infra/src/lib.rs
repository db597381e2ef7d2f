//! # StoreGate Infrastructure
//!
//! Concrete collaborator implementations for the security core: an
//! in-memory document store backing the verification and event
//! repositories, a mock outbound mailer with failure injection, and an
//! in-memory account directory. The production document store and mail
//! provider adapters plug in behind the same `sg_core` traits.

pub mod accounts;
pub mod mail;
pub mod store;

pub use accounts::InMemoryAccountDirectory;
pub use mail::{MailerFailureMode, MockMailer};
pub use store::{InMemoryEventStore, InMemoryVerificationStore};

//! Repository traits over the external document store, plus mocks for tests.

pub mod account;
pub mod event;
pub mod verification;

pub use account::{AccountDirectory, MockAccountDirectory};
pub use event::{MockSecurityEventRepository, SecurityEventRepository};
pub use verification::{MockVerificationRequestRepository, VerificationRequestRepository};

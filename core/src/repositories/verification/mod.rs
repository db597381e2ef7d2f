//! Verification request repository module.

mod r#trait;
pub use r#trait::VerificationRequestRepository;

mod mock;
pub use mock::MockVerificationRequestRepository;

//! Security event repository module.

mod r#trait;
pub use r#trait::SecurityEventRepository;

mod mock;
pub use mock::MockSecurityEventRepository;

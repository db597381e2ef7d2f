//! Account directory module.

mod r#trait;
pub use r#trait::AccountDirectory;

mod mock;
pub use mock::MockAccountDirectory;

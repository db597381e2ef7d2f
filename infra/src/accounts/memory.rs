//! In-memory stand-in for the storefront's user store.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use sg_core::errors::SecurityError;
use sg_core::repositories::AccountDirectory;

/// Seedable directory of registered emails.
#[derive(Default)]
pub struct InMemoryAccountDirectory {
    registered: Mutex<HashSet<String>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an email as belonging to an existing account.
    pub fn register(&self, email: impl Into<String>) {
        self.registered
            .lock()
            .unwrap()
            .insert(email.into().to_lowercase());
    }
}

#[async_trait]
impl AccountDirectory for InMemoryAccountDirectory {
    async fn email_registered(&self, email: &str) -> Result<bool, SecurityError> {
        Ok(self
            .registered
            .lock()
            .unwrap()
            .contains(&email.to_lowercase()))
    }
}

//! Mock implementation of AccountDirectory for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::errors::SecurityError;

use super::AccountDirectory;

/// Seedable in-memory directory for unit tests.
pub struct MockAccountDirectory {
    registered: Arc<Mutex<HashSet<String>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockAccountDirectory {
    pub fn new() -> Self {
        Self {
            registered: Arc::new(Mutex::new(HashSet::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Mark an email as belonging to an existing account.
    pub fn register(&self, email: impl Into<String>) {
        self.registered
            .lock()
            .unwrap()
            .insert(email.into().to_lowercase());
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }
}

impl Default for MockAccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountDirectory for MockAccountDirectory {
    async fn email_registered(&self, email: &str) -> Result<bool, SecurityError> {
        if *self.should_fail.lock().unwrap() {
            return Err(SecurityError::internal("mock directory error"));
        }
        Ok(self
            .registered
            .lock()
            .unwrap()
            .contains(&email.to_lowercase()))
    }
}

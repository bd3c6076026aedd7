//! Token storage collaborator
//!
//! The flow engine never persists tokens itself; it hands them to whatever
//! storage the host application provides. The trait keeps the engine
//! testable with an in-memory implementation.

use ol_types::AppResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Key under which the session stores the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Opaque key-value storage for tokens
pub trait TokenStorage: Send + Sync {
    /// Store a value under a key, replacing any previous value
    fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Retrieve a value by key
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove everything (logout)
    fn clear(&self) -> AppResult<()>;
}

/// In-memory token storage
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn clear(&self) -> AppResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}

//! Key/value persistence collaborator
//!
//! The simulation never depends on storage latency or success: every caller
//! logs failures and carries on with in-memory values.

pub mod progress;

use std::collections::HashMap;

pub use progress::Progress;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// String key/value store (LocalStorage on web, a map elsewhere)
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read an integer; `None` when missing, unreadable or malformed
pub fn load_int(storage: &dyn Storage, key: &str) -> Option<u64> {
    match storage.get_item(key) {
        Ok(Some(raw)) => match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring malformed value for '{}': {:?}", key, raw);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read '{}': {}", key, e);
            None
        }
    }
}

/// Write an integer; failures are logged and ignored
pub fn save_int(storage: &mut dyn Storage, key: &str, value: u64) {
    if let Err(e) = storage.set_item(key, &value.to_string()) {
        log::warn!("Failed to write '{}': {}", key, e);
    }
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Storage that is never available (private browsing, quota errors)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

//! In-memory storage backend

use std::collections::HashMap;
use std::sync::RwLock;

use super::{StorageBackend, StoreResult};

/// Process-local key/value store; the fallback when no durable backing
/// store is available (or when it fails)
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryBackend {
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        self.items
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.read().unwrap().get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        self.items.write().unwrap().remove(key);
        Ok(())
    }
}

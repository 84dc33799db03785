//! Key/value score storage
//!
//! LocalStorage on web, an in-memory map everywhere else.

use std::collections::HashMap;

/// LocalStorage key for the best score
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Minimal integer key/value store
pub trait ScoreStore {
    /// Read a value; absent or unreadable values are `None`
    fn get(&self, key: &str) -> Option<u64>;
    /// Write a value; failures are logged and dropped
    fn set(&mut self, key: &str, value: u64);
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<u64> {
        let raw = Self::storage()?.get_item(key).ok()??;
        // Older builds stored floats
        raw.trim()
            .parse::<u64>()
            .ok()
            .or_else(|| raw.trim().parse::<f64>().ok().map(|v| v.max(0.0) as u64))
    }

    fn set(&mut self, key: &str, value: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, {} not saved", key);
            return;
        };
        if storage.set_item(key, &value.to_string()).is_err() {
            log::warn!("Failed to write {} to LocalStorage", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_absent_then_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(BEST_SCORE_KEY), None);
        store.set(BEST_SCORE_KEY, 120);
        assert_eq!(store.get(BEST_SCORE_KEY), Some(120));
        store.set(BEST_SCORE_KEY, 80);
        assert_eq!(store.get(BEST_SCORE_KEY), Some(80));
    }
}

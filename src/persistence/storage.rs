//! Key-value storage backends

use std::collections::HashMap;

use crate::error::{GameError, Result};

/// Minimal string key-value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    /// Fails with [`GameError::Storage`] when the backend refused the write
    /// (quota, private mode)
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

fn refused(key: &str) -> GameError {
    GameError::Storage {
        key: key.to_string(),
    }
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    /// Storage that rejects every write
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.read_only {
            return Err(refused(key));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable - progress will not persist");
        }
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(storage) = &self.inner else {
            return Err(refused(key));
        };
        storage.set_item(key, value).map_err(|e| {
            log::debug!("setItem({key}) rejected: {e:?}");
            refused(key)
        })
    }
}

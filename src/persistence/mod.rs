//! Save/load persistence over key-value storage
//!
//! Features:
//! - Versioned JSON envelope
//! - Pluggable storage (LocalStorage on web, in-memory on native/tests)
//! - Corruption detection and recovery (bad data loads as `None`)

pub mod storage;

pub use storage::{MemoryStorage, Storage};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Versioned wrapper written around every payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    payload: T,
}

/// Serialize `value` under `key`
pub fn save<T: Serialize>(storage: &mut dyn Storage, key: &str, version: u32, value: &T) -> Result<()> {
    let json = serde_json::to_string(&Envelope { version, payload: value })?;
    storage.set(key, &json)
}

/// Read the payload under `key`. Missing, corrupt or wrong-version data
/// yields `None` so callers can fall back to defaults.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str, version: u32) -> Option<T> {
    let json = storage.get(key)?;
    match serde_json::from_str::<Envelope<T>>(&json) {
        Ok(envelope) if envelope.version == version => Some(envelope.payload),
        Ok(envelope) => {
            log::warn!(
                "Discarding `{key}`: version {} (expected {version})",
                envelope.version
            );
            None
        }
        Err(e) => {
            log::warn!("Discarding corrupt `{key}`: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        value: u32,
    }

    #[test]
    fn test_save_load() {
        let mut storage = MemoryStorage::default();
        let sample = Sample { name: "fog".into(), value: 7 };
        save(&mut storage, "k", 3, &sample).unwrap();
        assert_eq!(load::<Sample>(&storage, "k", 3), Some(sample));
        assert!(storage.get("k").unwrap().contains("\"version\":3"));
    }

    #[test]
    fn test_missing_corrupt_and_stale() {
        let mut storage = MemoryStorage::default();
        assert_eq!(load::<Sample>(&storage, "k", 1), None);

        storage.set("k", "{{{{").unwrap();
        assert_eq!(load::<Sample>(&storage, "k", 1), None);

        save(&mut storage, "k", 1, &Sample { name: "a".into(), value: 1 }).unwrap();
        assert_eq!(load::<Sample>(&storage, "k", 2), None);
    }

    #[test]
    fn test_failing_storage_reports_key() {
        let mut storage = MemoryStorage::read_only();
        let err = save(&mut storage, "progress", 1, &1u32).unwrap_err();
        assert!(matches!(err, GameError::Storage { ref key } if key == "progress"));
    }
}

//! Persisted client state
//!
//! A small key/value `Storage` seam with a JSON file backend under the data
//! directory and an in-memory backend. Values are strings holding JSON, the
//! same shape a browser keeps in `localStorage`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use focus_sdk::EngineError;
use serde_json::Value;

pub mod scores;
pub mod settings;

pub use scores::{ScoreHistory, SCORE_HISTORY_KEY, SCORE_HISTORY_LIMIT};
pub use settings::{SoundSettings, SoundType, SOUND_SETTINGS_KEY};

/// File name of the state file inside the data directory
pub const STATE_FILE: &str = "state.json";

pub type Result<T> = std::result::Result<T, EngineError>;

/// Key/value string storage
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Storage backed by a single JSON object on disk.
///
/// The whole file is read and rewritten on every change. Entries that are
/// not strings are dropped. An unreadable or corrupt file reads as empty and
/// is replaced on the next write.
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Storage at `<data_dir>/state.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STATE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let object = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "State file is not an object, next write replaces it");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt state file, next write replaces it");
                return Ok(BTreeMap::new());
            }
        };

        let mut map = BTreeMap::new();
        for (key, value) in object {
            match value {
                Value::String(value) => {
                    map.insert(key, value);
                }
                _ => tracing::warn!(%key, "Skipping non-string state entry"),
            }
        }
        Ok(map)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| EngineError::Storage(format!("Failed to serialize state: {}", e)))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| EngineError::Storage("State file lock poisoned".to_string()))?;
        let mut map = self.read_map()?;
        f(&mut map);
        self.write_map(&map)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self
            .lock
            .read()
            .map_err(|_| EngineError::Storage("State file lock poisoned".to_string()))?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.modify(|map| {
            map.remove(key);
        })
    }
}

/// In-memory storage; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| EngineError::Storage("Memory storage lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| EngineError::Storage("Memory storage lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| EngineError::Storage("Memory storage lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        let shared = storage.clone();
        assert_eq!(shared.get("k").unwrap().as_deref(), Some("v"));

        shared.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        assert_eq!(storage.get("anything").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_file_storage_keeps_string_entries_of_mixed_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::in_dir(dir.path());
        std::fs::write(
            storage.path(),
            r#"{"focusbear-score-history":"[80]","stray":42,"nested":{"a":1}}"#,
        )
        .unwrap();

        assert_eq!(storage.get("stray").unwrap(), None);
        storage.set("focusbear-sound-settings", "{}").unwrap();

        assert_eq!(
            storage.get("focusbear-score-history").unwrap().as_deref(),
            Some("[80]")
        );
        assert_eq!(storage.get("focusbear-sound-settings").unwrap().as_deref(), Some("{}"));
    }
}

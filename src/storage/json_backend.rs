use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;
use crate::utils::write_atomic;

use super::KeyValueStore;

const STORE_DIR: &str = "cascade_core";
const STORE_FILE: &str = "session.json";

/// Key-value store persisted as one flat JSON object.
///
/// Every mutation rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens (or lazily creates) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened session store");
        Ok(Self { path, entries })
    }

    /// Opens the store in the platform's local data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR)
            .join(STORE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

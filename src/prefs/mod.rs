//! Persistence of the user's sort criteria between sessions.
//!
//! Values live in a small key-value store. The criteria list is kept as one
//! JSON blob under a single key and is restored verbatim on the next start.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::sorting::SortCriteria;

/// Key under which the criteria list is stored
pub const SORT_STORAGE_KEY: &str = "client-sort-settings";

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk mapping keys to string values.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/client_manager/prefs.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("client_manager").join("prefs.json"))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // An unreadable file is replaced rather than blocking every later save
        let mut values = self.read_all().unwrap_or_else(|err| {
            warn!("discarding unreadable preference file: {err:#}");
            BTreeMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

/// Saves and restores the sort criteria list.
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrites the stored criteria list.
    pub fn save(&self, criteria: &SortCriteria) -> Result<()> {
        let value = serde_json::to_string(criteria)?;
        self.store.set(SORT_STORAGE_KEY, &value)?;
        debug!(criteria = %value, "saved sort preferences");
        Ok(())
    }

    /// Restores the stored list. Missing, unreadable or invalid values all
    /// yield the default criteria.
    pub fn load(&self) -> SortCriteria {
        let raw = match self.store.get(SORT_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SortCriteria::default(),
            Err(err) => {
                warn!("failed to read sort preferences: {err:#}");
                return SortCriteria::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("ignoring malformed sort preferences: {err}");
            SortCriteria::default()
        })
    }
}

//! JSON-file [`KeyValueStore`] holding the CLI's session between runs.
//!
//! SYSTEM CONTEXT
//! ==============
//! The CLI is a fresh process per command, so both the provider session and
//! the session hints live in one small JSON object on disk. Every write
//! rewrites the whole file.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use postgate::hints::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read state file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("state file {path} is not a JSON object: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Load `path`, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// [`StoreError`] when the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Parse { path: path.clone(), source })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self { path, values: Mutex::new(values) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut values);
        let result = serde_json::to_string_pretty(&*values)
            .map_err(io::Error::other)
            .and_then(|raw| std::fs::write(&self.path, raw));
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write state file");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.update(|values| {
            values.insert(key.to_owned(), value.to_owned());
        });
    }

    fn remove(&self, key: &str) {
        self.update(|values| {
            values.remove(key);
        });
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

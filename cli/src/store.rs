//! JSON file standing in for browser `localStorage`.
//!
//! The whole file is one flat object of string values. It is read once on
//! open and rewritten after every change.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use leadchat::KeyValueStore;

use crate::CliError;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Load `path`, treating a missing file as empty.
    ///
    /// # Errors
    ///
    /// Returns `CliError::State` if the file exists but is unreadable or not
    /// a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| state_error(&path, &e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(state_error(&path, &e)),
        };
        Ok(Self { path, entries: RefCell::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let result = serde_json::to_string_pretty(&*self.entries.borrow())
            .map_err(|e| e.to_string())
            .and_then(|body| std::fs::write(&self.path, body).map_err(|e| e.to_string()));
        if let Err(error) = result {
            tracing::warn!(path = %self.path.display(), %error, "state file not written");
        }
    }
}

fn state_error(path: &Path, err: &impl std::fmt::Display) -> CliError {
    CliError::State { path: path.display().to_string(), message: err.to_string() }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        self.persist();
    }

    fn remove(&self, key: &str) {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.persist();
        }
    }
}

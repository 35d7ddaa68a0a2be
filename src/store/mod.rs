//! Durable key-value storage for client state that survives restarts.
//!
//! Only one value lives here today: the index of the runner-log date the
//! operator last looked at. Writes are last-write-wins with a single writer.

mod error;
mod file;

pub use error::StoreError;
pub use file::FileStore;

use crate::view::select_log_index;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Key under which the selected log index is stored.
pub const SELECTED_LOG_INDEX_KEY: &str = "selectedLogIndex";

/// A string-keyed, string-valued store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The selected runner-log index, read once at start and written on change.
pub struct PersistedSelection {
    store: Arc<dyn KeyValueStore>,
}

impl PersistedSelection {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored index clamped to `available_dates`.
    ///
    /// Missing, unreadable or non-numeric values read as 0.
    pub fn load(&self, available_dates: &[String]) -> usize {
        let stored = match self.store.get(SELECTED_LOG_INDEX_KEY) {
            Ok(value) => value.and_then(|v| v.trim().parse::<usize>().ok()).unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted log selection");
                0
            }
        };
        select_log_index(available_dates, stored)
    }

    /// Persist `index`. Failures are logged and otherwise ignored.
    pub fn save(&self, index: usize) {
        if let Err(e) = self.store.set(SELECTED_LOG_INDEX_KEY, &index.to_string()) {
            tracing::warn!(error = %e, index, "Could not persist log selection");
        }
    }
}

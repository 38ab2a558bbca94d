//! Test storage — `StoragePort` implementations for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use journey_core::error::JourneyError;
use journey_core::storage::StoragePort;

/// An in-memory store. Clones share the same underlying map, which lets a
/// test hand one clone to the code under test and inspect another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `value` under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        storage
    }

    /// Returns the raw value stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Number of successful `save` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl StoragePort for InMemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, JourneyError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JourneyError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), JourneyError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A store whose every operation fails. Useful for testing error-handling
/// paths.
#[derive(Debug)]
pub struct FailingStorage;

impl StoragePort for FailingStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, JourneyError> {
        Err(JourneyError::StorageAccess("storage unavailable".into()))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), JourneyError> {
        Err(JourneyError::StorageAccess("quota exceeded".into()))
    }

    fn clear(&self, _key: &str) -> Result<(), JourneyError> {
        Err(JourneyError::StorageAccess("storage unavailable".into()))
    }
}

/// Wraps an [`InMemoryStorage`] whose `clear` always fails while loads and
/// saves go through.
#[derive(Debug, Clone)]
pub struct UnclearableStorage {
    inner: InMemoryStorage,
}

impl UnclearableStorage {
    /// Wrap `inner`; inspect it through the original handle.
    #[must_use]
    pub fn new(inner: InMemoryStorage) -> Self {
        Self { inner }
    }
}

impl StoragePort for UnclearableStorage {
    fn load(&self, key: &str) -> Result<Option<String>, JourneyError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JourneyError> {
        self.inner.save(key, value)
    }

    fn clear(&self, _key: &str) -> Result<(), JourneyError> {
        Err(JourneyError::StorageAccess("permission denied".into()))
    }
}

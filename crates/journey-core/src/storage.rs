//! Key-value storage port.
//!
//! Progress is persisted as a single text document under a well-known key.
//! The medium behind the port (browser storage, a file, memory) is up to the
//! host.

use crate::error::JourneyError;

/// Port for loading, saving and clearing string values by key.
///
/// Implementations report every failure as `JourneyError::StorageAccess`.
pub trait StoragePort: Send + Sync {
    /// Load the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::StorageAccess` if the medium cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, JourneyError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::StorageAccess` if the medium cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), JourneyError>;

    /// Remove the value stored under `key`. Clearing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::StorageAccess` if the medium cannot be written.
    fn clear(&self, key: &str) -> Result<(), JourneyError>;
}

//! Filesystem implementation of the `StoragePort` trait.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use journey_core::error::JourneyError;
use journey_core::storage::StoragePort;

/// Keeps one JSON document per key inside a directory.
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so a crash mid-write never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates a `FileStorage` rooted at `root`. The directory is created on
    /// first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory documents are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, JourneyError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(JourneyError::StorageAccess(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn storage_error(action: &str, path: &Path, err: &std::io::Error) -> JourneyError {
    JourneyError::StorageAccess(format!("{action} {}: {err}", path.display()))
}

impl StoragePort for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, JourneyError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error("cannot read", &path, &err)),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), JourneyError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| storage_error("cannot create", &self.root, &e))?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|e| storage_error("cannot write", &staging, &e))?;
        if let Err(err) = fs::rename(&staging, &path) {
            if let Err(cleanup) = fs::remove_file(&staging) {
                tracing::warn!(path = %staging.display(), error = %cleanup, "staging file left behind");
            }
            return Err(storage_error("cannot replace", &path, &err));
        }

        tracing::debug!(path = %path.display(), bytes = value.len(), "document saved");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), JourneyError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error("cannot remove", &path, &err)),
        }
    }
}

//! Discovery journey — storage adapters.
//!
//! Implementations of the `StoragePort` for hosts that keep progress on the
//! local filesystem.

pub mod file_storage;

pub use file_storage::FileStorage;

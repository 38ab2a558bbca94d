//! Discovery journey — progress.
//!
//! Owns the single persisted `Progress` record: its schema, its defaults,
//! and the store that reads and writes it through a storage port.

pub mod application;
pub mod domain;

pub use application::progress_store::{PROGRESS_STORAGE_KEY, ProgressStore};
pub use domain::progress::Progress;

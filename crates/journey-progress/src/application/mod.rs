//! Application services for journey progress.

pub mod progress_store;

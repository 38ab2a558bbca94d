//! Domain types for journey progress.

pub mod progress;

//! Domain types for the content registries.

pub mod content;
pub mod registry;

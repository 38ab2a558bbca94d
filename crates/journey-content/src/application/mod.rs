//! Application services for the content registries.

pub mod ingest;

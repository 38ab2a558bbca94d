//! Discovery journey — content registries.
//!
//! Read-only lookup tables for the questions and narrative passages supplied
//! by the host application, plus ingestion from a YAML manifest.

pub mod application;
pub mod domain;

pub use domain::content::{Narrative, Question};
pub use domain::registry::ContentRegistries;

//! Content ingestion.
//!
//! Hosts describe their journey in a YAML manifest: an ordered list of
//! questions and a map of narrative passages keyed by narrative key.

use std::collections::BTreeMap;
use std::path::Path;

use journey_core::error::JourneyError;
use serde::Deserialize;

use crate::domain::content::{Narrative, Question};
use crate::domain::registry::ContentRegistries;

#[derive(Debug, Deserialize)]
struct Manifest {
    questions: Vec<Question>,
    narratives: BTreeMap<String, NarrativeBody>,
}

#[derive(Debug, Deserialize)]
struct NarrativeBody {
    title: String,
    content: String,
}

/// Parses a YAML manifest into validated registries.
///
/// # Errors
///
/// Returns `JourneyError::InvalidContent` if the YAML is malformed or the
/// content violates the registry contract.
pub fn ingest_manifest(source: &str) -> Result<ContentRegistries, JourneyError> {
    let manifest: Manifest = serde_yaml::from_str(source)
        .map_err(|e| JourneyError::InvalidContent(format!("manifest parse failed: {e}")))?;

    let narratives = manifest
        .narratives
        .into_iter()
        .map(|(key, body)| Narrative {
            key,
            title: body.title,
            content: body.content,
        });
    let registries = ContentRegistries::new(manifest.questions, narratives)?;

    tracing::debug!(
        questions = registries.total_questions(),
        "content manifest ingested"
    );
    Ok(registries)
}

/// Reads and ingests the manifest at `path`.
///
/// # Errors
///
/// Returns `JourneyError::InvalidContent` if the file cannot be read or its
/// content is invalid.
pub fn ingest_manifest_file(path: &Path) -> Result<ContentRegistries, JourneyError> {
    let source = std::fs::read_to_string(path).map_err(|e| {
        JourneyError::InvalidContent(format!("cannot read {}: {e}", path.display()))
    })?;
    ingest_manifest(&source)
}

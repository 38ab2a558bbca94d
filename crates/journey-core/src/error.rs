//! Domain error types.

use serde::Serialize;
use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JourneyError {
    /// A stored or in-flight progress record failed the schema.
    #[error("schema validation error: {0}")]
    SchemaValidation(String),

    /// The underlying storage port failed (unavailable, quota, corrupt).
    #[error("storage access error: {0}")]
    StorageAccess(String),

    /// A transition referenced a question the registry does not contain.
    #[error("unknown question: {0}")]
    UnknownQuestion(u32),

    /// A transition referenced a narrative the registry does not contain.
    #[error("unknown narrative: {0}")]
    UnknownNarrative(String),

    /// An answer arrived for a question other than the current one.
    #[error("stale answer: expected question {expected}, got {actual}")]
    StaleAnswer {
        /// The question the journey is currently on.
        expected: u32,
        /// The question the answer was submitted for.
        actual: u32,
    },

    /// Content supplied by the host violates the registry contract.
    #[error("invalid content: {0}")]
    InvalidContent(String),
}

/// Coarse classification of failures, used when reporting to telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Progress failed schema validation on load or save.
    SchemaValidation,
    /// The storage port raised an error.
    StorageAccess,
    /// A state transition could not be derived or applied.
    Transition,
    /// An answer for a question the journey has already moved past. Dropped
    /// without a reset.
    StaleAnswer,
    /// Host-supplied content is malformed.
    Content,
}

impl FailureKind {
    /// Stable label for logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SchemaValidation => "schema_validation",
            Self::StorageAccess => "storage_access",
            Self::Transition => "transition",
            Self::StaleAnswer => "stale_answer",
            Self::Content => "content",
        }
    }
}

impl JourneyError {
    /// Returns the failure classification for this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SchemaValidation(_) => FailureKind::SchemaValidation,
            Self::StorageAccess(_) => FailureKind::StorageAccess,
            Self::UnknownQuestion(_) | Self::UnknownNarrative(_) => FailureKind::Transition,
            Self::StaleAnswer { .. } => FailureKind::StaleAnswer,
            Self::InvalidContent(_) => FailureKind::Content,
        }
    }

    /// Whether the journey must be reset to recover from this error.
    ///
    /// Dangling references mean progress and content disagree; a stale answer
    /// is simply dropped.
    #[must_use]
    pub fn requires_reset(&self) -> bool {
        matches!(self, Self::UnknownQuestion(_) | Self::UnknownNarrative(_))
    }
}

//! Journey event vocabulary.
//!
//! These are the only actions the UI layer can take. They travel in-process
//! over the event bus and are never put on a wire.

use serde::{Deserialize, Serialize};

/// Event name for [`QuestionAnswered`].
pub const QUESTION_ANSWERED: &str = "QUESTION_ANSWERED";

/// Event name for [`NarrativeViewed`].
pub const NARRATIVE_VIEWED: &str = "NARRATIVE_VIEWED";

/// Event name for [`JourneyEvent::JourneyReset`].
pub const JOURNEY_RESET: &str = "JOURNEY_RESET";

/// Reserved narrative shown before the first question.
pub const INTRO_NARRATIVE: &str = "intro";

/// Reserved narrative shown once every question is answered.
pub const CONCLUSION_NARRATIVE: &str = "conclusion";

/// Published when the user submits an option for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswered {
    /// The question that was answered.
    pub question_id: u32,
    /// The chosen option, verbatim.
    pub answer: String,
    /// The narrative key of the answered question.
    pub narrative_key: String,
}

/// Published when the user continues past a narrative passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeViewed {
    /// The narrative that was read.
    pub narrative_key: String,
}

/// The kinds of event a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`QuestionAnswered`].
    QuestionAnswered,
    /// See [`NarrativeViewed`].
    NarrativeViewed,
    /// See [`JourneyEvent::JourneyReset`].
    JourneyReset,
}

impl EventKind {
    /// Returns the event name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::QuestionAnswered => QUESTION_ANSWERED,
            Self::NarrativeViewed => NARRATIVE_VIEWED,
            Self::JourneyReset => JOURNEY_RESET,
        }
    }
}

/// An event published on the journey bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JourneyEvent {
    /// A question was answered.
    QuestionAnswered(QuestionAnswered),
    /// A narrative was read.
    NarrativeViewed(NarrativeViewed),
    /// The user asked to start over.
    JourneyReset,
}

impl JourneyEvent {
    /// Convenience constructor for a [`QuestionAnswered`] event.
    pub fn question_answered(
        question_id: u32,
        answer: impl Into<String>,
        narrative_key: impl Into<String>,
    ) -> Self {
        Self::QuestionAnswered(QuestionAnswered {
            question_id,
            answer: answer.into(),
            narrative_key: narrative_key.into(),
        })
    }

    /// Convenience constructor for a [`NarrativeViewed`] event.
    pub fn narrative_viewed(narrative_key: impl Into<String>) -> Self {
        Self::NarrativeViewed(NarrativeViewed {
            narrative_key: narrative_key.into(),
        })
    }

    /// Returns the kind used to route this event to subscribers.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::QuestionAnswered(_) => EventKind::QuestionAnswered,
            Self::NarrativeViewed(_) => EventKind::NarrativeViewed,
            Self::JourneyReset => EventKind::JourneyReset,
        }
    }

    /// Returns the event name (e.g. `QUESTION_ANSWERED`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

//! The persisted progress record.

use std::collections::BTreeMap;
use std::collections::HashSet;

use journey_core::error::JourneyError;
use journey_core::event::INTRO_NARRATIVE;
use serde::{Deserialize, Serialize};

/// Where a user is in the journey and what they have answered.
///
/// Serialized as a flat JSON document with camelCase field names. Fields not
/// listed here are dropped on load; `completed` and `viewedNarratives` may be
/// absent and default to `false` and `[]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// The next question to answer, starting at 1.
    pub current_question_id: u32,
    /// Chosen option per answered question id.
    pub answers: BTreeMap<u32, String>,
    /// Set once the conclusion has been reached.
    #[serde(default)]
    pub completed: bool,
    /// Narrative keys in the order they were first viewed.
    #[serde(default)]
    pub viewed_narratives: Vec<String>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            current_question_id: 1,
            answers: BTreeMap::new(),
            completed: false,
            viewed_narratives: vec![INTRO_NARRATIVE.to_owned()],
        }
    }
}

impl Progress {
    /// Parses and validates a stored document.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::SchemaValidation` if the document is not valid
    /// JSON or does not satisfy the progress schema.
    pub fn from_json(raw: &str) -> Result<Self, JourneyError> {
        let parsed: Self = serde_json::from_str(raw)
            .map_err(|e| JourneyError::SchemaValidation(e.to_string()))?;
        parsed.validate()
    }

    /// Serializes the record for storage.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::SchemaValidation` if serialization fails.
    pub fn to_json(&self) -> Result<String, JourneyError> {
        serde_json::to_string(self).map_err(|e| JourneyError::SchemaValidation(e.to_string()))
    }

    /// Checks the schema rules the type system cannot express, coercing
    /// duplicate narrative keys away (first occurrence wins).
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::SchemaValidation` if `currentQuestionId` or an
    /// answer key is zero.
    pub fn validate(mut self) -> Result<Self, JourneyError> {
        if self.current_question_id < 1 {
            return Err(JourneyError::SchemaValidation(format!(
                "currentQuestionId must be >= 1, got {}",
                self.current_question_id
            )));
        }
        if self.answers.contains_key(&0) {
            return Err(JourneyError::SchemaValidation(
                "answers keys must be question ids >= 1".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        self.viewed_narratives.retain(|key| seen.insert(key.clone()));
        Ok(self)
    }

    /// Records `answer` for `question_id` and moves on to the next question.
    #[must_use]
    pub fn with_answer(&self, question_id: u32, answer: &str) -> Self {
        let mut next = self.clone();
        next.answers.insert(question_id, answer.to_owned());
        next.current_question_id = question_id.saturating_add(1);
        next
    }

    /// Appends `narrative_key` to the viewed list unless already present.
    #[must_use]
    pub fn with_viewed_narrative(&self, narrative_key: &str) -> Self {
        let mut next = self.clone();
        if !next.has_viewed(narrative_key) {
            next.viewed_narratives.push(narrative_key.to_owned());
        }
        next
    }

    /// Marks the journey completed.
    #[must_use]
    pub fn completed_journey(&self) -> Self {
        Self {
            completed: true,
            ..self.clone()
        }
    }

    /// Whether `narrative_key` has been viewed.
    #[must_use]
    pub fn has_viewed(&self, narrative_key: &str) -> bool {
        self.viewed_narratives.iter().any(|k| k == narrative_key)
    }

    /// The most recently viewed narrative, if any.
    #[must_use]
    pub fn last_viewed_narrative(&self) -> Option<&str> {
        self.viewed_narratives.last().map(String::as_str)
    }

    /// The recorded answer for `question_id`.
    #[must_use]
    pub fn answer_for(&self, question_id: u32) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    /// Number of questions answered so far.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

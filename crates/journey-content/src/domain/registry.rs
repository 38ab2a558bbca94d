//! Validated registries of questions and narratives.

use std::collections::BTreeMap;

use journey_core::error::JourneyError;
use journey_core::event::{CONCLUSION_NARRATIVE, INTRO_NARRATIVE};

use super::content::{Narrative, Question};

/// Minimum number of options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// The question list and narrative lookup a journey runs over.
///
/// Construction enforces the registry contract: question ids are contiguous
/// from 1, every question offers at least two non-empty options, and the
/// narratives cover `intro`, `conclusion` and every key a question refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRegistries {
    questions: Vec<Question>,
    narratives: BTreeMap<String, Narrative>,
}

impl ContentRegistries {
    /// Builds validated registries. Questions may be supplied in any order.
    ///
    /// # Errors
    ///
    /// Returns `JourneyError::InvalidContent` if the content violates the
    /// registry contract.
    pub fn new(
        mut questions: Vec<Question>,
        narratives: impl IntoIterator<Item = Narrative>,
    ) -> Result<Self, JourneyError> {
        questions.sort_by_key(|q| q.id);
        validate_questions(&questions)?;

        let mut by_key = BTreeMap::new();
        for narrative in narratives {
            if by_key.contains_key(&narrative.key) {
                return Err(JourneyError::InvalidContent(format!(
                    "duplicate narrative key '{}'",
                    narrative.key
                )));
            }
            by_key.insert(narrative.key.clone(), narrative);
        }

        for reserved in [INTRO_NARRATIVE, CONCLUSION_NARRATIVE] {
            if !by_key.contains_key(reserved) {
                return Err(JourneyError::InvalidContent(format!(
                    "missing reserved narrative '{reserved}'"
                )));
            }
        }
        for question in &questions {
            if !by_key.contains_key(&question.narrative_key) {
                return Err(JourneyError::InvalidContent(format!(
                    "question {} refers to unknown narrative '{}'",
                    question.id, question.narrative_key
                )));
            }
        }

        Ok(Self {
            questions,
            narratives: by_key,
        })
    }

    /// Number of questions in the journey.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        // Ids are u32 and contiguous from 1, so the count fits.
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: u32) -> Option<&Question> {
        let index = usize::try_from(id.checked_sub(1)?).ok()?;
        self.questions.get(index)
    }

    /// The first question of the journey.
    #[must_use]
    pub fn first_question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// All questions in journey order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a narrative by key.
    #[must_use]
    pub fn narrative(&self, key: &str) -> Option<&Narrative> {
        self.narratives.get(key)
    }

    /// Whether a narrative with `key` exists.
    #[must_use]
    pub fn contains_narrative(&self, key: &str) -> bool {
        self.narratives.contains_key(key)
    }
}

fn validate_questions(questions: &[Question]) -> Result<(), JourneyError> {
    if questions.is_empty() {
        return Err(JourneyError::InvalidContent(
            "a journey needs at least one question".to_owned(),
        ));
    }
    for (expected, question) in (1u32..).zip(questions) {
        if question.id != expected {
            return Err(JourneyError::InvalidContent(format!(
                "question ids must be contiguous from 1: expected {expected}, found {}",
                question.id
            )));
        }
        if question.options.len() < MIN_OPTIONS {
            return Err(JourneyError::InvalidContent(format!(
                "question {} needs at least {MIN_OPTIONS} options",
                question.id
            )));
        }
        if question.options.iter().any(|option| option.trim().is_empty()) {
            return Err(JourneyError::InvalidContent(format!(
                "question {} has an empty option",
                question.id
            )));
        }
    }
    Ok(())
}

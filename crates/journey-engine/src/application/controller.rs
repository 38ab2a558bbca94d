//! The journey controller.
//!
//! Reacts to journey events by writing through the progress store and
//! recomputing the view. Failures never escape: they are reported to
//! telemetry, and inconsistent state is recovered by restarting the journey.

use std::sync::Arc;

use journey_content::ContentRegistries;
use journey_core::error::JourneyError;
use journey_core::event::{INTRO_NARRATIVE, JourneyEvent, NarrativeViewed, QuestionAnswered};
use journey_progress::{Progress, ProgressStore};

use crate::domain::machine::{apply_event, derive_view, view_after};
use crate::domain::view::{JourneySnapshot, JourneyView, ProgressMeter};

/// Drives a single journey over a progress store and content registries.
#[derive(Debug)]
pub struct JourneyController {
    store: ProgressStore,
    content: Arc<ContentRegistries>,
    progress: Progress,
    view: JourneyView,
}

impl JourneyController {
    /// Creates a controller showing the intro. Call [`Self::bootstrap`] to
    /// resume from stored progress.
    #[must_use]
    pub fn new(store: ProgressStore, content: Arc<ContentRegistries>) -> Self {
        Self {
            store,
            content,
            progress: Progress::default(),
            view: JourneyView::narrative(INTRO_NARRATIVE),
        }
    }

    /// Loads stored progress and derives where to resume.
    ///
    /// Progress that does not fit the content (answers to questions that no
    /// longer exist) is reported and the journey restarts at the intro.
    pub fn bootstrap(&mut self) -> JourneySnapshot {
        let progress = self.store.load();
        match self.check_consistent(&progress) {
            Ok(()) => {
                if let Some(view) = derive_view(&progress, &self.content) {
                    self.view = view;
                }
                self.progress = progress;
            }
            Err(err) => {
                self.store.telemetry().report("bootstrapJourney", None, &err);
                tracing::warn!(error = %err, "stored progress does not match content; restarting");
                self.restart();
            }
        }
        tracing::info!(
            view = ?self.view,
            current_question_id = self.progress.current_question_id,
            "journey bootstrapped"
        );
        self.snapshot()
    }

    fn check_consistent(&self, progress: &Progress) -> Result<(), JourneyError> {
        let total = self.content.total_questions();
        match progress.answers.keys().find(|&&id| id > total) {
            Some(&id) => Err(JourneyError::UnknownQuestion(id)),
            None => Ok(()),
        }
    }

    /// Applies `event` and returns the resulting snapshot.
    pub fn handle(&mut self, event: &JourneyEvent) -> JourneySnapshot {
        let result = match event {
            JourneyEvent::QuestionAnswered(answered) => self.on_question_answered(event, answered),
            JourneyEvent::NarrativeViewed(viewed) => self.on_narrative_viewed(event, viewed),
            JourneyEvent::JourneyReset => {
                self.restart();
                Ok(())
            }
        };
        if let Err(err) = result {
            self.recover(event, &err);
        }
        self.snapshot()
    }

    fn on_question_answered(
        &mut self,
        event: &JourneyEvent,
        answered: &QuestionAnswered,
    ) -> Result<(), JourneyError> {
        let question = self
            .content
            .question(answered.question_id)
            .ok_or(JourneyError::UnknownQuestion(answered.question_id))?;
        if answered.question_id != self.progress.current_question_id {
            return Err(JourneyError::StaleAnswer {
                expected: self.progress.current_question_id,
                actual: answered.question_id,
            });
        }
        if !question.has_option(&answered.answer) {
            tracing::debug!(
                question_id = answered.question_id,
                "answer is not one of the declared options"
            );
        }

        let mut durable = self.store.update_answer(answered.question_id, &answered.answer);
        if durable.is_ok() && answered.question_id >= self.content.total_questions() {
            durable = self.store.complete_journey();
        }
        self.advance(event, durable);
        tracing::debug!(question_id = answered.question_id, view = ?self.view, "question answered");
        Ok(())
    }

    fn on_narrative_viewed(
        &mut self,
        event: &JourneyEvent,
        viewed: &NarrativeViewed,
    ) -> Result<(), JourneyError> {
        if !self.content.contains_narrative(&viewed.narrative_key) {
            return Err(JourneyError::UnknownNarrative(viewed.narrative_key.clone()));
        }
        let durable = self.store.view_narrative(&viewed.narrative_key);
        self.advance(event, durable);
        tracing::debug!(narrative_key = %viewed.narrative_key, view = ?self.view, "narrative viewed");
        Ok(())
    }

    /// Adopts the stored record, or continues in memory if it was not
    /// persisted, then moves the display on.
    fn advance(&mut self, event: &JourneyEvent, durable: Result<Progress, JourneyError>) {
        self.progress = durable.unwrap_or_else(|err| {
            tracing::warn!(error = %err, event = event.name(), "progress not durable; continuing in memory");
            apply_event(&self.progress, event, &self.content)
        });
        if let Some(view) = view_after(event, &self.progress, &self.content) {
            self.view = view;
        }
    }

    fn recover(&mut self, event: &JourneyEvent, err: &JourneyError) {
        self.store.telemetry().report("applyTransition", None, err);
        if err.requires_reset() {
            tracing::warn!(error = %err, event = event.name(), "inconsistent transition; restarting journey");
            self.restart();
        } else {
            tracing::warn!(error = %err, event = event.name(), "transition ignored");
        }
    }

    fn restart(&mut self) {
        self.progress = self.store.reset();
        self.view = JourneyView::narrative(INTRO_NARRATIVE);
    }

    /// The current display state and progress meter.
    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        JourneySnapshot {
            view: self.view.clone(),
            completed: self.progress.completed,
            meter: ProgressMeter::new(
                self.progress.current_question_id,
                self.content.total_questions(),
            ),
        }
    }

    /// The progress the controller is working from.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// The content registries this journey runs over.
    #[must_use]
    pub fn content(&self) -> &ContentRegistries {
        &self.content
    }
}

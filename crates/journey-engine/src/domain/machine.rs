//! The journey state machine as pure functions.
//!
//! The display state is never stored independently of progress: at startup
//! it is derived from the persisted record, and after each event it follows
//! from the event and the updated record.

use journey_content::ContentRegistries;
use journey_core::event::{CONCLUSION_NARRATIVE, INTRO_NARRATIVE, JourneyEvent};
use journey_progress::Progress;

use super::view::JourneyView;

/// Derives the view to resume on from persisted progress.
///
/// Returns `None` when progress points at a question the registry does not
/// contain; the caller keeps its current display.
#[must_use]
pub fn derive_view(progress: &Progress, content: &ContentRegistries) -> Option<JourneyView> {
    if progress.current_question_id > content.total_questions() {
        return Some(JourneyView::Completed);
    }
    if progress.viewed_narratives.len() == 1 {
        return Some(JourneyView::narrative(INTRO_NARRATIVE));
    }

    let question = content.question(progress.current_question_id)?;
    if progress.last_viewed_narrative() == Some(question.narrative_key.as_str()) {
        Some(JourneyView::Question { id: question.id })
    } else {
        Some(JourneyView::narrative(question.narrative_key.clone()))
    }
}

/// Applies `event` to `progress`, returning the next record.
#[must_use]
pub fn apply_event(progress: &Progress, event: &JourneyEvent, content: &ContentRegistries) -> Progress {
    match event {
        JourneyEvent::QuestionAnswered(answered) => {
            let next = progress.with_answer(answered.question_id, &answered.answer);
            if is_last_question(answered.question_id, content) {
                next.completed_journey()
            } else {
                next
            }
        }
        JourneyEvent::NarrativeViewed(viewed) => progress.with_viewed_narrative(&viewed.narrative_key),
        JourneyEvent::JourneyReset => Progress::default(),
    }
}

/// The view that follows `event`, given the progress after it was applied.
///
/// Returns `None` when the display should not change.
#[must_use]
pub fn view_after(
    event: &JourneyEvent,
    progress: &Progress,
    content: &ContentRegistries,
) -> Option<JourneyView> {
    match event {
        JourneyEvent::QuestionAnswered(answered) => {
            if is_last_question(answered.question_id, content) {
                return Some(JourneyView::Completed);
            }
            let next = content.question(answered.question_id.saturating_add(1))?;
            Some(JourneyView::narrative(next.narrative_key.clone()))
        }
        JourneyEvent::NarrativeViewed(viewed) => {
            if viewed.narrative_key == CONCLUSION_NARRATIVE {
                return None;
            }
            let due = content.question(progress.current_question_id)?;
            Some(JourneyView::Question { id: due.id })
        }
        JourneyEvent::JourneyReset => Some(JourneyView::narrative(INTRO_NARRATIVE)),
    }
}

fn is_last_question(question_id: u32, content: &ContentRegistries) -> bool {
    question_id.saturating_add(1) > content.total_questions()
}

//! What the UI should display.

use journey_core::event::CONCLUSION_NARRATIVE;
use serde::Serialize;

/// The display decision derived from progress and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "show", rename_all = "camelCase")]
pub enum JourneyView {
    /// Show the narrative passage with this key.
    Narrative {
        /// Narrative key.
        key: String,
    },
    /// Show the question with this id.
    Question {
        /// Question id.
        id: u32,
    },
    /// Every question is answered; show the conclusion.
    Completed,
}

impl JourneyView {
    /// Shorthand for [`JourneyView::Narrative`].
    pub fn narrative(key: impl Into<String>) -> Self {
        Self::Narrative { key: key.into() }
    }

    /// The narrative to render, if this view shows one.
    #[must_use]
    pub fn narrative_key(&self) -> Option<&str> {
        match self {
            Self::Narrative { key } => Some(key),
            Self::Completed => Some(CONCLUSION_NARRATIVE),
            Self::Question { .. } => None,
        }
    }
}

/// Numeric progress for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressMeter {
    /// Questions answered, `currentQuestionId - 1` capped at `total`.
    pub step: u32,
    /// Total number of questions.
    pub total: u32,
    /// `step / total` as a rounded percentage.
    pub percent: u32,
}

impl ProgressMeter {
    /// Computes the meter for a journey on `current_question_id` out of
    /// `total` questions.
    #[must_use]
    pub fn new(current_question_id: u32, total: u32) -> Self {
        let step = current_question_id.saturating_sub(1).min(total);
        let percent = if total == 0 {
            100
        } else {
            let (step, total) = (u64::from(step), u64::from(total));
            u32::try_from((step * 100 + total / 2) / total).unwrap_or(100)
        };
        Self {
            step,
            total,
            percent,
        }
    }
}

/// Everything the UI needs after a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JourneySnapshot {
    /// What to display.
    pub view: JourneyView,
    /// Whether the journey has been completed.
    pub completed: bool,
    /// Progress bar values.
    pub meter: ProgressMeter,
}

impl JourneySnapshot {
    /// The meter is shown while a question is on screen and the journey is
    /// not yet completed.
    #[must_use]
    pub fn meter_visible(&self) -> bool {
        !self.completed && matches!(self.view, JourneyView::Question { .. })
    }
}

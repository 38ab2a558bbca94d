//! Questions and narrative passages.

use serde::{Deserialize, Serialize};

/// A multiple-choice question. Ids are 1-based and define journey order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Position in the journey, starting at 1.
    pub id: u32,
    /// The prompt shown to the user.
    pub text: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Narrative shown before this question.
    pub narrative_key: String,
}

impl Question {
    /// Whether `answer` is one of this question's declared options.
    #[must_use]
    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|option| option == answer)
    }
}

/// A narrative passage, looked up by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    /// Lookup key (`intro` and `conclusion` are reserved).
    pub key: String,
    /// Heading.
    pub title: String,
    /// Body text.
    pub content: String,
}

//! Content fixtures.

use journey_content::{ContentRegistries, Narrative, Question};

/// Registries with `question_count` questions offering options `A`, `B`, `C`.
///
/// Question 1 is introduced by the `intro` narrative; question `n` (n > 1)
/// by narrative `"n{n}"`.
///
/// # Panics
///
/// Panics if `question_count` is zero.
#[must_use]
pub fn sample_registries(question_count: u32) -> ContentRegistries {
    let questions: Vec<Question> = (1..=question_count)
        .map(|id| Question {
            id,
            text: format!("Question {id}?"),
            options: vec!["A".to_owned(), "B".to_owned(), "C".to_owned()],
            narrative_key: narrative_key_for(id),
        })
        .collect();

    let narratives = std::iter::once("conclusion".to_owned())
        .chain((1..=question_count).map(narrative_key_for))
        .map(|key| Narrative {
            title: key.to_uppercase(),
            content: format!("The {key} passage."),
            key,
        });

    ContentRegistries::new(questions, narratives).unwrap()
}

fn narrative_key_for(id: u32) -> String {
    if id == 1 {
        "intro".to_owned()
    } else {
        format!("n{id}")
    }
}

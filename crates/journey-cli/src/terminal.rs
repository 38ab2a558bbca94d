//! Text rendering and command handling.

use std::io::{BufRead, Write};

use journey_content::ContentRegistries;
use journey_core::event::{CONCLUSION_NARRATIVE, JourneyEvent};
use journey_engine::{EventBus, JourneySession, JourneySnapshot, JourneyView};

use crate::error::AppError;

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty line or `c`: move past a narrative.
    Continue,
    /// A 1-based option number.
    Choose(usize),
    /// `r` / `reset`: start over.
    Reset,
    /// `q` / `quit`: leave the journey.
    Quit,
    /// Anything else.
    Unknown(String),
}

/// Parses one input line.
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "c" | "continue" => Command::Continue,
        "r" | "reset" => Command::Reset,
        "q" | "quit" => Command::Quit,
        other => other
            .parse::<usize>()
            .map_or_else(|_| Command::Unknown(trimmed.to_owned()), Command::Choose),
    }
}

/// What the host does in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Publish this event on the bus.
    Publish(JourneyEvent),
    /// Leave the loop.
    Quit,
    /// Nothing to publish; show this hint.
    Ignore(String),
}

/// Maps `command` to an action given what is currently displayed.
#[must_use]
pub fn action_for(snapshot: &JourneySnapshot, content: &ContentRegistries, command: Command) -> Action {
    match (command, &snapshot.view) {
        (Command::Quit, _) => Action::Quit,
        (Command::Reset, _) => Action::Publish(JourneyEvent::JourneyReset),
        (Command::Continue, JourneyView::Narrative { key }) => {
            Action::Publish(JourneyEvent::narrative_viewed(key.clone()))
        }
        (Command::Continue, JourneyView::Completed) => {
            Action::Publish(JourneyEvent::narrative_viewed(CONCLUSION_NARRATIVE))
        }
        (Command::Choose(choice), JourneyView::Question { id }) => {
            let Some(question) = content.question(*id) else {
                return Action::Ignore(format!("question {id} is not available"));
            };
            match choice.checked_sub(1).and_then(|i| question.options.get(i)) {
                Some(option) => Action::Publish(JourneyEvent::question_answered(
                    question.id,
                    option.clone(),
                    question.narrative_key.clone(),
                )),
                None => Action::Ignore(format!(
                    "choose an option between 1 and {}",
                    question.options.len()
                )),
            }
        }
        (_, JourneyView::Question { .. }) => Action::Ignore("type an option number".to_owned()),
        (_, JourneyView::Completed) => Action::Ignore("type r to start a new journey".to_owned()),
        (_, JourneyView::Narrative { .. }) => Action::Ignore("press enter to continue".to_owned()),
    }
}

/// Writes `snapshot` as text.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn render(
    snapshot: &JourneySnapshot,
    content: &ContentRegistries,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out)?;
    if snapshot.meter_visible() {
        let meter = snapshot.meter;
        writeln!(out, "{}% | step {} of {}", meter.percent, meter.step, meter.total)?;
    }
    match &snapshot.view {
        JourneyView::Question { id } => {
            if let Some(question) = content.question(*id) {
                writeln!(out, "{}", question.text)?;
                for (number, option) in (1..).zip(&question.options) {
                    writeln!(out, "  {number}. {option}")?;
                }
            }
        }
        view => {
            if let Some(narrative) = view.narrative_key().and_then(|key| content.narrative(key)) {
                writeln!(out, "== {} ==", narrative.title)?;
                writeln!(out, "{}", narrative.content)?;
            }
            if snapshot.completed {
                writeln!(out, "Thank you for completing this journey.")?;
                writeln!(out, "[r] start a new journey")?;
            } else {
                writeln!(out, "[enter] continue")?;
            }
        }
    }
    Ok(())
}

/// Runs the interactive loop until `input` is exhausted or the user quits.
///
/// # Errors
///
/// Returns `AppError::Io` if reading input or writing output fails.
pub fn run(
    session: &JourneySession,
    bus: &EventBus,
    content: &ContentRegistries,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<(), AppError> {
    loop {
        let snapshot = session.snapshot();
        render(&snapshot, content, &mut output)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match action_for(&snapshot, content, parse_command(&line)) {
            Action::Publish(event) => {
                if let Err(err) = bus.publish(&event) {
                    tracing::warn!(error = %err, "event not fully handled");
                }
            }
            Action::Quit => break,
            Action::Ignore(hint) => writeln!(output, "{hint}")?,
        }
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use journey_engine::{JourneyController, ProgressMeter};
    use journey_progress::ProgressStore;
    use journey_test_support::{InMemoryStorage, RecordingTelemetry, sample_registries};

    use super::*;

    fn snapshot(view: JourneyView, completed: bool) -> JourneySnapshot {
        JourneySnapshot {
            view,
            completed,
            meter: ProgressMeter::new(1, 3),
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("\n"), Command::Continue);
        assert_eq!(parse_command(" 2 \n"), Command::Choose(2));
        assert_eq!(parse_command("R"), Command::Reset);
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("maybe"), Command::Unknown("maybe".to_owned()));
    }

    #[test]
    fn test_choice_publishes_answer_with_option_text() {
        let content = sample_registries(3);

        let action = action_for(
            &snapshot(JourneyView::Question { id: 2 }, false),
            &content,
            Command::Choose(3),
        );

        assert_eq!(
            action,
            Action::Publish(JourneyEvent::question_answered(2, "C", "n2"))
        );
    }

    #[test]
    fn test_out_of_range_choice_is_ignored() {
        let content = sample_registries(3);

        for choice in [0, 4] {
            let action = action_for(
                &snapshot(JourneyView::Question { id: 1 }, false),
                &content,
                Command::Choose(choice),
            );
            assert_eq!(
                action,
                Action::Ignore("choose an option between 1 and 3".to_owned())
            );
        }
    }

    #[test]
    fn test_continue_on_narrative_publishes_viewed() {
        let content = sample_registries(3);

        let action = action_for(
            &snapshot(JourneyView::narrative("n2"), false),
            &content,
            Command::Continue,
        );

        assert_eq!(action, Action::Publish(JourneyEvent::narrative_viewed("n2")));
    }

    #[test]
    fn test_render_question_shows_meter_and_options() {
        let content = sample_registries(3);
        let mut out = Vec::new();

        render(
            &snapshot(JourneyView::Question { id: 1 }, false),
            &content,
            &mut out,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0% | step 0 of 3"));
        assert!(text.contains("Question 1?"));
        assert!(text.contains("  3. C"));
    }

    #[test]
    fn test_run_walks_a_journey_to_completion() {
        // Arrange
        let bus = EventBus::new();
        let storage = InMemoryStorage::new();
        let (_sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(storage.clone()), telemetry);
        let content = Arc::new(sample_registries(2));
        let session = JourneySession::start(JourneyController::new(store, content.clone()), &bus);
        let input = Cursor::new("\n1\n\n7\n2\n\n");
        let mut output = Vec::new();

        // Act
        run(&session, &bus, &content, input, &mut output).unwrap();

        // Assert
        let progress = session.progress();
        assert!(progress.completed);
        assert_eq!(progress.answer_for(1), Some("A"));
        assert_eq!(progress.answer_for(2), Some("B"));
        assert!(progress.has_viewed("conclusion"));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("choose an option between 1 and 3"));
        assert!(text.contains("Thank you for completing this journey."));
    }
}

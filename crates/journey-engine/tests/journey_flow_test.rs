//! End-to-end journey flows over an in-memory store and a real bus.

use std::sync::Arc;

use journey_core::event::JourneyEvent;
use journey_engine::{EventBus, JourneyController, JourneySession, JourneyView};
use journey_progress::{PROGRESS_STORAGE_KEY, Progress, ProgressStore};
use journey_test_support::{InMemoryStorage, RecordingTelemetry, sample_registries};
use proptest::prelude::*;

struct Harness {
    bus: EventBus,
    storage: InMemoryStorage,
    store: ProgressStore,
    session: JourneySession,
}

fn start_journey(storage: InMemoryStorage, question_count: u32) -> Harness {
    let bus = EventBus::new();
    let (_sink, telemetry) = RecordingTelemetry::new();
    let store = ProgressStore::new(Arc::new(storage.clone()), telemetry);
    let controller =
        JourneyController::new(store.clone(), Arc::new(sample_registries(question_count)));
    let session = JourneySession::start(controller, &bus);
    Harness {
        bus,
        storage,
        store,
        session,
    }
}

fn answer(harness: &Harness, question_id: u32, choice: &str) {
    let narrative_key = if question_id == 1 {
        "intro".to_owned()
    } else {
        format!("n{question_id}")
    };
    harness
        .bus
        .publish(&JourneyEvent::question_answered(
            question_id,
            choice,
            narrative_key,
        ))
        .unwrap();
}

fn view(harness: &Harness, narrative_key: &str) {
    harness
        .bus
        .publish(&JourneyEvent::narrative_viewed(narrative_key))
        .unwrap();
}

#[test]
fn test_fresh_three_question_journey() {
    let harness = start_journey(InMemoryStorage::new(), 3);
    assert_eq!(
        harness.session.snapshot().view,
        JourneyView::narrative("intro")
    );

    view(&harness, "intro");
    assert_eq!(
        harness.session.snapshot().view,
        JourneyView::Question { id: 1 }
    );

    harness
        .bus
        .publish(&JourneyEvent::question_answered(1, "A", "n2"))
        .unwrap();
    let progress = harness.store.load();
    assert_eq!(progress.current_question_id, 2);
    assert_eq!(progress.answer_for(1), Some("A"));
    assert_eq!(progress.viewed_narratives, vec!["intro".to_owned()]);
    assert!(!progress.completed);
    assert_eq!(
        harness.session.snapshot().view,
        JourneyView::narrative("n2")
    );

    view(&harness, "n2");
    assert_eq!(
        harness.session.snapshot().view,
        JourneyView::Question { id: 2 }
    );

    answer(&harness, 2, "B");
    view(&harness, "n3");
    answer(&harness, 3, "C");

    let snapshot = harness.session.snapshot();
    assert_eq!(snapshot.view, JourneyView::Completed);
    assert!(snapshot.completed);
    assert_eq!(snapshot.meter.percent, 100);
    assert!(harness.store.load().completed);
}

#[test]
fn test_current_question_increases_by_one_per_answer() {
    let harness = start_journey(InMemoryStorage::new(), 5);
    view(&harness, "intro");

    for id in 1..=5 {
        let before = harness.store.load().current_question_id;
        answer(&harness, id, "A");
        let after = harness.store.load();
        assert_eq!(after.current_question_id, before + 1);
        assert_eq!(after.completed, id == 5, "completed after question {id}");
        if id < 5 {
            view(&harness, &format!("n{}", id + 1));
        }
    }
}

#[test]
fn test_reset_restores_default_from_any_state() {
    let harness = start_journey(InMemoryStorage::new(), 2);
    view(&harness, "intro");
    answer(&harness, 1, "B");
    view(&harness, "n2");
    answer(&harness, 2, "C");
    view(&harness, "conclusion");

    harness.bus.publish(&JourneyEvent::JourneyReset).unwrap();

    assert_eq!(harness.store.load(), Progress::default());
    assert!(harness.storage.value(PROGRESS_STORAGE_KEY).is_none());
    let snapshot = harness.session.snapshot();
    assert_eq!(snapshot.view, JourneyView::narrative("intro"));
    assert!(!snapshot.completed);
}

#[test]
fn test_reload_resumes_where_the_journey_left_off() {
    // Arrange
    let storage = InMemoryStorage::new();
    let first = start_journey(storage.clone(), 3);
    view(&first, "intro");
    answer(&first, 1, "A");
    view(&first, "n2");
    first.session.close();

    // Act
    let second = start_journey(storage.clone(), 3);

    // Assert
    assert_eq!(
        second.session.snapshot().view,
        JourneyView::Question { id: 2 }
    );

    answer(&second, 2, "B");
    let third = {
        second.session.close();
        start_journey(storage, 3)
    };
    assert_eq!(
        third.session.snapshot().view,
        JourneyView::narrative("n3")
    );
}

#[test]
fn test_reload_after_completion_shows_conclusion() {
    let storage = InMemoryStorage::new();
    let first = start_journey(storage.clone(), 1);
    view(&first, "intro");
    answer(&first, 1, "A");
    first.session.close();

    let second = start_journey(storage, 1);

    let snapshot = second.session.snapshot();
    assert_eq!(snapshot.view, JourneyView::Completed);
    assert!(snapshot.completed);
}

#[test]
fn test_viewing_a_narrative_twice_does_not_duplicate_it() {
    let harness = start_journey(InMemoryStorage::new(), 3);
    view(&harness, "intro");
    answer(&harness, 1, "A");

    view(&harness, "n2");
    let once = harness.store.load().viewed_narratives;
    view(&harness, "n2");
    let twice = harness.store.load().viewed_narratives;

    assert_eq!(once, twice);
    assert_eq!(twice, vec!["intro".to_owned(), "n2".to_owned()]);
}

fn arb_choice() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("A"), Just("B"), Just("C")]
}

proptest! {
    #[test]
    fn current_question_only_ever_steps_forward(
        (question_count, choices) in (1u32..=8).prop_flat_map(|n| {
            (Just(n), prop::collection::vec(arb_choice(), 0..=n as usize))
        }),
    ) {
        let harness = start_journey(InMemoryStorage::new(), question_count);
        view(&harness, "intro");

        for (id, choice) in (1u32..).zip(&choices) {
            let before = harness.store.load().current_question_id;
            answer(&harness, id, choice);
            let after = harness.store.load();

            prop_assert_eq!(after.current_question_id, before + 1);
            prop_assert_eq!(after.answer_for(id), Some(*choice));
            prop_assert_eq!(after.completed, id == question_count);
            if id < question_count {
                view(&harness, &format!("n{}", id + 1));
            }
        }

        let progress = harness.store.load();
        prop_assert_eq!(progress.answered_count(), choices.len());
        prop_assert_eq!(harness.session.snapshot().completed, choices.len() == question_count as usize);
    }
}

//! Wires a controller to an event bus.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use journey_core::event::EventKind;
use journey_progress::Progress;

use crate::application::controller::JourneyController;
use crate::bus::{EventBus, Subscription};
use crate::domain::view::JourneySnapshot;

const HANDLED_EVENTS: [EventKind; 3] = [
    EventKind::QuestionAnswered,
    EventKind::NarrativeViewed,
    EventKind::JourneyReset,
];

/// A running journey: a bootstrapped controller subscribed to a bus.
///
/// Dropping the session (or calling [`JourneySession::close`]) removes its
/// handlers from the bus.
#[derive(Debug)]
pub struct JourneySession {
    controller: Arc<Mutex<JourneyController>>,
    subscriptions: Vec<Subscription>,
}

fn lock(controller: &Mutex<JourneyController>) -> MutexGuard<'_, JourneyController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

impl JourneySession {
    /// Bootstraps `controller` and subscribes it to every journey event on
    /// `bus`.
    #[must_use]
    pub fn start(mut controller: JourneyController, bus: &EventBus) -> Self {
        controller.bootstrap();
        let controller = Arc::new(Mutex::new(controller));

        let subscriptions = HANDLED_EVENTS
            .into_iter()
            .map(|kind| {
                let controller = Arc::clone(&controller);
                bus.subscribe(kind, move |event| {
                    lock(&controller).handle(event);
                    Ok(())
                })
            })
            .collect();

        Self {
            controller,
            subscriptions,
        }
    }

    /// The current display state and progress meter.
    #[must_use]
    pub fn snapshot(&self) -> JourneySnapshot {
        lock(&self.controller).snapshot()
    }

    /// A copy of the progress the controller is working from.
    #[must_use]
    pub fn progress(&self) -> Progress {
        lock(&self.controller).progress().clone()
    }

    /// Unsubscribes from the bus and ends the session.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for JourneySession {
    fn drop(&mut self) {
        for subscription in &self.subscriptions {
            subscription.unsubscribe();
        }
    }
}

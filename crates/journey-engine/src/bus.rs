//! In-process publish/subscribe.
//!
//! Delivery is synchronous and in subscription order. A failing handler does
//! not stop delivery: every handler is attempted, failures are logged, and
//! the publisher receives all of them in a [`PublishError`].

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use journey_core::error::JourneyError;
use journey_core::event::{EventKind, JourneyEvent};
use thiserror::Error;

type Handler = Arc<dyn Fn(&JourneyEvent) -> Result<(), JourneyError> + Send + Sync>;

struct Registration {
    id: u64,
    kind: EventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One or more handlers failed while an event was delivered.
#[derive(Debug, Error)]
#[error("{} handler(s) failed for {event}", .failures.len())]
pub struct PublishError {
    /// Name of the event being delivered.
    pub event: &'static str,
    /// Errors returned by the failing handlers, in delivery order.
    pub failures: Vec<JourneyError>,
}

/// An explicitly constructed event bus. Clones share the same subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &lock(&self.registry).registrations.len())
            .finish()
    }
}

impl EventBus {
    /// Creates a bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// The returned handle removes exactly this registration when
    /// [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&JourneyEvent) -> Result<(), JourneyError> + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.registrations.push(Registration {
            id,
            kind,
            handler: Arc::new(handler),
        });
        tracing::trace!(event = kind.name(), id, "handler subscribed");
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Delivers `event` to every handler currently subscribed to its kind.
    ///
    /// Handlers subscribed or removed while the event is being delivered do
    /// not affect this delivery.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` listing every handler failure, after all
    /// handlers have been attempted.
    pub fn publish(&self, event: &JourneyEvent) -> Result<(), PublishError> {
        let kind = event.kind();
        let handlers: Vec<Handler> = lock(&self.registry)
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| Arc::clone(&r.handler))
            .collect();

        tracing::debug!(event = kind.name(), handlers = handlers.len(), "publishing");

        let failures: Vec<JourneyError> = handlers
            .iter()
            .filter_map(|handler| handler(event).err())
            .inspect(|err| tracing::warn!(event = kind.name(), error = %err, "event handler failed"))
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PublishError {
                event: kind.name(),
                failures,
            })
        }
    }

    /// Number of handlers subscribed to `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        lock(&self.registry)
            .registrations
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

/// Disposer for a single handler registration.
#[derive(Debug)]
#[must_use = "handlers stay registered until `unsubscribe` is called"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Removes the registration. Calling this again, or after the bus is
    /// gone, does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).registrations.retain(|r| r.id != self.id);
        }
    }
}

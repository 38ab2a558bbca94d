//! Shared test mocks and fixtures for the discovery journey.

mod clock;
mod content;
mod storage;
mod telemetry;

pub use clock::{FixedClock, fixed_now};
pub use content::sample_registries;
pub use storage::{FailingStorage, InMemoryStorage, UnclearableStorage};
pub use telemetry::RecordingTelemetry;

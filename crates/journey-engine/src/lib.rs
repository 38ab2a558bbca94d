//! Discovery journey — orchestration.
//!
//! The event bus that carries user actions, the pure functions that decide
//! what to display and how progress changes, and the controller that applies
//! them against the progress store.

pub mod application;
pub mod bus;
pub mod domain;

pub use application::controller::JourneyController;
pub use application::session::JourneySession;
pub use bus::{EventBus, PublishError, Subscription};
pub use domain::view::{JourneySnapshot, JourneyView, ProgressMeter};

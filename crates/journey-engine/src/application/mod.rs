//! Stateful orchestration over the progress store and the event bus.

pub mod controller;
pub mod session;

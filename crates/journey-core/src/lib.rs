//! Journey Core — shared abstractions for the discovery journey.
//!
//! This crate defines the event vocabulary, error type and the ports
//! (storage, telemetry, clock) that every other journey crate depends on.
//! It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod storage;
pub mod telemetry;

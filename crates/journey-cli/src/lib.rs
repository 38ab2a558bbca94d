//! Terminal host for the discovery journey.
//!
//! Renders the controller's snapshot as text and turns typed commands into
//! journey events on the bus. It never touches progress directly.

pub mod config;
pub mod error;
pub mod terminal;

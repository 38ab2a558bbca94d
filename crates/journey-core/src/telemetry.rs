//! Error-reporting sink.
//!
//! Failures are always recovered locally; reporting them is a side channel
//! and never changes control flow.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{FailureKind, JourneyError};

/// Whether a validated record was coming from or going to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Read from storage.
    Incoming,
    /// About to be written to storage.
    Outgoing,
}

/// A single captured failure.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Unique report identifier.
    pub report_id: Uuid,
    /// When the failure was captured.
    pub occurred_at: DateTime<Utc>,
    /// Failure classification.
    pub kind: FailureKind,
    /// The operation that failed (e.g. `loadProgress`).
    pub action: &'static str,
    /// Data direction, for schema failures on a storage boundary.
    pub direction: Option<Direction>,
    /// Human-readable error message.
    pub message: String,
}

/// External sink that receives failure reports.
pub trait TelemetrySink: Send + Sync {
    /// Capture a failure report.
    fn capture(&self, report: &FailureReport);
}

/// Default sink: emits every report as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn capture(&self, report: &FailureReport) {
        tracing::error!(
            report_id = %report.report_id,
            kind = report.kind.as_str(),
            action = report.action,
            direction = ?report.direction,
            "{}",
            report.message
        );
    }
}

/// Stamps failures with an id and timestamp and forwards them to a sink.
#[derive(Clone)]
pub struct Telemetry {
    sink: Arc<dyn TelemetrySink>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telemetry").finish_non_exhaustive()
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(Arc::new(TracingTelemetry), Arc::new(SystemClock))
    }
}

impl Telemetry {
    /// Create a reporter over `sink`, timestamping with `clock`.
    #[must_use]
    pub fn new(sink: Arc<dyn TelemetrySink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Report `error` raised by `action`.
    pub fn report(&self, action: &'static str, direction: Option<Direction>, error: &JourneyError) {
        let report = FailureReport {
            report_id: Uuid::new_v4(),
            occurred_at: self.clock.now(),
            kind: error.kind(),
            action,
            direction,
            message: error.to_string(),
        };
        self.sink.capture(&report);
    }
}

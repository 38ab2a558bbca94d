//! Test telemetry — a sink that keeps every report.

use std::sync::{Arc, Mutex};

use journey_core::error::FailureKind;
use journey_core::telemetry::{FailureReport, Telemetry, TelemetrySink};

use crate::clock::{FixedClock, fixed_now};

/// A telemetry sink that records all captured reports.
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    reports: Mutex<Vec<FailureReport>>,
}

impl RecordingTelemetry {
    /// Create a recording sink and a `Telemetry` reporter that feeds it,
    /// stamped by a fixed clock.
    #[must_use]
    pub fn new() -> (Arc<Self>, Telemetry) {
        let sink = Arc::new(Self::default());
        let telemetry = Telemetry::new(sink.clone(), Arc::new(FixedClock(fixed_now())));
        (sink, telemetry)
    }

    /// Returns a snapshot of all captured reports.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().unwrap().clone()
    }

    /// Returns the kinds of all captured reports, in capture order.
    pub fn kinds(&self) -> Vec<FailureKind> {
        self.reports().iter().map(|r| r.kind).collect()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn capture(&self, report: &FailureReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

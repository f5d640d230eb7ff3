use std::collections::VecDeque;

use serde::Serialize;

use super::runner::Sample;

// ---------------------------------------------------------------------------
// Run events
// ---------------------------------------------------------------------------

/// Kinds of events a run can report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    Converged,
    Diverged,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub step: usize,
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect each new sample and report events.
pub trait EventDetector {
    fn check(&mut self, sample: &Sample) -> Option<EventKind>;
}

/// Fires when max |error| over the last `window` samples drops below
/// `tolerance`.
pub struct ConvergenceDetector {
    pub tolerance: f64,
    window: usize,
    recent: VecDeque<f64>,
}

impl ConvergenceDetector {
    pub fn new(tolerance: f64, window: usize) -> Self {
        let window = window.max(1);
        Self { tolerance, window, recent: VecDeque::with_capacity(window) }
    }
}

impl EventDetector for ConvergenceDetector {
    fn check(&mut self, sample: &Sample) -> Option<EventKind> {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(sample.error.abs());

        let full = self.recent.len() == self.window;
        let worst = self.recent.iter().copied().fold(0.0_f64, f64::max);
        (full && worst < self.tolerance).then_some(EventKind::Converged)
    }
}

/// Fires when the plant output leaves `[-limit, limit]` or stops being finite.
pub struct DivergenceDetector {
    pub limit: f64,
}

impl EventDetector for DivergenceDetector {
    fn check(&mut self, sample: &Sample) -> Option<EventKind> {
        let out = sample.output;
        (!out.is_finite() || out.abs() > self.limit).then_some(EventKind::Diverged)
    }
}

use serde::Serialize;

use crate::control::Controller;
use crate::error::Result;
use super::config::SimConfig;
use super::event::{ConvergenceDetector, DivergenceDetector, EventDetector, EventKind, SimEvent};

// ---------------------------------------------------------------------------
// Trajectory records
// ---------------------------------------------------------------------------

/// One controller update as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub step: usize,  // 1-based
    pub time: f64,    // s, at the start of the step
    pub error: f64,   // pv - sp measured this step
    pub control: f64, // control value sent to the plant
    pub output: f64,  // pv measured this step
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Outcome {
    Converged { steps: usize },
    Diverged { step: usize },
    StepCap,
}

#[derive(Debug, Clone)]
pub struct Run {
    pub samples: Vec<Sample>,
    pub events: Vec<SimEvent>,
    pub outcome: Outcome,
}

impl Run {
    pub fn converged(&self) -> bool {
        matches!(self.outcome, Outcome::Converged { .. })
    }

    pub fn steps(&self) -> usize {
        self.samples.len()
    }

    pub fn final_error(&self) -> Option<f64> {
        self.samples.last().map(|s| s.error)
    }

    pub fn max_abs_output(&self) -> f64 {
        self.samples.iter().map(|s| s.output.abs()).fold(0.0_f64, f64::max)
    }

    pub fn max_abs_error(&self) -> f64 {
        self.samples.iter().map(|s| s.error.abs()).fold(0.0_f64, f64::max)
    }
}

// ---------------------------------------------------------------------------
// Closed-loop run
// ---------------------------------------------------------------------------

/// Step `controller` until a detector reports `Converged` or `Diverged`, or
/// the step cap is reached. Other events are recorded and the run goes on.
pub fn simulate_with(
    controller: &mut dyn Controller,
    config: &SimConfig,
    detectors: &mut [Box<dyn EventDetector>],
) -> Result<Run> {
    let ts = config.timestep;
    let mut samples = Vec::with_capacity(config.max_steps.min(100_000));
    let mut events = Vec::new();

    for step in 1..=config.max_steps {
        let pv = controller.output();
        let error = controller.update(ts)?;
        let sample = Sample {
            step,
            time: (step - 1) as f64 * ts,
            error,
            control: controller.control_value(),
            output: pv,
        };
        samples.push(sample);

        let mut stop = None;
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&sample) {
                stop = match &kind {
                    EventKind::Converged => stop.or(Some(Outcome::Converged { steps: step })),
                    EventKind::Diverged => Some(Outcome::Diverged { step }),
                    EventKind::Custom(_) => stop,
                };
                events.push(SimEvent { step, time: sample.time, kind });
            }
        }

        if let Some(outcome) = stop {
            match outcome {
                Outcome::Diverged { .. } => {
                    log::warn!("{} diverged at step {step} (pv={pv})", controller.name())
                }
                _ => log::info!("{} converged after {step} steps", controller.name()),
            }
            return Ok(Run { samples, events, outcome });
        }
    }

    log::warn!(
        "{} hit the step cap ({}) without converging",
        controller.name(),
        config.max_steps
    );
    Ok(Run { samples, events, outcome: Outcome::StepCap })
}

/// Run with the standard detectors built from `config`.
pub fn simulate(controller: &mut dyn Controller, config: &SimConfig) -> Result<Run> {
    let mut detectors: Vec<Box<dyn EventDetector>> =
        vec![Box::new(ConvergenceDetector::new(config.tolerance, config.window))];
    if let Some(limit) = config.divergence_limit {
        detectors.push(Box::new(DivergenceDetector { limit }));
    }
    simulate_with(controller, config, &mut detectors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use std::io::{self, Write};

use serde::Serialize;

use crate::sim::{Outcome, Run};

/// Summary statistics computed from a closed-loop run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub controller: String,
    pub timestep: f64,
    pub steps: usize,
    pub outcome: Outcome,
    pub final_error: f64,
    pub max_abs_error: f64,
    pub max_abs_output: f64,
    pub settle_time: Option<f64>,
}

impl RunSummary {
    pub fn from_run(controller: &str, timestep: f64, run: &Run) -> Self {
        let settle_time = match run.outcome {
            Outcome::Converged { steps } => Some(steps as f64 * timestep),
            _ => None,
        };
        RunSummary {
            controller: controller.to_string(),
            timestep,
            steps: run.steps(),
            outcome: run.outcome,
            final_error: run.final_error().unwrap_or(0.0),
            max_abs_error: run.max_abs_error(),
            max_abs_output: run.max_abs_output(),
            settle_time,
        }
    }
}

/// Write a run summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &RunSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}

/// Write a run summary JSON to a file.
pub fn write_summary_file(path: &str, summary: &RunSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

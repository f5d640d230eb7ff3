pub mod config;
pub mod event;
pub mod runner;

pub use config::SimConfig;
pub use event::{ConvergenceDetector, DivergenceDetector, EventDetector, EventKind, SimEvent};
pub use runner::{simulate, simulate_with, Outcome, Run, Sample};

use serde::{Deserialize, Serialize};

use crate::params::Params;

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// How a closed-loop run is stepped and when it stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub timestep: f64,                 // s, per controller update
    pub tolerance: f64,                // converged when max |error| over the window is below this
    pub window: usize,                 // samples in the convergence window
    pub max_steps: usize,              // hard stop
    pub divergence_limit: Option<f64>, // abort when |output| exceeds this
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 0.01,
            tolerance: 1e-4,
            window: 10,
            max_steps: 10_000,
            divergence_limit: None,
        }
    }
}

impl SimConfig {
    /// Overlay any of `timestep`, `tolerance`, `window`, `max_steps` and
    /// `divergence_limit` found in `params`.
    pub fn from_params(params: &Params) -> Self {
        let d = Self::default();
        let limit = params.f64_or("divergence_limit", f64::NAN);
        Self {
            timestep: params.f64_or("timestep", d.timestep),
            tolerance: params.f64_or("tolerance", d.tolerance),
            window: params.f64_or("window", d.window as f64).max(1.0) as usize,
            max_steps: params.f64_or("max_steps", d.max_steps as f64).max(0.0) as usize,
            divergence_limit: if limit.is_nan() { None } else { Some(limit) },
        }
    }

    pub fn timestep(mut self, v: f64) -> Self { self.timestep = v; self }
    pub fn tolerance(mut self, v: f64) -> Self { self.tolerance = v; self }
    pub fn window(mut self, v: usize) -> Self { self.window = v.max(1); self }
    pub fn max_steps(mut self, v: usize) -> Self { self.max_steps = v; self }
    pub fn divergence_limit(mut self, v: f64) -> Self { self.divergence_limit = Some(v); self }
}

use crate::error::{check_timestep, Result, SimError};
use crate::params::Params;
use super::Plant;

// ---------------------------------------------------------------------------
// First-order lag: output approaches the control input by 1/tau per sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FirstOrderLag {
    state: f64,
    control: f64,
    tau: f64,
}

impl FirstOrderLag {
    pub const DEFAULT_TAU: f64 = 16.0;

    pub fn new() -> Self {
        Self { state: 0.0, control: 0.0, tau: Self::DEFAULT_TAU }
    }

    /// Lag with the given time constant; `tau` must be positive.
    pub fn with_tau(tau: f64) -> Result<Self> {
        check_tau(tau)?;
        Ok(Self { tau, ..Self::new() })
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }
}

fn check_tau(tau: f64) -> Result<()> {
    if tau == 0.0 {
        Err(SimError::ZeroTimeConstant)
    } else if !(tau > 0.0) || !tau.is_finite() {
        Err(SimError::InvalidTimeConstant(tau))
    } else {
        Ok(())
    }
}

impl Default for FirstOrderLag {
    fn default() -> Self {
        Self::new()
    }
}

impl Plant for FirstOrderLag {
    fn output(&self) -> f64 {
        self.state
    }

    fn control_input(&self) -> f64 {
        self.control
    }

    /// Discrete exponential approach; `ts` is validated but the response is
    /// per sample.
    fn update(&mut self, control: f64, ts: f64) -> Result<()> {
        check_timestep(ts)?;
        check_tau(self.tau)?;
        self.control = control;
        self.state += (self.control - self.state) / self.tau;
        Ok(())
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        let tau = params.f64_or("tau", self.tau);
        check_tau(tau)?;
        self.tau = tau;
        log::debug!("first-order lag configured: tau={}", self.tau);
        Ok(())
    }

    fn name(&self) -> &str {
        "FirstOrderLag"
    }
}

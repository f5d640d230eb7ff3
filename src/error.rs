use thiserror::Error;

// ---------------------------------------------------------------------------
// Simulation errors
// ---------------------------------------------------------------------------

/// Errors raised while configuring a plant or advancing a control loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("channel half-angle {angle_deg} deg outside [1, 180]")]
    Configuration { angle_deg: f64 },

    #[error("timestep must be non-zero")]
    ZeroTimestep,

    #[error("timestep {0} must be positive and finite")]
    InvalidTimestep(f64),

    #[error("first-order lag time constant must be non-zero")]
    ZeroTimeConstant,

    #[error("first-order lag time constant {0} must be positive and finite")]
    InvalidTimeConstant(f64),

    #[error("standard-form integral time must be non-zero")]
    ZeroIntegralTime,
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject a timestep the derivative term or the knee time cannot divide by.
pub fn check_timestep(ts: f64) -> Result<()> {
    if ts == 0.0 {
        Err(SimError::ZeroTimestep)
    } else if !ts.is_finite() || ts < 0.0 {
        Err(SimError::InvalidTimestep(ts))
    } else {
        Ok(())
    }
}

pub mod first_order;
pub mod ball_channel;

pub use first_order::FirstOrderLag;
pub use ball_channel::BallChannel;

use crate::error::Result;
use crate::params::Params;

/// Trait for simulated plants.
///
/// A controller owns exactly one plant, reads its output every step and
/// pushes the new control value back through `update`.
pub trait Plant {
    /// Measured process value.
    fn output(&self) -> f64;

    /// Control input currently applied to the plant.
    fn control_input(&self) -> f64;

    /// Apply `control` and advance the plant by `ts` seconds.
    fn update(&mut self, control: f64, ts: f64) -> Result<()>;

    /// Read the options this plant recognises; others are ignored.
    fn configure(&mut self, params: &Params) -> Result<()>;

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "plant"
    }
}

impl<P: Plant + ?Sized> Plant for Box<P> {
    fn output(&self) -> f64 {
        (**self).output()
    }

    fn control_input(&self) -> f64 {
        (**self).control_input()
    }

    fn update(&mut self, control: f64, ts: f64) -> Result<()> {
        (**self).update(control, ts)
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        (**self).configure(params)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

use crate::error::Result;

/// Trait for closed-loop controllers.
///
/// Implement this to plug a control law into the simulation runner. Each
/// controller owns its plant and advances it once per `update`.
pub trait Controller {
    /// Measure, correct and advance the plant by `ts`.
    /// Returns the error measured at the start of the step.
    fn update(&mut self, ts: f64) -> Result<f64>;

    /// Control value most recently sent to the plant.
    fn control_value(&self) -> f64;

    /// Current plant output.
    fn output(&self) -> f64;

    fn setpoint(&self) -> f64;

    /// Reset controller internal state (error and derivative history).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

use crate::error::{check_timestep, Result};
use crate::params::Params;
use crate::plant::Plant;
use super::Controller;

// ---------------------------------------------------------------------------
// Independent-form (ISA) PID in velocity form
// ---------------------------------------------------------------------------

/// PID controller whose three terms each carry their own gain.
///
/// The controller works in velocity form: every step computes a change in
/// control value and adds it to the previous one.
///
/// - proportional: `(e - e_prev) * Kp`
/// - integral:     `e * Ki * ts`
/// - derivative:   `(pv - pv_prev) * Kd / ts`, with the previous step's
///   derivative term subtracted so it does not accumulate
///
/// Error is `pv - sp`. With reverse action (the default) the change is added
/// to the control value; direct action subtracts it.
#[derive(Debug, Clone)]
pub struct IndependentPid<P: Plant> {
    plant: P,
    sp: f64,
    cv: f64,
    kp: f64,
    ki: f64,
    kd: f64,
    direct: bool,
    last_error: f64,
    last_pv: f64,
    last_derivative: f64,
}

impl<P: Plant> IndependentPid<P> {
    /// Wrap an already configured plant. Gains start at zero and the
    /// setpoint at the plant's current output.
    pub fn new(plant: P) -> Self {
        let pv = plant.output();
        let cv = plant.control_input();
        Self {
            plant,
            sp: pv,
            cv,
            kp: 0.0,
            ki: 0.0,
            kd: 0.0,
            direct: false,
            last_error: 0.0,
            last_pv: pv,
            last_derivative: 0.0,
        }
    }

    /// Build the plant from `params`, then read tuning and setpoint from the
    /// same option set.
    pub fn from_params(params: &Params) -> Result<Self>
    where
        P: Default,
    {
        let mut plant = P::default();
        plant.configure(params)?;
        let mut pid = Self::new(plant);
        pid.tune(params).set_setpoint(params);
        Ok(pid)
    }

    /// Read `Kp`, `Ki`, `Kd` and `direct`; absent or malformed values keep
    /// their current setting.
    pub fn tune(&mut self, params: &Params) -> &mut Self {
        self.kp = params.f64_or("Kp", self.kp);
        self.ki = params.f64_or("Ki", self.ki);
        self.kd = params.f64_or("Kd", self.kd);
        self.direct = params.bool_or("direct", self.direct);
        self
    }

    /// Read `sp`; absent or malformed keeps the current setpoint.
    pub fn set_setpoint(&mut self, params: &Params) -> &mut Self {
        self.sp = params.f64_or("sp", self.sp);
        self
    }

    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) -> &mut Self {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        self
    }

    pub fn set_direct(&mut self, direct: bool) -> &mut Self {
        self.direct = direct;
        self
    }

    pub fn set_sp(&mut self, sp: f64) -> &mut Self {
        self.sp = sp;
        self
    }

    pub fn kp(&self) -> f64 { self.kp }
    pub fn ki(&self) -> f64 { self.ki }
    pub fn kd(&self) -> f64 { self.kd }
    pub fn is_direct(&self) -> bool { self.direct }
    pub fn last_error(&self) -> f64 { self.last_error }
    pub fn last_pv(&self) -> f64 { self.last_pv }
    pub fn last_derivative(&self) -> f64 { self.last_derivative }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    pub fn plant_mut(&mut self) -> &mut P {
        &mut self.plant
    }

    pub fn into_plant(self) -> P {
        self.plant
    }

    /// One control step. The timestep is checked before any state changes.
    pub fn step(&mut self, ts: f64) -> Result<f64> {
        check_timestep(ts)?;

        let pv = self.plant.output();
        let error = pv - self.sp;

        let proportional = (error - self.last_error) * self.kp;
        let integral = error * self.ki * ts;
        let derivative = (pv - self.last_pv) * self.kd / ts;

        let delta = proportional + integral + derivative - self.last_derivative;
        let sign = if self.direct { -1.0 } else { 1.0 };
        let cv = self.cv + delta * sign;

        self.plant.update(cv, ts)?;

        self.cv = cv;
        self.last_error = error;
        self.last_pv = pv;
        self.last_derivative = derivative;

        log::trace!(
            "{}: pv={pv:.6} err={error:.6} P={proportional:.6} I={integral:.6} D={derivative:.6} cv={cv:.6}",
            self.plant.name()
        );
        Ok(error)
    }
}

impl<P: Plant> Controller for IndependentPid<P> {
    fn update(&mut self, ts: f64) -> Result<f64> {
        self.step(ts)
    }

    fn control_value(&self) -> f64 {
        self.cv
    }

    fn output(&self) -> f64 {
        self.plant.output()
    }

    fn setpoint(&self) -> f64 {
        self.sp
    }

    fn reset(&mut self) {
        self.last_error = 0.0;
        self.last_derivative = 0.0;
        self.last_pv = self.plant.output();
        self.cv = self.plant.control_input();
    }

    fn name(&self) -> &str {
        "IndependentPid"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

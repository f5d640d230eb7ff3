use crate::error::{check_timestep, Result, SimError};
use crate::params::Params;
use crate::plant::Plant;
use super::Controller;

// ---------------------------------------------------------------------------
// Standard-form PID, one correction per sample
// ---------------------------------------------------------------------------

/// Classical standard-form velocity PID with no timestep scaling.
///
/// `dcv = (e - e_prev) * Kp + e / Ti + (pv - pv_prev) * Td`
///
/// Numerically distinct from [`super::IndependentPid`]: the integral is
/// divided by an integral time instead of multiplied by a gain and `ts`, and
/// the derivative term is neither divided by `ts` nor cancelled against the
/// previous sample.
#[derive(Debug, Clone)]
pub struct StandardPid<P: Plant> {
    plant: P,
    sp: f64,
    cv: f64,
    kp: f64,
    ti: f64,
    td: f64,
    direct: bool,
    last_error: f64,
    last_pv: f64,
    sample_period: f64,
}

impl<P: Plant> StandardPid<P> {
    pub const DEFAULT_SAMPLE_PERIOD: f64 = 1.0;

    pub fn new(plant: P) -> Self {
        let pv = plant.output();
        let cv = plant.control_input();
        Self {
            plant,
            sp: pv,
            cv,
            kp: 0.0,
            ti: 0.0,
            td: 0.0,
            direct: false,
            last_error: 0.0,
            last_pv: pv,
            sample_period: Self::DEFAULT_SAMPLE_PERIOD,
        }
    }

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

    /// Read `Kp`, `Ti`, `Td` and `direct`, keeping current values for
    /// anything absent or malformed.
    pub fn tune(&mut self, params: &Params) -> &mut Self {
        self.kp = params.f64_or("Kp", self.kp);
        self.ti = params.f64_or("Ti", self.ti);
        self.td = params.f64_or("Td", self.td);
        self.direct = params.bool_or("direct", self.direct);
        self
    }

    pub fn set_setpoint(&mut self, params: &Params) -> &mut Self {
        self.sp = params.f64_or("sp", self.sp);
        self
    }

    pub fn set_gains(&mut self, kp: f64, ti: f64, td: f64) -> &mut Self {
        self.kp = kp;
        self.ti = ti;
        self.td = td;
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

    /// Time the plant is advanced by on each [`StandardPid::step`].
    pub fn set_sample_period(&mut self, period: f64) -> Result<&mut Self> {
        check_timestep(period)?;
        self.sample_period = period;
        Ok(self)
    }

    pub fn kp(&self) -> f64 { self.kp }
    pub fn ti(&self) -> f64 { self.ti }
    pub fn td(&self) -> f64 { self.td }
    pub fn is_direct(&self) -> bool { self.direct }
    pub fn sample_period(&self) -> f64 { self.sample_period }

    pub fn plant(&self) -> &P {
        &self.plant
    }

    pub fn plant_mut(&mut self) -> &mut P {
        &mut self.plant
    }

    /// One sample at the configured sample period.
    pub fn step(&mut self) -> Result<f64> {
        self.advance(self.sample_period)
    }

    fn advance(&mut self, ts: f64) -> Result<f64> {
        check_timestep(ts)?;
        if self.ti == 0.0 {
            return Err(SimError::ZeroIntegralTime);
        }

        let pv = self.plant.output();
        let error = pv - self.sp;

        let proportional = (error - self.last_error) * self.kp;
        let integral = error / self.ti;
        let derivative = (pv - self.last_pv) * self.td;

        let sign = if self.direct { -1.0 } else { 1.0 };
        let cv = self.cv + (proportional + integral + derivative) * sign;

        self.plant.update(cv, ts)?;

        self.cv = cv;
        self.last_error = error;
        self.last_pv = pv;

        log::trace!("{}: pv={pv:.6} err={error:.6} cv={cv:.6}", self.plant.name());
        Ok(error)
    }
}

impl<P: Plant> Controller for StandardPid<P> {
    /// The control law ignores `ts`; it only sets how far the plant moves.
    fn update(&mut self, ts: f64) -> Result<f64> {
        self.advance(ts)
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
        self.last_pv = self.plant.output();
        self.cv = self.plant.control_input();
    }

    fn name(&self) -> &str {
        "StandardPid"
    }
}

use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};

use crate::error::{check_timestep, Result, SimError};
use crate::params::Params;
use super::Plant;

// ---------------------------------------------------------------------------
// Ball rolling in a tiltable channel of circular cross-section
// ---------------------------------------------------------------------------

/// Gravitational acceleration along the channel axis at full tilt, m/s^2.
pub const GRAVITY: f64 = -9.8;

/// Tilt changes smaller than this are integrated as a constant-angle step.
const NEGLIGIBLE_DTHETA: f64 = 1e-9;

/// Ball in a channel whose tilt angle (rad) is the control input.
///
/// The ball's acceleration along the channel is `accel_coeff * sin(theta)`,
/// where `accel_coeff` accounts for the rolling inertia of a solid ball
/// riding on the channel walls at the configured half-angle.
///
/// Each step is integrated in closed form: while theta ramps toward its
/// target at the rate limit the motion has an analytic solution, and once
/// theta holds the motion is plain constant acceleration.
#[derive(Debug, Clone)]
pub struct BallChannel {
    phase: Vector2<f64>, // [position m, velocity m/s]
    theta: f64,          // rad
    channel_angle_deg: f64,
    rate_limit: f64,     // rad/s, <= 0 means unlimited
    use_sine: bool,
    accel_coeff: f64,    // m/s^2
}

/// Effective acceleration coefficient for a channel half-angle in degrees.
pub fn accel_coeff(channel_angle_deg: f64) -> f64 {
    let sine_half = (channel_angle_deg * PI / 360.0).sin();
    let k = 2.0 / (3.0 * sine_half * sine_half);
    GRAVITY / (k + 1.0)
}

impl BallChannel {
    pub const DEFAULT_ANGLE_DEG: f64 = 90.0;

    pub fn new() -> Self {
        Self {
            phase: Vector2::zeros(),
            theta: 0.0,
            channel_angle_deg: Self::DEFAULT_ANGLE_DEG,
            rate_limit: 0.0,
            use_sine: true,
            accel_coeff: accel_coeff(Self::DEFAULT_ANGLE_DEG),
        }
    }

    /// Map a controller output to a target tilt angle. Currently the
    /// control value is the angle in radians.
    pub fn control_to_angle(&self, control: f64) -> f64 {
        control
    }

    pub fn position(&self) -> f64 {
        self.phase.x
    }

    pub fn velocity(&self) -> f64 {
        self.phase.y
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn accel_coeff(&self) -> f64 {
        self.accel_coeff
    }

    pub fn rate_limit(&self) -> f64 {
        self.rate_limit
    }

    pub fn channel_angle_deg(&self) -> f64 {
        self.channel_angle_deg
    }

    /// Reserved flag; accepted and reported but not used by the physics.
    pub fn use_sine(&self) -> bool {
        self.use_sine
    }

    /// Acceleration along the channel at tilt `theta`.
    pub fn acceleration(&self, theta: f64) -> f64 {
        self.accel_coeff * theta.sin()
    }

    /// Advance theta toward `target` under the rate limit.
    /// Returns the knee time and the signed tilt rate during the ramp.
    fn slew(&mut self, target: f64, ts: f64) -> (f64, f64) {
        if self.rate_limit <= 0.0 {
            self.theta = target;
            return (0.0, 0.0);
        }

        let mut dtheta = target - self.theta;
        if dtheta.abs() <= NEGLIGIBLE_DTHETA {
            self.theta = target;
            return (0.0, 0.0);
        }

        let mut tknee = (dtheta / self.rate_limit).abs();
        if tknee > ts {
            // Still ramping when the step ends
            dtheta *= ts / tknee;
            self.theta += dtheta;
            tknee = ts;
        } else {
            self.theta = target;
        }

        let rate = if dtheta < 0.0 { -self.rate_limit } else { self.rate_limit };
        (tknee, rate)
    }

    /// Exact motion over `[0, tknee]` with theta ramping linearly from
    /// `theta0` to the current theta at `rate`.
    fn integrate_ramp(&mut self, theta0: f64, rate: f64, tknee: f64) {
        let (sin0, cos0) = theta0.sin_cos();
        let (sin1, cos1) = self.theta.sin_cos();
        let gok = self.accel_coeff / rate;
        let gok2 = gok / rate;

        let v0 = self.phase.y;
        self.phase.y -= gok * (cos1 - cos0);
        self.phase.x += tknee * (v0 + gok * cos0) - gok2 * (sin1 - sin0);
    }

    /// Exact motion over `dt` at constant acceleration `a`.
    fn integrate_constant(&mut self, a: f64, dt: f64) {
        let transition = Matrix2::new(1.0, dt, 0.0, 1.0);
        let input = Vector2::new(0.5 * dt * dt, dt);
        self.phase = transition * self.phase + input * a;
    }
}

impl Default for BallChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Plant for BallChannel {
    fn output(&self) -> f64 {
        self.position()
    }

    fn control_input(&self) -> f64 {
        self.theta
    }

    fn update(&mut self, control: f64, ts: f64) -> Result<()> {
        check_timestep(ts)?;

        let theta0 = self.theta;
        let target = self.control_to_angle(control);
        let (tknee, rate) = self.slew(target, ts);

        if tknee > 0.0 {
            self.integrate_ramp(theta0, rate, tknee);
        }
        if tknee < ts {
            let a = self.acceleration(self.theta);
            self.integrate_constant(a, ts - tknee);
        }
        Ok(())
    }

    fn configure(&mut self, params: &Params) -> Result<()> {
        let use_sine = params.bool_or("use_sine", self.use_sine);
        let rate_limit = params.f64_or("rate_limit", self.rate_limit);
        let angle_deg = params.f64_or("angle_deg", self.channel_angle_deg);
        let position = params.f64_or("position", self.phase.x);
        let velocity = params.f64_or("velocity", self.phase.y);
        let theta = params.f64_or("theta", self.theta);

        if !(1.0..=180.0).contains(&angle_deg) {
            return Err(SimError::Configuration { angle_deg });
        }

        self.use_sine = use_sine;
        self.rate_limit = rate_limit;
        self.channel_angle_deg = angle_deg;
        self.phase = Vector2::new(position, velocity);
        self.theta = theta;
        self.accel_coeff = accel_coeff(angle_deg);

        log::debug!(
            "ball channel configured: angle={}deg accel_coeff={:.4} rate_limit={} x0={} v0={} theta0={}",
            self.channel_angle_deg,
            self.accel_coeff,
            self.rate_limit,
            position,
            velocity,
            theta,
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "BallChannel"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn channel(params: Params) -> BallChannel {
        let mut b = BallChannel::new();
        b.configure(&params).unwrap();
        b
    }

    /// Fine-step midpoint integration of the same dynamics, for comparison.
    fn numeric_reference(b: &BallChannel, theta0: f64, rate: f64, tknee: f64, ts: f64) -> (f64, f64) {
        let n = 200_000;
        let h = ts / n as f64;
        let (mut x, mut v) = (b.position(), b.velocity());
        let theta_at = |t: f64| if t < tknee { theta0 + rate * t } else { theta0 + rate * tknee };
        for i in 0..n {
            let t = i as f64 * h;
            let a_mid = b.acceleration(theta_at(t + 0.5 * h));
            x += (v + 0.5 * a_mid * h) * h;
            v += a_mid * h;
        }
        (x, v)
    }

    #[test]
    fn coefficient_for_right_angle_channel() {
        // sin^2(45 deg) = 1/2 -> k = 4/3 -> g / (7/3)
        assert_relative_eq!(accel_coeff(90.0), GRAVITY * 3.0 / 7.0, epsilon = 1e-12);
        assert_relative_eq!(BallChannel::new().accel_coeff(), -4.2, epsilon = 1e-12);
    }

    #[test]
    fn flat_channel_is_slower_than_open_channel() {
        assert!(accel_coeff(10.0).abs() < accel_coeff(180.0).abs());
        assert!(accel_coeff(180.0).abs() < GRAVITY.abs());
    }

    #[test]
    fn angle_out_of_range_rejected() {
        for bad in [0.5, 180.5, -90.0] {
            let mut b = BallChannel::new();
            let err = b.configure(&Params::new().with("angle_deg", bad).with("position", 1.0));
            assert_eq!(err, Err(SimError::Configuration { angle_deg: bad }));
            // Nothing applied from the rejected option set
            assert_eq!(b.position(), 0.0);
            assert_eq!(b.channel_angle_deg(), 90.0);
        }
    }

    #[test]
    fn range_endpoints_accepted() {
        assert!(BallChannel::new().configure(&Params::new().with("angle_deg", 1.0)).is_ok());
        assert!(BallChannel::new().configure(&Params::new().with("angle_deg", 180.0)).is_ok());
    }

    #[test]
    fn configure_sets_initial_state() {
        let b = channel(
            Params::new()
                .with("position", -0.15)
                .with("velocity", 0.2)
                .with("theta", 0.1)
                .with("rate-limit", 1.5),
        );
        assert_eq!(b.position(), -0.15);
        assert_eq!(b.velocity(), 0.2);
        assert_eq!(b.theta(), 0.1);
        assert_eq!(b.rate_limit(), 1.5);
        assert_eq!(b.output(), -0.15);
        assert_eq!(b.control_input(), 0.1);
    }

    #[test]
    fn control_maps_to_angle_unchanged() {
        let b = BallChannel::new();
        assert_eq!(b.control_to_angle(0.37), 0.37);
        assert_eq!(b.control_to_angle(-1.2), -1.2);
    }

    #[test]
    fn unlimited_rate_jumps_to_target() {
        for ts in [1e-4, 0.01, 1.0, 10.0] {
            let mut b = BallChannel::new();
            b.update(0.3, ts).unwrap();
            assert_eq!(b.theta(), 0.3);
        }
    }

    #[test]
    fn rate_limited_step_stops_short() {
        let mut b = channel(Params::new().with("rate_limit", 2.0).with("theta", 0.1));
        b.update(-1.0, 0.1).unwrap();
        assert_relative_eq!(b.theta(), 0.1 - 2.0 * 0.1, epsilon = 1e-12);
        b.update(1.0, 0.05).unwrap();
        assert_relative_eq!(b.theta(), -0.1 + 2.0 * 0.05, epsilon = 1e-12);
    }

    #[test]
    fn rate_limited_step_reaches_near_target() {
        let mut b = channel(Params::new().with("rate_limit", 2.0));
        b.update(0.05, 0.1).unwrap();
        assert_eq!(b.theta(), 0.05);
    }

    #[test]
    fn negligible_change_is_constant_theta_step() {
        let mut limited = channel(Params::new().with("rate_limit", 1.0).with("theta", 0.2).with("velocity", 0.3));
        let mut free = channel(Params::new().with("theta", 0.2).with("velocity", 0.3));
        let target = 0.2 + 1e-12;
        limited.update(target, 0.5).unwrap();
        free.update(target, 0.5).unwrap();
        assert_eq!(limited.theta(), target);
        assert_relative_eq!(limited.position(), free.position(), epsilon = 1e-12);
        assert_relative_eq!(limited.velocity(), free.velocity(), epsilon = 1e-12);
    }

    #[test]
    fn constant_theta_matches_kinematics() {
        let c: f64 = 0.25;
        let (x0, v0) = (-0.1, 0.4);
        let mut b = channel(Params::new().with("position", x0).with("velocity", v0).with("theta", c));
        let a = b.accel_coeff() * c.sin();
        let ts = 0.01;
        for i in 1..=500 {
            b.update(c, ts).unwrap();
            let t = i as f64 * ts;
            assert_relative_eq!(b.velocity(), v0 + a * t, epsilon = 1e-9);
            assert_relative_eq!(b.position(), x0 + v0 * t + 0.5 * a * t * t, epsilon = 1e-9);
        }
    }

    #[test]
    fn ramp_through_whole_step_matches_numeric() {
        let theta0 = 0.2;
        let rate = -0.8;
        let ts = 0.5;
        let b = channel(Params::new().with("rate_limit", 0.8).with("theta", theta0).with("velocity", 0.1));
        let (x_ref, v_ref) = numeric_reference(&b, theta0, rate, ts, ts);

        let mut stepped = b.clone();
        stepped.update(-2.0, ts).unwrap();
        assert_relative_eq!(stepped.theta(), theta0 + rate * ts, epsilon = 1e-12);
        assert_relative_eq!(stepped.velocity(), v_ref, epsilon = 1e-8);
        assert_relative_eq!(stepped.position(), x_ref, epsilon = 1e-8);
    }

    #[test]
    fn ramp_then_hold_matches_numeric() {
        let theta0 = -0.3;
        let target = 0.5;
        let rate = 2.0;
        let ts = 1.0;
        let tknee = (target - theta0) / rate;
        let b = channel(Params::new().with("rate_limit", rate).with("theta", theta0).with("position", 0.2));
        let (x_ref, v_ref) = numeric_reference(&b, theta0, rate, tknee, ts);

        let mut stepped = b.clone();
        stepped.update(target, ts).unwrap();
        assert_eq!(stepped.theta(), target);
        assert_relative_eq!(stepped.velocity(), v_ref, epsilon = 1e-8);
        assert_relative_eq!(stepped.position(), x_ref, epsilon = 1e-8);
    }

    #[test]
    fn splitting_a_ramp_gives_same_result() {
        let base = channel(Params::new().with("rate_limit", 1.0).with("velocity", -0.2));
        let mut whole = base.clone();
        whole.update(3.0, 0.4).unwrap();
        let mut halves = base.clone();
        halves.update(3.0, 0.2).unwrap();
        halves.update(3.0, 0.2).unwrap();
        assert_relative_eq!(whole.theta(), halves.theta(), epsilon = 1e-12);
        assert_relative_eq!(whole.velocity(), halves.velocity(), epsilon = 1e-12);
        assert_relative_eq!(whole.position(), halves.position(), epsilon = 1e-12);
    }

    #[test]
    fn use_sine_has_no_effect_on_motion() {
        let mut on = channel(Params::new().with("use_sine", true).with("rate_limit", 0.5).with("position", 0.1));
        let mut off = channel(Params::new().with("use_sine", "no").with("rate_limit", 0.5).with("position", 0.1));
        assert!(on.use_sine());
        assert!(!off.use_sine());
        for k in 0..100 {
            let cv = (k as f64 * 0.1).sin();
            on.update(cv, 0.05).unwrap();
            off.update(cv, 0.05).unwrap();
        }
        assert_eq!(on.position(), off.position());
        assert_eq!(on.velocity(), off.velocity());
    }

    #[test]
    fn non_finite_rate_limit_keeps_previous() {
        let mut b = channel(Params::new().with("rate_limit", "nan").with("velocity", 1.0));
        assert_eq!(b.rate_limit(), 0.0);
        b.configure(&Params::new().with("rate_limit", 2.0)).unwrap();
        b.configure(&Params::new().with("rate_limit", "inf")).unwrap();
        assert_eq!(b.rate_limit(), 2.0);

        let mut free = channel(Params::new().with("velocity", 1.0));
        free.update(0.0, 0.1).unwrap();
        assert_relative_eq!(free.position(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn zero_timestep_rejected_without_mutation() {
        let mut b = channel(Params::new().with("rate_limit", 1.0).with("position", 0.3));
        assert_eq!(b.update(1.0, 0.0), Err(SimError::ZeroTimestep));
        assert_eq!(b.theta(), 0.0);
        assert_eq!(b.position(), 0.3);
    }
}

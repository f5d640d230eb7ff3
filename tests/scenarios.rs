//! End-to-end closed-loop scenarios.

use pidsim::control::{Controller, IndependentPid};
use pidsim::plant::{BallChannel, FirstOrderLag};
use pidsim::sim::{self, Outcome, SimConfig};
use pidsim::Params;

// ── First-order lag ──────────────────────────────────────────

#[test]
fn lag_settles_below_tolerance() {
    let params = Params::new()
        .with("Kp", 1.0)
        .with("Ki", 0.03125)
        .with("Kd", 0.0)
        .with("direct", true)
        .with("sp", 10.0)
        .with("tau", 16.0);
    let mut pid = IndependentPid::<FirstOrderLag>::from_params(&params).unwrap();

    let mut last = f64::MAX;
    for _ in 0..2_000 {
        last = pid.update(1.0).unwrap();
    }
    assert!(last.abs() < 1e-3, "error after 2000 steps: {last}");
}

#[test]
fn lag_run_converges_within_cap() {
    let params = Params::new()
        .with("Kp", 1.0)
        .with("Ki", 0.03125)
        .with("direct", true)
        .with("sp", 10.0)
        .with("tau", 16.0);
    let mut pid = IndependentPid::<FirstOrderLag>::from_params(&params).unwrap();
    let config = SimConfig::default().timestep(1.0).tolerance(1e-3).max_steps(5_000);

    let run = sim::simulate(&mut pid, &config).unwrap();
    assert!(run.converged(), "outcome {:?}", run.outcome);
    assert!((pid.output() - 10.0).abs() < 1e-3);
}

// ── Ball channel ─────────────────────────────────────────────

fn ball_params(position: f64, rate_limit: f64) -> Params {
    Params::new()
        .with("angle_deg", 90.0)
        .with("Kp", 3.0)
        .with("Kd", 2.0)
        .with("sp", 0.0)
        .with("direct", false)
        .with("rate_limit", rate_limit)
        .with("position", position)
}

#[test]
fn ball_returns_to_centre_without_divergence() {
    for p0 in [-0.15, 0.1] {
        let mut pid = IndependentPid::<BallChannel>::from_params(&ball_params(p0, 0.0)).unwrap();
        let config = SimConfig::default().divergence_limit(2.0 * p0.abs());

        let run = sim::simulate(&mut pid, &config).unwrap();
        match run.outcome {
            Outcome::Converged { steps } => assert!(steps <= 10_000),
            other => panic!("ball from {p0} did not settle: {other:?}"),
        }
        assert!(pid.plant().position().abs() < 1e-4);
        assert!(run.max_abs_output() <= 1.05 * p0.abs());
    }
}

#[test]
fn rate_limited_ball_still_settles() {
    for rate in [0.5, 2.0] {
        let mut pid = IndependentPid::<BallChannel>::from_params(&ball_params(-0.15, rate)).unwrap();
        let run = sim::simulate(&mut pid, &SimConfig::default()).unwrap();
        assert!(run.converged(), "rate {rate}: {:?}", run.outcome);
        assert!(pid.plant().position().abs() < 1e-4);
    }
}

#[test]
fn tilt_command_respects_rate_limit_each_step() {
    let rate = 0.5;
    let ts = 0.01;
    let mut pid = IndependentPid::<BallChannel>::from_params(&ball_params(-0.15, rate)).unwrap();
    let mut prev = pid.plant().theta();
    for _ in 0..1_000 {
        pid.update(ts).unwrap();
        let theta = pid.plant().theta();
        assert!((theta - prev).abs() <= rate * ts + 1e-12);
        prev = theta;
    }
}

use pidsim::control::{Controller, IndependentPid};
use pidsim::plant::{BallChannel, FirstOrderLag};
use pidsim::sim::{self, Run, SimConfig};
use pidsim::Params;

fn main() -> pidsim::Result<()> {
    env_logger::init();

    println!();
    println!("====================================================================");
    println!("  INDEPENDENT-FORM PID — closed-loop scenarios");
    println!("====================================================================");

    lag_sweep()?;
    ball_channel()?;

    println!("====================================================================");
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// First-order lag: integral gain sweep
// ---------------------------------------------------------------------------

fn lag_sweep() -> pidsim::Result<()> {
    let base = Params::new()
        .with("tau", 16.0)
        .with("Kp", 1.0)
        .with("sp", 10.0)
        .with("direct", true);
    let config = SimConfig::default().timestep(1.0).tolerance(1e-3).max_steps(100_000);

    println!();
    println!("  First-order lag (tau=16, Kp=1, sp=10, direct)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  {:>10}  {:>10}  {:>8}  {:>12}", "1/Ki", "Ki", "steps", "final error");
    println!("  {}", "─".repeat(46));

    for divisor in [32.0, 16.0, 4.0, 1.0, 0.25, 0.0625] {
        let mut params = base.clone();
        params.insert("Ki", 1.0 / divisor);
        let mut pid = IndependentPid::<FirstOrderLag>::from_params(&params)?;
        let run = sim::simulate(&mut pid, &config)?;
        println!(
            "  {:>10}  {:>10.4}  {:>8}  {:>12.2e}{}",
            divisor,
            pid.ki(),
            run.steps(),
            run.final_error().unwrap_or(0.0),
            if run.converged() { "" } else { "  (not settled)" }
        );
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Ball in a tilting channel
// ---------------------------------------------------------------------------

fn ball_channel() -> pidsim::Result<()> {
    let params = Params::new()
        .with("angle_deg", 90.0)
        .with("position", -0.15)
        .with("Kp", 3.0)
        .with("Kd", 2.0)
        .with("sp", 0.0)
        .with("direct", false);
    let config = SimConfig::default();

    let mut pid = IndependentPid::<BallChannel>::from_params(&params)?;
    let (p0, v0) = (pid.plant().position(), pid.plant().velocity());
    let run = sim::simulate(&mut pid, &config)?;

    println!("  Ball channel (90 deg, Kp=3, Kd=2, sp=0, reverse)");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Accel coeff:   {:>8.3} m/s^2/rad   Initial pos: {:>6.3} m   vel: {:>5.2} m/s",
        pid.plant().accel_coeff(),
        p0,
        v0
    );
    println!(
        "  Outcome:       {:?} after {} steps ({:.2} s)",
        run.outcome,
        run.steps(),
        run.steps() as f64 * config.timestep
    );
    println!("  Final pos:     {:>10.2e} m   Final tilt: {:>8.2e} rad", pid.output(), pid.control_value());
    println!();
    print_table(&run);
    Ok(())
}

fn print_table(run: &Run) {
    println!("  {:>7}  {:>10}  {:>10}", "t (s)", "pos (m)", "tilt (rad)");
    println!("  {}", "─".repeat(31));

    let sample_interval = (run.samples.len() / 20).max(1);
    for (i, s) in run.samples.iter().enumerate() {
        if i % sample_interval != 0 && i != run.samples.len() - 1 {
            continue;
        }
        println!("  {:>7.2}  {:>10.5}  {:>10.5}", s.time, s.output, s.control);
    }
    println!();
}

use pidsim::control::{Controller, IndependentPid, StandardPid};
use pidsim::plant::FirstOrderLag;
use pidsim::sim::{self, SimConfig};
use pidsim::Params;

/// Settling steps of the standard and independent forms on the same lag.
fn main() -> pidsim::Result<()> {
    let config = SimConfig::default().timestep(1.0).tolerance(1e-3).max_steps(50_000);

    println!("{:>8}  {:>16}  {:>16}", "Ti", "standard steps", "independent steps");
    for ti in [16.0, 8.0, 4.0, 2.0, 1.0, 0.5, 0.25] {
        let params = Params::new()
            .with("tau", 10.0)
            .with("Kp", 1.0)
            .with("Ti", ti)
            .with("Ki", 1.0 / ti)
            .with("sp", 10.0)
            .with("direct", true);

        let mut standard = StandardPid::<FirstOrderLag>::from_params(&params)?;
        let mut independent = IndependentPid::<FirstOrderLag>::from_params(&params)?;
        let a = sim::simulate(&mut standard, &config)?;
        let b = sim::simulate(&mut independent, &config)?;
        println!("{:>8}  {:>16}  {:>16}", ti, a.steps(), b.steps());
        debug_assert_eq!(standard.setpoint(), independent.setpoint());
    }
    Ok(())
}

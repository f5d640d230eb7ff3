use pidsim::control::{Controller, IndependentPid};
use pidsim::io::{write_summary, write_trajectory_file, RunSummary};
use pidsim::plant::BallChannel;
use pidsim::sim::{self, SimConfig};
use pidsim::Params;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A slower actuator: tilt slews at most 0.5 rad/s
    let params = Params::from_json(
        r#"{
            "angle_deg": 60,
            "rate-limit": 0.5,
            "position": -0.15,
            "Kp": 3,
            "Kd": 2,
            "sp": 0,
            "direct": false
        }"#,
    )?;
    let config = SimConfig::default().divergence_limit(1.0);

    let mut pid = IndependentPid::<BallChannel>::from_params(&params)?;
    let run = sim::simulate(&mut pid, &config)?;

    let summary = RunSummary::from_run(pid.name(), config.timestep, &run);
    write_summary(&mut std::io::stdout(), &summary)?;

    let path = std::env::temp_dir().join("ball_channel.csv");
    write_trajectory_file(&path.to_string_lossy(), &run.samples)?;
    println!("Trajectory written to {}", path.display());
    Ok(())
}

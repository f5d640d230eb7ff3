use pidsim::control::Controller;
use pidsim::plant::{FirstOrderLag, Plant};
use pidsim::sim::{self, SimConfig};
use pidsim::Result;

/// A bang-bang controller: full drive toward the setpoint, no tuning.
struct BangBang {
    plant: FirstOrderLag,
    sp: f64,
    drive: f64,
    cv: f64,
}

impl Controller for BangBang {
    fn update(&mut self, ts: f64) -> Result<f64> {
        let error = self.plant.output() - self.sp;
        self.cv = if error < 0.0 { self.sp + self.drive } else { self.sp - self.drive };
        self.plant.update(self.cv, ts)?;
        Ok(error)
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

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() -> Result<()> {
    let mut controller = BangBang {
        plant: FirstOrderLag::with_tau(8.0)?,
        sp: 10.0,
        drive: 2.0,
        cv: 0.0,
    };

    // Bang-bang chatters around the setpoint, so it only ever hits the cap
    let config = SimConfig::default().timestep(1.0).tolerance(1e-3).max_steps(200);

    println!("Simulating with {} controller...", controller.name());
    let run = sim::simulate(&mut controller, &config)?;

    println!("Outcome: {:?}", run.outcome);
    println!("Peak |error|: {:.3}", run.max_abs_error());
    println!("Final output: {:.3} (setpoint {})", controller.output(), controller.setpoint());
    println!("Samples: {}", run.steps());
    Ok(())
}

use std::io::{self, Write};

use crate::sim::Sample;

/// Write a run's samples in CSV format.
///
/// Columns: step, time, error, control, output
pub fn write_trajectory<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(writer, "step,time,error,control,output")?;

    for s in samples {
        writeln!(
            writer,
            "{},{:.6},{:.9},{:.9},{:.9}",
            s.step, s.time, s.error, s.control, s.output,
        )?;
    }

    Ok(())
}

/// Write samples to a CSV file at the given path.
pub fn write_trajectory_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trajectory(&mut file, samples)
}

//! Sweep the arrival rate and print how the KS comparison responds.
//!
//! Every run owns its own simulation and in-memory logs, so runs never share state.

use mdsim::prelude::*;

fn main() -> Result<(), Error> {
    mdsim::core::init_simulation_logging_with_level("warn");

    println!("{:>6} {:>8} {:>10} {:>8} {:>10}", "m", "load", "max_len", "ks", "p_value");
    for arrival_rate in [5, 10, 15, 18, 20] {
        let params = SimulationConfig::new(0.3, arrival_rate, 50_000)
            .with_duration_secs(30)
            .validate()?;
        let (_, recorder) = run_simulation(&params, MemoryRecorder::new())?;
        let (all, tagged) = recorder.into_logs();
        let report = analyze_logs(&all, &tagged)?;

        println!(
            "{:>6} {:>8.2} {:>10} {:>8.4} {:>10.4}",
            arrival_rate,
            params.offered_load(),
            report.categories - 1,
            report.ks_statistic,
            report.p_value
        );
    }
    Ok(())
}

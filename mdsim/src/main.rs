//! `mdsim` command line driver.

use clap::Parser;
use mdsim::config::SimulationConfig;
use mdsim::experiment::{run_experiment, ExperimentOutcome};
use mdsim_core::init_simulation_logging_with_level;
use std::path::PathBuf;
use std::process::ExitCode;

/// Simulate a single-server FIFO queue and compare what tagged arrivals see.
#[derive(Parser)]
#[command(name = "mdsim", version)]
#[command(about = "Tagged-arrival M/D/1 queue simulator", long_about = None)]
struct Cli {
    /// Probability that an arrival is tagged, in [0, 1].
    #[arg(short = 'p', long = "tag-probability")]
    tag_probability: Option<f64>,

    /// Arrivals per simulated second.
    #[arg(short = 'm', long = "arrival-rate")]
    arrival_rate: Option<u64>,

    /// Service duration of every packet, in ticks.
    #[arg(short = 'd', long = "service-ticks")]
    service_ticks: Option<u64>,

    /// Simulated duration in seconds.
    #[arg(long)]
    duration: Option<u64>,

    /// Master seed for the random streams.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick resolution.
    #[arg(long)]
    ticks_per_second: Option<u64>,

    /// TOML file with defaults; command line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving logs, chart and report.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Result<SimulationConfig, mdsim::Error> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_toml_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(p) = self.tag_probability {
            config.tag_probability = Some(p);
        }
        if let Some(m) = self.arrival_rate {
            config.arrival_rate = Some(m);
        }
        if let Some(d) = self.service_ticks {
            config.service_ticks = Some(d);
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tps) = self.ticks_per_second {
            config.ticks_per_second = tps;
        }
        if let Some(dir) = self.output_dir {
            config.output.dir = dir;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_simulation_logging_with_level(&cli.log_level);

    match cli.into_config().and_then(|config| run_experiment(&config)) {
        Ok(outcome) => {
            print_summary(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(outcome: &ExperimentOutcome) {
    println!("Configuration:");
    for (name, value) in outcome.parameters.describe() {
        println!("  {name}: {value}");
    }
    println!("{} events scheduled", outcome.run.scheduled_arrivals);
    println!(
        "Arrivals: {} ({} tagged), departures: {}, left in system: {}",
        outcome.run.arrivals, outcome.run.tagged_arrivals, outcome.run.departures, outcome.run.in_system
    );
    println!("Event logs: {}, {}", outcome.files.all_log.display(), outcome.files.tagged_log.display());
    println!("Chart: {}", outcome.files.chart.display());
    println!("Report: {}", outcome.files.report.display());
    println!("KS statistic: {:.6}", outcome.report.ks_statistic);
    println!("p-value: {:.6}", outcome.report.p_value);
}

//! Driving a complete run: seed, simulate, persist, analyze, render.

use crate::config::{OutputConfig, RunParameters, SimulationConfig};
use crate::queue::MdQueue;
use crate::workload::seed_arrivals;
use crate::Error;
use mdsim_core::{simulation_span, Executor, RandomStreams, SimError, Simulation};
use mdsim_metrics::export::export_csv;
use mdsim_metrics::{DistributionReport, EventLog, FileRecorder, MetricsError, Recorder, StatsError};
use mdsim_viz::charts::pmf::{create_pmf_chart, pmf_series};
use mdsim_viz::report::generate_html_report;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Counters describing what the simulation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub scheduled_arrivals: u64,
    pub dispatched_events: u64,
    pub arrivals: u64,
    pub tagged_arrivals: u64,
    pub departures: u64,
    /// Packets waiting or in service when the horizon was reached
    pub in_system: usize,
    pub final_tick: u64,
}

/// A seeded simulation ready to execute.
pub fn build_simulation<R: Recorder>(
    params: &RunParameters,
    recorder: R,
) -> Result<(Simulation<MdQueue<R>>, u64), SimError> {
    let mut sim = Simulation::new(MdQueue::new(recorder));
    let scheduled = seed_arrivals(&mut sim, params, &RandomStreams::new(params.seed))?;
    Ok((sim, scheduled))
}

/// Run one simulation up to the horizon, returning its outcome and the recorder.
pub fn run_simulation<R: Recorder>(
    params: &RunParameters,
    recorder: R,
) -> Result<(RunOutcome, R), SimError> {
    let span = simulation_span("md_queue");
    let _guard = span.enter();

    let (mut sim, scheduled_arrivals) = build_simulation(params, recorder)?;
    info!(
        scheduled_arrivals,
        horizon_ticks = params.horizon_ticks,
        "{scheduled_arrivals} events scheduled"
    );
    sim.execute(Executor::timed(params.horizon_ticks))?;

    let dispatched_events = sim.scheduler().dispatched();
    let final_tick = sim.time().ticks();
    let queue = sim.into_component();
    let outcome = RunOutcome {
        scheduled_arrivals,
        dispatched_events,
        arrivals: queue.arrivals(),
        tagged_arrivals: queue.tagged_arrivals(),
        departures: queue.departures(),
        in_system: queue.state().len(),
        final_tick,
    };
    info!(?outcome, "Simulation finished");
    Ok((outcome, queue.into_recorder()))
}

/// Compare the queue lengths seen by tagged arrivals against all arrivals.
pub fn analyze_logs(all: &EventLog, tagged: &EventLog) -> Result<DistributionReport, StatsError> {
    let report = DistributionReport::compare(all, tagged)?;
    info!(
        categories = report.categories,
        ks = report.ks_statistic,
        p_value = report.p_value,
        "Distributions compared"
    );
    Ok(report)
}

/// Locations of everything a run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFiles {
    pub all_log: PathBuf,
    pub tagged_log: PathBuf,
    pub chart: PathBuf,
    pub report: PathBuf,
    pub summary: PathBuf,
    pub distribution: PathBuf,
}

impl From<&OutputConfig> for OutputFiles {
    fn from(output: &OutputConfig) -> Self {
        Self {
            all_log: output.all_log_path(),
            tagged_log: output.tagged_log_path(),
            chart: output.chart_path(),
            report: output.report_path(),
            summary: output.summary_path(),
            distribution: output.distribution_path(),
        }
    }
}

/// Everything a complete run produced; also what `summary.json` holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentOutcome {
    pub parameters: RunParameters,
    pub run: RunOutcome,
    pub report: DistributionReport,
    pub files: OutputFiles,
}

/// Validate `config`, simulate with file-backed logs, then build every artifact
/// from the logs as read back from disk.
pub fn run_experiment(config: &SimulationConfig) -> Result<ExperimentOutcome, Error> {
    let parameters = config.validate()?;
    let files = OutputFiles::from(&config.output);

    fs::create_dir_all(&config.output.dir).map_err(|source| Error::OutputDir {
        path: config.output.dir.display().to_string(),
        source,
    })?;

    let recorder = FileRecorder::create(&files.all_log, &files.tagged_log)?;
    let (run, recorder) = run_simulation(&parameters, recorder)?;
    let counts = recorder.finish()?;
    info!(all = counts.all, tagged = counts.tagged, "Event logs written");

    let all = EventLog::read_from_path(&files.all_log)?;
    let tagged = EventLog::read_from_path(&files.tagged_log)?;
    let report = analyze_logs(&all, &tagged)?;

    create_pmf_chart(&pmf_series(&report), &files.chart)?;
    generate_html_report(&report, &parameters.describe(), &files.report)?;
    export_csv(&report, &files.distribution)?;

    let outcome = ExperimentOutcome {
        parameters,
        run,
        report,
        files,
    };
    let summary = serde_json::to_string_pretty(&outcome).map_err(MetricsError::from)?;
    fs::write(&outcome.files.summary, summary).map_err(MetricsError::from)?;
    info!(path = %outcome.files.summary.display(), "Summary written");

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdsim_metrics::MemoryRecorder;

    #[test]
    fn outcome_accounts_for_every_arrival() {
        let params = SimulationConfig::new(0.5, 200, 20_000)
            .with_duration_secs(2)
            .validate()
            .unwrap();
        let (outcome, recorder) = run_simulation(&params, MemoryRecorder::new()).unwrap();

        assert_eq!(outcome.scheduled_arrivals, 400);
        assert_eq!(outcome.arrivals, 400);
        assert_eq!(recorder.all().len(), 400);
        assert_eq!(recorder.tagged().len() as u64, outcome.tagged_arrivals);
        assert_eq!(
            outcome.departures,
            outcome.arrivals - outcome.in_system as u64
        );
        assert_eq!(outcome.dispatched_events, outcome.arrivals + outcome.departures);
        assert!(outcome.final_tick <= params.horizon_ticks);
    }

    #[test]
    fn analyze_rejects_empty_tagged_log() {
        let params = SimulationConfig::new(0.0, 5, 10)
            .with_duration_secs(1)
            .validate()
            .unwrap();
        let (_, recorder) = run_simulation(&params, MemoryRecorder::new()).unwrap();
        let (all, tagged) = recorder.into_logs();
        assert!(matches!(
            analyze_logs(&all, &tagged),
            Err(StatsError::EmptyLog { .. })
        ));
    }
}

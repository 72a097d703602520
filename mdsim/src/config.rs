//! Run configuration.
//!
//! A [`SimulationConfig`] can be loaded from a TOML file, filled in from the
//! command line, or both; [`SimulationConfig::validate`] turns it into the
//! resolved [`RunParameters`] a simulation actually runs with.
//!
//! ```toml
//! tag_probability = 0.3
//! arrival_rate = 10
//! service_ticks = 50000
//! duration_secs = 60
//! seed = 42
//!
//! [output]
//! dir = "results"
//! ```

use mdsim_core::TickResolution;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DURATION_SECS: u64 = 60;
pub const DEFAULT_TICKS_PER_SECOND: u64 = 1_000_000;
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Errors raised before any simulation runs
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Where a run writes its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub all_log: String,
    pub tagged_log: String,
    pub chart: String,
    pub report: String,
    pub summary: String,
    pub distribution: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            all_log: "event_data.txt".to_string(),
            tagged_log: "event_data_tagged.txt".to_string(),
            chart: "bar.svg".to_string(),
            report: "report.html".to_string(),
            summary: "summary.json".to_string(),
            distribution: "distribution.csv".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn all_log_path(&self) -> PathBuf {
        self.dir.join(&self.all_log)
    }

    pub fn tagged_log_path(&self) -> PathBuf {
        self.dir.join(&self.tagged_log)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.join(&self.chart)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary)
    }

    pub fn distribution_path(&self) -> PathBuf {
        self.dir.join(&self.distribution)
    }
}

/// User-facing configuration; `p`, `m` and `d` have no defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Probability that an arrival is tagged (`p`)
    pub tag_probability: Option<f64>,
    /// Arrivals per simulated second (`m`)
    pub arrival_rate: Option<u64>,
    /// Service duration of every packet in ticks (`d`)
    pub service_ticks: Option<u64>,
    pub duration_secs: u64,
    pub ticks_per_second: u64,
    pub seed: u64,
    pub output: OutputConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tag_probability: None,
            arrival_rate: None,
            service_ticks: None,
            duration_secs: DEFAULT_DURATION_SECS,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            seed: DEFAULT_SEED,
            output: OutputConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Configuration with the three required parameters set and defaults elsewhere.
    pub fn new(tag_probability: f64, arrival_rate: u64, service_ticks: u64) -> Self {
        Self {
            tag_probability: Some(tag_probability),
            arrival_rate: Some(arrival_rate),
            service_ticks: Some(service_ticks),
            ..Default::default()
        }
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: origin.clone(),
            source,
        })?;
        Self::from_toml_str(&content, &origin)
    }

    pub fn with_duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn with_ticks_per_second(mut self, ticks_per_second: u64) -> Self {
        self.ticks_per_second = ticks_per_second;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output.dir = dir.into();
        self
    }

    /// Check every parameter and derive horizon and arrival count.
    pub fn validate(&self) -> Result<RunParameters, ConfigError> {
        let tag_probability = self
            .tag_probability
            .ok_or(ConfigError::Missing("tag probability (-p)"))?;
        let arrival_rate = self
            .arrival_rate
            .ok_or(ConfigError::Missing("arrival rate (-m)"))?;
        let service_ticks = self
            .service_ticks
            .ok_or(ConfigError::Missing("service duration (-d)"))?;

        if !tag_probability.is_finite() || !(0.0..=1.0).contains(&tag_probability) {
            return Err(ConfigError::Invalid {
                name: "tag_probability",
                reason: format!("{tag_probability} is not in [0, 1]"),
            });
        }
        if arrival_rate == 0 {
            return Err(invalid_zero("arrival_rate"));
        }
        if service_ticks == 0 {
            return Err(invalid_zero("service_ticks"));
        }
        if self.duration_secs == 0 {
            return Err(invalid_zero("duration_secs"));
        }
        let resolution =
            TickResolution::new(self.ticks_per_second).ok_or_else(|| invalid_zero("ticks_per_second"))?;

        if self.duration_secs.checked_mul(self.ticks_per_second).is_none() {
            return Err(ConfigError::Invalid {
                name: "duration_secs",
                reason: "horizon does not fit in 64-bit ticks".to_string(),
            });
        }
        let horizon_ticks = resolution.ticks_for_secs(self.duration_secs);
        let arrival_count = arrival_rate
            .checked_mul(self.duration_secs)
            .ok_or_else(|| ConfigError::Invalid {
                name: "arrival_rate",
                reason: "arrival count does not fit in 64 bits".to_string(),
            })?;

        Ok(RunParameters {
            tag_probability,
            arrival_rate,
            service_ticks,
            duration_secs: self.duration_secs,
            resolution,
            seed: self.seed,
            horizon_ticks,
            arrival_count,
        })
    }
}

fn invalid_zero(name: &'static str) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: "must be positive".to_string(),
    }
}

/// Fully resolved parameters of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunParameters {
    pub tag_probability: f64,
    pub arrival_rate: u64,
    pub service_ticks: u64,
    pub duration_secs: u64,
    pub resolution: TickResolution,
    pub seed: u64,
    /// Last tick at which events are still dispatched
    pub horizon_ticks: u64,
    /// Number of arrivals seeded before the run
    pub arrival_count: u64,
}

impl RunParameters {
    /// Offered load: busy seconds of work arriving per simulated second
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate as f64 * self.resolution.secs_for_ticks(self.service_ticks)
    }

    /// Labelled values for human-readable summaries
    pub fn describe(&self) -> Vec<(String, String)> {
        vec![
            ("Tag probability (p)".to_string(), self.tag_probability.to_string()),
            ("Arrival rate (m, per second)".to_string(), self.arrival_rate.to_string()),
            ("Service duration (d, ticks)".to_string(), self.service_ticks.to_string()),
            ("Duration (seconds)".to_string(), self.duration_secs.to_string()),
            (
                "Ticks per second".to_string(),
                self.resolution.ticks_per_second().to_string(),
            ),
            ("Horizon (ticks)".to_string(), self.horizon_ticks.to_string()),
            ("Arrivals".to_string(), self.arrival_count.to_string()),
            ("Offered load".to_string(), format!("{:.4}", self.offered_load())),
            ("Seed".to_string(), self.seed.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_derived_values() {
        let params = SimulationConfig::new(0.5, 10, 1000).validate().unwrap();
        assert_eq!(params.duration_secs, 60);
        assert_eq!(params.horizon_ticks, 60_000_000);
        assert_eq!(params.arrival_count, 600);
        assert_eq!(params.seed, DEFAULT_SEED);
        assert!((params.offered_load() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn missing_parameters_are_reported() {
        let mut config = SimulationConfig::new(0.5, 10, 1000);
        config.arrival_rate = None;
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));

        let config = SimulationConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for config in [
            SimulationConfig::new(1.5, 10, 1000),
            SimulationConfig::new(-0.1, 10, 1000),
            SimulationConfig::new(f64::NAN, 10, 1000),
            SimulationConfig::new(0.5, 0, 1000),
            SimulationConfig::new(0.5, 10, 0),
            SimulationConfig::new(0.5, 10, 1000).with_duration_secs(0),
            SimulationConfig::new(0.5, 10, 1000).with_ticks_per_second(0),
            SimulationConfig::new(0.5, 10, 1000).with_ticks_per_second(u64::MAX),
        ] {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn boundary_probabilities_are_valid() {
        assert!(SimulationConfig::new(0.0, 1, 1).validate().is_ok());
        assert!(SimulationConfig::new(1.0, 1, 1).validate().is_ok());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tag_probability = 0.25
            arrival_rate = 3
            service_ticks = 200
            duration_secs = 5
            seed = 7

            [output]
            dir = "out"
            chart = "pmf.png"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.tag_probability, Some(0.25));
        assert_eq!(config.ticks_per_second, DEFAULT_TICKS_PER_SECOND);
        assert_eq!(config.output.chart_path(), PathBuf::from("out").join("pmf.png"));
        assert_eq!(config.output.all_log, "event_data.txt");

        let params = config.validate().unwrap();
        assert_eq!(params.arrival_count, 15);
        assert_eq!(params.seed, 7);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = SimulationConfig::from_toml_str("arrival_rate = \"fast\"", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join(format!("mdsim_no_config_{}.toml", std::process::id()));
        assert!(matches!(
            SimulationConfig::from_toml_file(path),
            Err(ConfigError::Read { .. })
        ));
    }
}

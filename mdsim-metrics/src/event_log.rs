//! Append-only arrival event logs
//!
//! A log is a text file with one decimal non-negative integer per line: the
//! number of packets already in the system when an arrival happened. Logs are
//! written once during a run and read back in full for statistics.

use crate::error::LogError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Buffered, append-only writer for one event log file.
#[derive(Debug)]
pub struct EventLogWriter {
    path: PathBuf,
    out: BufWriter<File>,
    count: u64,
}

impl EventLogWriter {
    /// Create (or truncate) the log file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| LogError::Io {
            log: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Created event log");
        Ok(Self {
            path,
            out: BufWriter::new(file),
            count: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries appended so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn append(&mut self, value: usize) -> Result<(), LogError> {
        writeln!(self.out, "{value}").map_err(|source| self.io_error(source))?;
        self.count += 1;
        Ok(())
    }

    /// Flush buffered entries to disk and return how many were written.
    pub fn finish(mut self) -> Result<u64, LogError> {
        self.out.flush().map_err(|source| self.io_error(source))?;
        Ok(self.count)
    }

    fn io_error(&self, source: std::io::Error) -> LogError {
        LogError::Io {
            log: self.path.display().to_string(),
            source,
        }
    }
}

/// A fully loaded event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    name: String,
    values: Vec<usize>,
}

impl EventLog {
    pub fn from_values(name: impl Into<String>, values: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Read a log file written by [`EventLogWriter`].
    pub fn read_from_path(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| LogError::Io {
            log: name.clone(),
            source,
        })?;
        Self::parse(BufReader::new(file), name)
    }

    /// Parse log lines from any buffered reader.
    ///
    /// Every line must be a decimal non-negative integer; anything else is
    /// reported as [`LogError::Corrupt`] with its 1-based line number.
    pub fn parse<R: BufRead>(reader: R, name: impl Into<String>) -> Result<Self, LogError> {
        let name = name.into();
        let mut values = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| LogError::Io {
                log: name.clone(),
                source,
            })?;
            let value = line.parse::<usize>().map_err(|_| LogError::Corrupt {
                log: name.clone(),
                line: idx + 1,
                content: line.clone(),
            })?;
            values.push(value);
        }
        Ok(Self { name, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest recorded value, `None` for an empty log
    pub fn max(&self) -> Option<usize> {
        self.values.iter().copied().max()
    }
}

//! Arrival recorders.
//!
//! Every arrival appends the queue length it observed to the "all" log, and
//! tagged arrivals also append it to the "tagged" log. The two logs therefore
//! keep the same relative order, with "tagged" a subsequence of "all".

use crate::error::LogError;
use crate::event_log::{EventLog, EventLogWriter};
use std::path::Path;

/// Name of the log holding every arrival
pub const ALL_LOG: &str = "all";
/// Name of the log holding tagged arrivals only
pub const TAGGED_LOG: &str = "tagged";

/// Sink for per-arrival queue length observations.
pub trait Recorder {
    fn record_arrival(&mut self, queue_len: usize, tagged: bool) -> Result<(), LogError>;
}

impl<R: Recorder + ?Sized> Recorder for &mut R {
    fn record_arrival(&mut self, queue_len: usize, tagged: bool) -> Result<(), LogError> {
        (**self).record_arrival(queue_len, tagged)
    }
}

/// Entry counts of the two logs after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCounts {
    pub all: u64,
    pub tagged: u64,
}

/// Recorder persisting both logs as text files.
#[derive(Debug)]
pub struct FileRecorder {
    all: EventLogWriter,
    tagged: EventLogWriter,
}

impl FileRecorder {
    pub fn create(all_path: impl AsRef<Path>, tagged_path: impl AsRef<Path>) -> Result<Self, LogError> {
        Ok(Self {
            all: EventLogWriter::create(all_path)?,
            tagged: EventLogWriter::create(tagged_path)?,
        })
    }

    pub fn counts(&self) -> RecordedCounts {
        RecordedCounts {
            all: self.all.count(),
            tagged: self.tagged.count(),
        }
    }

    /// Flush both logs.
    pub fn finish(self) -> Result<RecordedCounts, LogError> {
        Ok(RecordedCounts {
            all: self.all.finish()?,
            tagged: self.tagged.finish()?,
        })
    }
}

impl Recorder for FileRecorder {
    fn record_arrival(&mut self, queue_len: usize, tagged: bool) -> Result<(), LogError> {
        self.all.append(queue_len)?;
        if tagged {
            self.tagged.append(queue_len)?;
        }
        Ok(())
    }
}

/// Recorder keeping both logs in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRecorder {
    all: Vec<usize>,
    tagged: Vec<usize>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[usize] {
        &self.all
    }

    pub fn tagged(&self) -> &[usize] {
        &self.tagged
    }

    pub fn counts(&self) -> RecordedCounts {
        RecordedCounts {
            all: self.all.len() as u64,
            tagged: self.tagged.len() as u64,
        }
    }

    /// The recorded ("all", "tagged") logs.
    pub fn into_logs(self) -> (EventLog, EventLog) {
        (
            EventLog::from_values(ALL_LOG, self.all),
            EventLog::from_values(TAGGED_LOG, self.tagged),
        )
    }
}

impl Recorder for MemoryRecorder {
    fn record_arrival(&mut self, queue_len: usize, tagged: bool) -> Result<(), LogError> {
        self.all.push(queue_len);
        if tagged {
            self.tagged.push(queue_len);
        }
        Ok(())
    }
}

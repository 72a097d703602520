//! Simulation time management
//!
//! Simulated time is discrete. A [`SimTime`] is a tick count plus a priority used
//! to order events that fall on the same tick; a [`TickResolution`] maps ticks to
//! simulated seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the simulated timeline.
///
/// Ordering is by tick count first and priority second, so among events due on
/// the same tick the one with the lower priority value is dispatched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTime {
    ticks: u64,
    priority: i32,
}

impl SimTime {
    /// Create a SimTime from a tick count and priority
    pub const fn new(ticks: u64, priority: i32) -> Self {
        SimTime { ticks, priority }
    }

    /// Create a SimTime at `ticks` with the default priority (0)
    pub const fn at(ticks: u64) -> Self {
        SimTime::new(ticks, 0)
    }

    /// The simulation start: tick zero, priority zero
    pub const fn zero() -> Self {
        SimTime::new(0, 0)
    }

    /// Get the raw tick count
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the tie-break priority
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// A point `delay` ticks after this one, carrying `priority`
    pub fn after(&self, delay: u64, priority: i32) -> Self {
        SimTime::new(self.ticks.saturating_add(delay), priority)
    }

    /// Number of ticks elapsed since `earlier` (zero if `earlier` is later)
    pub fn ticks_since(&self, earlier: SimTime) -> u64 {
        self.ticks.saturating_sub(earlier.ticks)
    }
}

impl Default for SimTime {
    fn default() -> Self {
        SimTime::zero()
    }
}

impl From<u64> for SimTime {
    fn from(ticks: u64) -> Self {
        SimTime::at(ticks)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.ticks, self.priority)
    }
}

/// How many ticks make up one simulated second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResolution {
    ticks_per_second: u64,
}

impl TickResolution {
    /// One million ticks per second: a tick is one simulated microsecond.
    pub const MICROS: TickResolution = TickResolution {
        ticks_per_second: 1_000_000,
    };

    /// Returns `None` for a zero resolution.
    pub const fn new(ticks_per_second: u64) -> Option<Self> {
        if ticks_per_second == 0 {
            None
        } else {
            Some(TickResolution { ticks_per_second })
        }
    }

    pub const fn ticks_per_second(&self) -> u64 {
        self.ticks_per_second
    }

    /// Length of one tick in simulated seconds
    pub fn seconds_per_tick(&self) -> f64 {
        1.0 / self.ticks_per_second as f64
    }

    /// Tick count covering `secs` whole seconds (saturating)
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs.saturating_mul(self.ticks_per_second)
    }

    /// Convert a tick count to simulated seconds
    pub fn secs_for_ticks(&self, ticks: u64) -> f64 {
        ticks as f64 / self.ticks_per_second as f64
    }
}

impl Default for TickResolution {
    fn default() -> Self {
        TickResolution::MICROS
    }
}

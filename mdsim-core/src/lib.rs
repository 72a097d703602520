//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks the queue simulator runs on:
//! tick-based time, a time-ordered event scheduler, component dispatch,
//! named random streams and logging setup.
//!
//! # Architecture Overview
//!
//! - [`Simulation`]: owns the [`Scheduler`] and one [`Component`]. Nothing is
//!   global, so independent simulations can run side by side (parameter sweeps,
//!   tests) without sharing state.
//!
//! - [`Scheduler`]: the event queue plus the clock. Handlers receive it mutably so
//!   they can schedule follow-up events.
//!
//! # Basic Usage
//!
//! ```rust
//! use mdsim_core::{Component, Executor, Scheduler, SimError, SimTime, Simulation};
//!
//! #[derive(Debug)]
//! struct Tick;
//!
//! struct Counter(u32);
//!
//! impl Component for Counter {
//!     type Event = Tick;
//!
//!     fn process_event(&mut self, _event: Tick, scheduler: &mut Scheduler<Tick>) -> Result<(), SimError> {
//!         self.0 += 1;
//!         scheduler.schedule_in(10, 0, Tick)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut simulation = Simulation::new(Counter(0));
//! simulation.schedule(SimTime::zero(), Tick).unwrap();
//! simulation.execute(Executor::timed(95)).unwrap();
//! assert_eq!(simulation.component().0, 10);
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], a tick count with a same-tick priority. Ticks are
//! converted to simulated seconds through a [`TickResolution`].

pub mod error;
pub mod execute;
pub mod logging;
pub mod randomness;
pub mod scheduler;
pub mod time;
pub mod types;

use std::fmt;
use tracing::{error, info, instrument, trace};

pub use error::{EventError, SimError};
pub use execute::{Execute, Executor, ExecutorWithSideEffect};
pub use logging::{event_span, init_simulation_logging, init_simulation_logging_with_level, simulation_span};
pub use randomness::{RandomSource, RandomStream, RandomStreams};
pub use scheduler::{EventEntry, Scheduler};
pub use time::{SimTime, TickResolution};
pub use types::EventId;

/// A simulation participant that reacts to events.
///
/// Handlers run to completion and return nothing but success or failure; any
/// follow-up work is expressed by scheduling further events.
pub trait Component {
    type Event: fmt::Debug;

    fn process_event(
        &mut self,
        event: Self::Event,
        scheduler: &mut Scheduler<Self::Event>,
    ) -> Result<(), SimError>;
}

/// Simulation struct that puts the scheduler and the simulated model together.
///
/// See the [crate-level documentation](index.html) for more information.
pub struct Simulation<C: Component> {
    scheduler: Scheduler<C::Event>,
    component: C,
}

impl<C: Component> Simulation<C> {
    pub fn new(component: C) -> Self {
        Self {
            scheduler: Scheduler::default(),
            component,
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Schedules a new event at the absolute time `time`.
    pub fn schedule(&mut self, time: SimTime, event: C::Event) -> Result<EventId, EventError> {
        self.scheduler.schedule(time, event)
    }

    /// Performs one step of the simulation. Returns `true` if there was in fact an event
    /// available to process, and `false` otherwise, which signifies that the simulation
    /// ended.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(entry) = self.scheduler.pop()? else {
            return Ok(false);
        };

        let span = event_span(entry.id(), entry.time());
        let _guard = span.enter();
        trace!(event = ?entry.event(), "Processing simulation step");

        self.component
            .process_event(entry.into_event(), &mut self.scheduler)?;
        Ok(true)
    }

    /// Runs the simulation.
    ///
    /// The stopping condition depends on the executor used. See [`Execute`] and
    /// [`Executor`] for more details. The first error raised by the scheduler or a
    /// handler stops the run and is returned.
    #[instrument(skip(self, executor), fields(initial_time = %self.time()))]
    pub fn execute<X: Execute<C>>(&mut self, executor: X) -> Result<(), SimError> {
        info!(pending = self.scheduler.len(), "Starting simulation execution");
        if let Err(e) = executor.execute(self) {
            error!(time = %self.time(), error = %e, "Simulation aborted");
            return Err(e);
        }
        info!(
            final_time = %self.time(),
            dispatched = self.scheduler.dispatched(),
            pending = self.scheduler.len(),
            "Simulation execution completed"
        );
        Ok(())
    }

    /// Returns the time of the next scheduled event, or None if no events are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek_time()
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn scheduler(&self) -> &Scheduler<C::Event> {
        &self.scheduler
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    /// Tear the simulation down, usually at the end of a run to inspect the model.
    pub fn into_component(self) -> C {
        self.component
    }
}

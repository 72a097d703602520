//! Single-server FIFO queue with deterministic service.
//!
//! Arrivals observe how many packets are already in the system (waiting or in
//! service), report it to a [`Recorder`], and join the back of the line. The
//! packet at the head of the line is the one in service; exactly one departure
//! event is outstanding whenever the server is busy.

use mdsim_core::{Component, Scheduler, SimError};
use mdsim_metrics::Recorder;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Same-tick priority of departure events
pub const DEPARTURE_PRIORITY: i32 = 0;

/// Events driving the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEvent {
    Arrival { service_ticks: u64, tagged: bool },
    Departure,
}

/// A packet waiting for or receiving service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceRecord {
    pub service_ticks: u64,
    pub tagged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Idle,
    Busy,
}

/// The FIFO line plus the bookkeeping of its single outstanding departure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueState {
    line: VecDeque<ServiceRecord>,
    outstanding_departures: usize,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packets in the system, including the one in service
    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn server_state(&self) -> ServerState {
        if self.line.is_empty() {
            ServerState::Idle
        } else {
            ServerState::Busy
        }
    }

    /// Departure events scheduled but not yet dispatched (0 or 1)
    pub fn outstanding_departures(&self) -> usize {
        self.outstanding_departures
    }

    /// The packet in service, if any
    pub fn head(&self) -> Option<&ServiceRecord> {
        self.line.front()
    }
}

/// Queue component recording what every arrival sees.
#[derive(Debug)]
pub struct MdQueue<R> {
    state: QueueState,
    recorder: R,
    arrivals: u64,
    tagged_arrivals: u64,
    departures: u64,
}

impl<R: Recorder> MdQueue<R> {
    pub fn new(recorder: R) -> Self {
        Self {
            state: QueueState::new(),
            recorder,
            arrivals: 0,
            tagged_arrivals: 0,
            departures: 0,
        }
    }

    pub fn state(&self) -> &QueueState {
        &self.state
    }

    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    pub fn into_recorder(self) -> R {
        self.recorder
    }

    pub fn arrivals(&self) -> u64 {
        self.arrivals
    }

    pub fn tagged_arrivals(&self) -> u64 {
        self.tagged_arrivals
    }

    pub fn departures(&self) -> u64 {
        self.departures
    }

    fn on_arrival(
        &mut self,
        packet: ServiceRecord,
        scheduler: &mut Scheduler<QueueEvent>,
    ) -> Result<(), SimError> {
        let seen = self.state.len();
        self.recorder
            .record_arrival(seen, packet.tagged)
            .map_err(|e| SimError::Handler {
                time: scheduler.time(),
                message: e.to_string(),
            })?;

        self.arrivals += 1;
        if packet.tagged {
            self.tagged_arrivals += 1;
        }

        let was_idle = self.state.server_state() == ServerState::Idle;
        self.state.line.push_back(packet);
        trace!(seen, tagged = packet.tagged, "Arrival");

        if was_idle {
            debug!(time = %scheduler.time(), "Server Idle -> Busy");
            self.start_service(packet.service_ticks, scheduler)?;
        }
        Ok(())
    }

    fn on_departure(&mut self, scheduler: &mut Scheduler<QueueEvent>) -> Result<(), SimError> {
        if self.state.outstanding_departures == 0 {
            return Err(SimError::Consistency {
                time: scheduler.time(),
                message: "departure dispatched while none was outstanding".to_string(),
            });
        }
        let Some(done) = self.state.line.pop_front() else {
            return Err(SimError::Consistency {
                time: scheduler.time(),
                message: "departure from an empty queue".to_string(),
            });
        };
        self.state.outstanding_departures -= 1;
        self.departures += 1;
        trace!(tagged = done.tagged, remaining = self.state.len(), "Departure");

        match self.state.head().copied() {
            Some(next) => self.start_service(next.service_ticks, scheduler),
            None => {
                debug!(time = %scheduler.time(), "Server Busy -> Idle");
                Ok(())
            }
        }
    }

    fn start_service(
        &mut self,
        service_ticks: u64,
        scheduler: &mut Scheduler<QueueEvent>,
    ) -> Result<(), SimError> {
        if self.state.outstanding_departures != 0 {
            return Err(SimError::Consistency {
                time: scheduler.time(),
                message: format!(
                    "{} departures already outstanding",
                    self.state.outstanding_departures
                ),
            });
        }
        scheduler.schedule_in(service_ticks, DEPARTURE_PRIORITY, QueueEvent::Departure)?;
        self.state.outstanding_departures += 1;
        Ok(())
    }
}

impl<R: Recorder> Component for MdQueue<R> {
    type Event = QueueEvent;

    fn process_event(
        &mut self,
        event: QueueEvent,
        scheduler: &mut Scheduler<QueueEvent>,
    ) -> Result<(), SimError> {
        match event {
            QueueEvent::Arrival {
                service_ticks,
                tagged,
            } => self.on_arrival(
                ServiceRecord {
                    service_ticks,
                    tagged,
                },
                scheduler,
            ),
            QueueEvent::Departure => self.on_departure(scheduler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdsim_core::{Executor, SimTime, Simulation};
    use mdsim_metrics::{LogError, MemoryRecorder};

    fn arrival(service_ticks: u64, tagged: bool) -> QueueEvent {
        QueueEvent::Arrival {
            service_ticks,
            tagged,
        }
    }

    fn queue_with(arrivals: &[(u64, bool)], service_ticks: u64) -> Simulation<MdQueue<MemoryRecorder>> {
        let mut sim = Simulation::new(MdQueue::new(MemoryRecorder::new()));
        for &(tick, tagged) in arrivals {
            sim.schedule(SimTime::at(tick), arrival(service_ticks, tagged))
                .unwrap();
        }
        sim
    }

    #[test]
    fn spaced_arrivals_see_empty_system() {
        let mut sim = queue_with(&[(0, true), (100, false), (200, true)], 10);
        sim.execute(Executor::unbound()).unwrap();

        let queue = sim.component();
        assert_eq!(queue.recorder().all(), &[0, 0, 0]);
        assert_eq!(queue.recorder().tagged(), &[0, 0]);
        assert_eq!(queue.departures(), 3);
        assert_eq!(queue.state().server_state(), ServerState::Idle);
        assert_eq!(queue.state().outstanding_departures(), 0);
    }

    #[test]
    fn burst_builds_a_line() {
        // four arrivals at once, service 10: they see 0, 1, 2, 3
        let mut sim = queue_with(&[(5, false), (5, true), (5, false), (5, true)], 10);
        sim.execute(Executor::unbound()).unwrap();

        let queue = sim.component();
        assert_eq!(queue.recorder().all(), &[0, 1, 2, 3]);
        assert_eq!(queue.recorder().tagged(), &[1, 3]);
        assert_eq!(sim.time().ticks(), 45);
        assert_eq!(queue.departures(), 4);
    }

    #[test]
    fn arrival_at_departure_tick_runs_in_insertion_order() {
        // departure of the first packet is scheduled after the second arrival,
        // so at tick 10 the arrival is dispatched first and still sees it
        let mut sim = queue_with(&[(0, false), (10, false)], 10);
        sim.execute(Executor::unbound()).unwrap();
        assert_eq!(sim.component().recorder().all(), &[0, 1]);
    }

    #[test]
    fn one_departure_outstanding_while_busy() {
        let mut sim = queue_with(&[(0, false), (1, false), (2, false), (30, false)], 7);
        let mut violations = 0;
        sim.execute(Executor::unbound().side_effect(|sim: &Simulation<MdQueue<MemoryRecorder>>| {
            let state = sim.component().state();
            let expected = usize::from(state.server_state() == ServerState::Busy);
            if state.outstanding_departures() != expected {
                violations += 1;
            }
        }))
        .unwrap();
        assert_eq!(violations, 0);
    }

    #[test]
    fn horizon_leaves_work_in_system() {
        let mut sim = queue_with(&[(0, false), (0, false), (0, false)], 100);
        sim.execute(Executor::timed(150)).unwrap();

        let queue = sim.component();
        assert_eq!(queue.arrivals(), 3);
        assert_eq!(queue.departures(), 1);
        assert_eq!(queue.state().len(), 2);
        assert_eq!(
            queue.departures(),
            queue.arrivals() - queue.state().len() as u64
        );
    }

    #[test]
    fn stray_departure_is_a_consistency_error() {
        let mut sim = Simulation::new(MdQueue::new(MemoryRecorder::new()));
        sim.schedule(SimTime::at(3), QueueEvent::Departure).unwrap();
        let err = sim.execute(Executor::unbound()).unwrap_err();
        assert!(matches!(err, SimError::Consistency { .. }), "{err}");
    }

    struct FailingRecorder;

    impl Recorder for FailingRecorder {
        fn record_arrival(&mut self, _queue_len: usize, _tagged: bool) -> Result<(), LogError> {
            Err(LogError::Io {
                log: "all".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        }
    }

    #[test]
    fn recorder_failure_aborts_the_run() {
        let mut sim = Simulation::new(MdQueue::new(FailingRecorder));
        sim.schedule(SimTime::zero(), arrival(1, false)).unwrap();
        sim.schedule(SimTime::at(5), arrival(1, false)).unwrap();

        let err = sim.execute(Executor::unbound()).unwrap_err();
        assert!(matches!(err, SimError::Handler { .. }));
        assert_eq!(sim.component().arrivals(), 0);
        assert!(sim.has_pending_events());
    }
}

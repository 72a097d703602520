use crate::{Component, SimError, Simulation};

/// Simulation execution trait.
pub trait Execute<C: Component> {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    fn execute(self, sim: &mut Simulation<C>) -> Result<(), SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Horizon(u64),
    NoEvents,
    Steps(usize),
}

/// Executor is used for simple execution of an entire simulation.
///
/// See the crate level documentation for examples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Simulation will end only once there is no available events in the queue.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Dispatch every event whose tick count is at most `horizon`.
    /// It may terminate early if no events are available; events beyond the
    /// horizon stay in the queue.
    #[must_use]
    pub fn timed(horizon: u64) -> Self {
        Self {
            end_condition: EndCondition::Horizon(horizon),
        }
    }

    /// Simulation will execute exactly this many steps, unless we run out of events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }

    /// Registers a side effect that is called _after_ each simulation step.
    #[must_use]
    pub fn side_effect<F>(self, func: F) -> ExecutorWithSideEffect<F> {
        ExecutorWithSideEffect {
            end_condition: self.end_condition,
            side_effect: func,
        }
    }
}

impl<C: Component> Execute<C> for Executor {
    fn execute(self, sim: &mut Simulation<C>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, |_| {})
    }
}

pub struct ExecutorWithSideEffect<F> {
    end_condition: EndCondition,
    side_effect: F,
}

impl<C, F> Execute<C> for ExecutorWithSideEffect<F>
where
    C: Component,
    F: FnMut(&Simulation<C>),
{
    fn execute(self, sim: &mut Simulation<C>) -> Result<(), SimError> {
        run_with(sim, self.end_condition, self.side_effect)
    }
}

fn run_with<C, F>(sim: &mut Simulation<C>, end_condition: EndCondition, mut side_effect: F) -> Result<(), SimError>
where
    C: Component,
    F: FnMut(&Simulation<C>),
{
    let mut step = |sim: &mut Simulation<C>| -> Result<bool, SimError> {
        let stepped = sim.step()?;
        if stepped {
            side_effect(sim);
        }
        Ok(stepped)
    };
    match end_condition {
        EndCondition::Horizon(horizon) => {
            while sim.peek_next_event_time().is_some_and(|t| t.ticks() <= horizon) {
                step(sim)?;
            }
        }
        EndCondition::NoEvents => while step(sim)? {},
        EndCondition::Steps(steps) => {
            for _ in 0..steps {
                if !step(sim)? {
                    break;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Scheduler, SimTime};

    struct TestComponent {
        counter: usize,
    }

    #[derive(Debug)]
    struct TestEvent;

    impl Component for TestComponent {
        type Event = TestEvent;

        fn process_event(
            &mut self,
            _event: Self::Event,
            scheduler: &mut Scheduler<Self::Event>,
        ) -> Result<(), SimError> {
            self.counter += 1;
            if self.counter < 10 {
                scheduler.schedule_in(2, 0, TestEvent)?;
            }
            Ok(())
        }
    }

    struct FailingComponent;

    impl Component for FailingComponent {
        type Event = TestEvent;

        fn process_event(
            &mut self,
            _event: Self::Event,
            scheduler: &mut Scheduler<Self::Event>,
        ) -> Result<(), SimError> {
            Err(SimError::Consistency {
                time: scheduler.time(),
                message: "boom".to_string(),
            })
        }
    }

    fn counting_sim() -> Simulation<TestComponent> {
        let mut sim = Simulation::new(TestComponent { counter: 0 });
        sim.schedule(SimTime::zero(), TestEvent).unwrap();
        sim
    }

    #[test]
    fn test_create_executor() {
        assert_eq!(
            Executor::unbound(),
            Executor {
                end_condition: EndCondition::NoEvents
            }
        );
        assert_eq!(
            Executor::timed(60),
            Executor {
                end_condition: EndCondition::Horizon(60)
            }
        );
        assert_eq!(
            Executor::steps(7),
            Executor {
                end_condition: EndCondition::Steps(7)
            }
        );
    }

    #[test]
    fn test_steps() {
        let mut sim = counting_sim();
        Executor::steps(10).execute(&mut sim).unwrap();
        assert_eq!(sim.into_component().counter, 10);
    }

    #[test]
    fn test_steps_stops_before() {
        let mut sim = counting_sim();
        // After 10 steps there are no events, so it will not execute all 100
        Executor::steps(100).execute(&mut sim).unwrap();
        assert_eq!(sim.into_component().counter, 10);
    }

    #[test]
    fn test_unbound() {
        let mut sim = counting_sim();
        sim.execute(Executor::unbound()).unwrap();
        assert_eq!(sim.component().counter, 10);
        assert_eq!(sim.time(), SimTime::at(18));
        assert!(!sim.has_pending_events());
    }

    #[test]
    fn test_timed_includes_horizon_tick() {
        let mut sim = counting_sim();
        Executor::timed(6).execute(&mut sim).unwrap();
        // Events at 0, 2, 4, 6.
        assert_eq!(sim.component().counter, 4);
        assert_eq!(sim.time(), SimTime::at(6));
        assert_eq!(sim.peek_next_event_time(), Some(SimTime::at(8)));
    }

    #[test]
    fn test_timed_clock_stops_early() {
        let mut sim = counting_sim();
        Executor::timed(5).execute(&mut sim).unwrap();
        assert_eq!(sim.component().counter, 3);
        assert_eq!(sim.time(), SimTime::at(4));
    }

    #[test]
    fn test_side_effect_runs_after_each_step() {
        let mut sim = counting_sim();
        let mut seen = Vec::new();
        Executor::unbound()
            .side_effect(|sim: &Simulation<TestComponent>| seen.push(sim.component().counter))
            .execute(&mut sim)
            .unwrap();
        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_handler_error_aborts_run() {
        let mut sim = Simulation::new(FailingComponent);
        sim.schedule(SimTime::at(3), TestEvent).unwrap();
        sim.schedule(SimTime::at(4), TestEvent).unwrap();

        let err = sim.execute(Executor::unbound()).unwrap_err();
        assert!(matches!(err, SimError::Consistency { time, .. } if time == SimTime::at(3)));
        // The second event was never dispatched.
        assert_eq!(sim.scheduler().dispatched(), 1);
        assert!(sim.has_pending_events());
    }
}

//! Demonstration of logging in mdsim-core
//!
//! Run with `RUST_LOG=mdsim_core=trace` to see every scheduled and dispatched
//! event, or with the default level to see only run start and end.

use mdsim_core::{
    init_simulation_logging, simulation_span, Component, Executor, Scheduler, SimError, SimTime,
    Simulation,
};
use tracing::{debug, info};

#[derive(Debug)]
enum ServerEvent {
    Request { id: u32 },
    Completed { id: u32 },
}

struct Server {
    service_ticks: u64,
    completed: u32,
}

impl Component for Server {
    type Event = ServerEvent;

    fn process_event(
        &mut self,
        event: ServerEvent,
        scheduler: &mut Scheduler<ServerEvent>,
    ) -> Result<(), SimError> {
        match event {
            ServerEvent::Request { id } => {
                debug!(id, now = %scheduler.time(), "Starting request");
                scheduler.schedule_in(self.service_ticks, 0, ServerEvent::Completed { id })?;
            }
            ServerEvent::Completed { id } => {
                self.completed += 1;
                info!(id, now = %scheduler.time(), "Request completed");
            }
        }
        Ok(())
    }
}

fn main() -> Result<(), SimError> {
    init_simulation_logging();

    let span = simulation_span("logging_demo");
    let _guard = span.enter();

    let mut sim = Simulation::new(Server {
        service_ticks: 50,
        completed: 0,
    });
    for id in 0..5 {
        sim.schedule(SimTime::at(u64::from(id) * 100), ServerEvent::Request { id })?;
    }

    sim.execute(Executor::unbound())?;
    info!(completed = sim.component().completed, "Demo finished");
    Ok(())
}

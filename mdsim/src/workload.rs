//! Arrival workload generation.

use crate::config::RunParameters;
use crate::queue::QueueEvent;
use mdsim_core::{Component, EventError, RandomSource, RandomStreams, SimTime, Simulation};
use tracing::debug;

/// Stream placing arrivals on the timeline
pub const ARRIVAL_STREAM: &str = "arrivals";
/// Stream deciding which arrivals are tagged
pub const TAGGING_STREAM: &str = "tagging";

/// Seed every arrival of a run from the named streams of `streams`.
///
/// Returns the number of arrival events scheduled.
pub fn seed_arrivals<C>(
    sim: &mut Simulation<C>,
    params: &RunParameters,
    streams: &RandomStreams,
) -> Result<u64, EventError>
where
    C: Component<Event = QueueEvent>,
{
    let mut placement = streams.stream(ARRIVAL_STREAM);
    let mut tagging = streams.stream(TAGGING_STREAM);
    schedule_arrivals(sim, params, &mut placement, &mut tagging)
}

/// Schedule `params.arrival_count` arrivals at uniform ticks in `[0, horizon)`,
/// each tagged with probability `params.tag_probability`.
pub fn schedule_arrivals<C, P, T>(
    sim: &mut Simulation<C>,
    params: &RunParameters,
    placement: &mut P,
    tagging: &mut T,
) -> Result<u64, EventError>
where
    C: Component<Event = QueueEvent>,
    P: RandomSource + ?Sized,
    T: RandomSource + ?Sized,
{
    let mut tagged_count = 0u64;
    for _ in 0..params.arrival_count {
        let tick = placement.uniform_int(0, params.horizon_ticks);
        let tagged = tagging.uniform_real01() < params.tag_probability;
        tagged_count += u64::from(tagged);
        sim.schedule(
            SimTime::at(tick),
            QueueEvent::Arrival {
                service_ticks: params.service_ticks,
                tagged,
            },
        )?;
    }
    debug!(
        arrivals = params.arrival_count,
        tagged = tagged_count,
        "Seeded arrivals"
    );
    Ok(params.arrival_count)
}

//! Dispatch system: matches this tick's waiting requests to idle vehicles.
//!
//! Candidates are the queued requests whose activation tick equals the current
//! tick, processed in arrival order. Each goes to the vehicle chosen by the
//! [`DispatchAlgorithmResource`] among vehicles that are idle at that moment,
//! so one request per vehicle per round. Requests that find no vehicle are
//! pushed back for the next tick, subject to the [`RetryPolicy`].
//!
//! [`RetryPolicy`]: crate::scenario::RetryPolicy

use bevy_ecs::prelude::{Mut, Query, Res, ResMut};
use tracing::warn;

use crate::clock::SimulationClock;
use crate::ecs::{RideRequest, Vehicle, WaitingQueue};
use crate::graph::RoadGraph;
use crate::matching::{DispatchAlgorithmResource, IdleVehicle};
use crate::scenario::SimConfig;
use crate::telemetry::{EventKind, SimEventLog, SimTelemetry};

#[allow(clippy::too_many_arguments)]
pub fn dispatch_system(
    clock: Res<SimulationClock>,
    config: Res<SimConfig>,
    graph: Res<RoadGraph>,
    algorithm: Res<DispatchAlgorithmResource>,
    mut queue: ResMut<WaitingQueue>,
    mut log: ResMut<SimEventLog>,
    mut telemetry: ResMut<SimTelemetry>,
    mut vehicles: Query<&mut Vehicle>,
) {
    let tick = clock.now();
    let candidates = queue.take_active(tick);
    if candidates.is_empty() {
        return;
    }

    let mut fleet: Vec<Mut<Vehicle>> = vehicles.iter_mut().collect();
    fleet.sort_by(|a, b| a.id.cmp(&b.id));

    for request in candidates {
        log.record(
            tick,
            EventKind::RequestEntered {
                request: request.id.clone(),
            },
        );

        let chosen = {
            let idle: Vec<IdleVehicle<'_>> = fleet
                .iter()
                .enumerate()
                .filter(|(_, vehicle)| vehicle.is_idle())
                .map(|(slot, vehicle)| IdleVehicle {
                    slot,
                    id: vehicle.id.as_str(),
                    position: vehicle.position,
                })
                .collect();
            algorithm.select_vehicle(&graph, request.pickup, &idle)
        };

        let unmatched = match chosen {
            Some(slot) => {
                let vehicle = &mut fleet[slot];
                let request_id = request.id.clone();
                match vehicle.try_assign(request, tick) {
                    Ok(()) => {
                        log.record(
                            tick,
                            EventKind::Assigned {
                                request: request_id,
                                vehicle: vehicle.id.clone(),
                            },
                        );
                        None
                    }
                    Err(request) => Some(request),
                }
            }
            None => Some(request),
        };

        if let Some(request) = unmatched {
            requeue_or_abandon(request, &config, &mut queue, &mut log, &mut telemetry, tick);
        }
    }
}

fn requeue_or_abandon(
    mut request: RideRequest,
    config: &SimConfig,
    queue: &mut WaitingQueue,
    log: &mut SimEventLog,
    telemetry: &mut SimTelemetry,
    tick: u64,
) {
    request.failed_attempts += 1;

    if config.retry_policy.allows_retry(request.failed_attempts) {
        request.active_at += 1;
        log.record(
            tick,
            EventKind::NoVehicleAvailable {
                request: request.id.clone(),
                retry_at: Some(request.active_at),
            },
        );
        queue.push_back(request);
        return;
    }

    warn!(
        request = %request.id,
        attempts = request.failed_attempts,
        "request abandoned after repeated dispatch failures"
    );
    log.record(
        tick,
        EventKind::NoVehicleAvailable {
            request: request.id.clone(),
            retry_at: None,
        },
    );
    log.record(
        tick,
        EventKind::RequestAbandoned {
            request: request.id.clone(),
            attempts: request.failed_attempts,
        },
    );
    telemetry.abandoned_requests.push(request.id);
}

//! Movement system: advances every busy vehicle by at most one hop per tick.
//!
//! Each tick the vehicle's target is the pickup of its first assigned request
//! (or the drop-off once the passenger is aboard). A fresh A* search from the
//! current position yields the next hop; only that hop is taken, regardless
//! of the edge's weight. Arrival is checked after the move, so a vehicle can
//! reach its pickup on the same tick it was assigned.

use bevy_ecs::prelude::{Mut, Query, Res, ResMut};
use tracing::warn;

use crate::clock::SimulationClock;
use crate::ecs::{RequestState, Vehicle};
use crate::graph::RoadGraph;
use crate::routing::PathFinder;
use crate::telemetry::{CompletedTripRecord, EventKind, Leg, SimEventLog, SimTelemetry};

pub fn movement_system(
    clock: Res<SimulationClock>,
    graph: Res<RoadGraph>,
    path_finder: Res<PathFinder>,
    mut log: ResMut<SimEventLog>,
    mut telemetry: ResMut<SimTelemetry>,
    mut vehicles: Query<&mut Vehicle>,
) {
    let tick = clock.now();
    let mut fleet: Vec<Mut<Vehicle>> = vehicles
        .iter_mut()
        .filter(|vehicle| !vehicle.is_idle())
        .collect();
    fleet.sort_by(|a, b| a.id.cmp(&b.id));

    for mut vehicle in fleet {
        step_vehicle(
            tick,
            &graph,
            &path_finder,
            &mut vehicle,
            &mut log,
            &mut telemetry,
        );
    }
}

/// One tick of the vehicle state machine. Idle vehicles are left untouched.
pub fn step_vehicle(
    tick: u64,
    graph: &RoadGraph,
    path_finder: &PathFinder,
    vehicle: &mut Vehicle,
    log: &mut SimEventLog,
    telemetry: &mut SimTelemetry,
) {
    let Some(active) = vehicle.active_request() else {
        return;
    };
    let (destination, leg) = if vehicle.has_passenger {
        (active.dropoff, Leg::Dropoff)
    } else {
        (active.pickup, Leg::Pickup)
    };
    let request_id = active.id.clone();

    vehicle.active_ticks += 1;
    if vehicle.has_passenger {
        vehicle.occupied_ticks += 1;
    }

    log.record(
        tick,
        EventKind::Heading {
            vehicle: vehicle.id.clone(),
            target: graph.label(destination).to_string(),
            leg,
        },
    );

    if vehicle.position != destination {
        match path_finder.next_hop(graph, vehicle.position, destination) {
            Some(next) => {
                log.record(
                    tick,
                    EventKind::VehicleMoved {
                        vehicle: vehicle.id.clone(),
                        from: graph.label(vehicle.position).to_string(),
                        to: graph.label(next).to_string(),
                    },
                );
                vehicle.position = next;
            }
            None => {
                warn!(
                    vehicle = %vehicle.id,
                    at = graph.label(vehicle.position),
                    target = graph.label(destination),
                    "no path to target, holding position"
                );
                log.record(
                    tick,
                    EventKind::VehicleStalled {
                        vehicle: vehicle.id.clone(),
                        at: graph.label(vehicle.position).to_string(),
                        target: graph.label(destination).to_string(),
                    },
                );
            }
        }
    }

    if vehicle.position != destination {
        return;
    }

    let at = graph.label(destination).to_string();
    if !vehicle.has_passenger {
        vehicle.has_passenger = true;
        if let Some(active) = vehicle.assigned.first_mut() {
            active.mark_picked_up(tick);
        }
        log.record(
            tick,
            EventKind::PickedUp {
                vehicle: vehicle.id.clone(),
                request: request_id,
                at,
            },
        );
    } else {
        vehicle.has_passenger = false;
        let mut completed = vehicle.assigned.remove(0);
        completed.state = RequestState::Completed;
        telemetry
            .completed_trips
            .push(CompletedTripRecord::new(&vehicle.id, &completed, tick));
        log.record(
            tick,
            EventKind::DroppedOff {
                vehicle: vehicle.id.clone(),
                request: request_id,
                at,
            },
        );
    }
}

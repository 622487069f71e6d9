#![allow(dead_code)]

use fleet_core::telemetry::{Event, EventKind};

/// Events recorded at `tick`, in order.
pub fn kinds_at(events: &[Event], tick: u64) -> Vec<EventKind> {
    events
        .iter()
        .filter(|event| event.tick == tick)
        .map(|event| event.kind.clone())
        .collect()
}

/// Tick at which `request` was assigned, and to which vehicle.
pub fn assignment(events: &[Event], request: &str) -> Option<(u64, String)> {
    events.iter().find_map(|event| match &event.kind {
        EventKind::Assigned {
            request: r,
            vehicle,
        } if r == request => Some((event.tick, vehicle.clone())),
        _ => None,
    })
}

/// Tick at which `request` was dropped off.
pub fn dropoff_tick(events: &[Event], request: &str) -> Option<u64> {
    events.iter().find_map(|event| match &event.kind {
        EventKind::DroppedOff { request: r, .. } if r == request => Some(event.tick),
        _ => None,
    })
}

/// Nodes a vehicle visited through `VehicleMoved` events, starting after its
/// initial position.
pub fn moves_of(events: &[Event], vehicle: &str) -> Vec<(u64, String)> {
    events
        .iter()
        .filter_map(|event| match &event.kind {
            EventKind::VehicleMoved { vehicle: v, to, .. } if v == vehicle => {
                Some((event.tick, to.clone()))
            }
            _ => None,
        })
        .collect()
}

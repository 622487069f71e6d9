//! Telemetry: the structured event stream plus KPI records for completed trips.
//!
//! The core never formats text. Every state change is pushed to
//! [`SimEventLog`] as an [`Event`]; renderers (the CLI, tests) read it back.

use bevy_ecs::prelude::Resource;
use serde::Serialize;
use tracing::debug;

use crate::ecs::{RideRequest, VehicleState};

/// Which leg of a trip a vehicle is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// A request became a dispatch candidate this tick (first time or retry).
    RequestEntered { request: String },
    Assigned { request: String, vehicle: String },
    /// No idle vehicle; `retry_at` is the next activation tick, or `None`
    /// when the retry policy gave up on the request.
    NoVehicleAvailable {
        request: String,
        retry_at: Option<u64>,
    },
    RequestAbandoned { request: String, attempts: u32 },
    Heading {
        vehicle: String,
        target: String,
        leg: Leg,
    },
    VehicleMoved {
        vehicle: String,
        from: String,
        to: String,
    },
    /// No path to the target; the vehicle holds position this tick.
    VehicleStalled {
        vehicle: String,
        at: String,
        target: String,
    },
    PickedUp {
        vehicle: String,
        request: String,
        at: String,
    },
    DroppedOff {
        vehicle: String,
        request: String,
        at: String,
    },
    /// Queue empty and fleet idle before the horizon.
    TerminatedEarly,
    HorizonReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub tick: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Ordered collector of simulation events.
#[derive(Debug, Default, Resource)]
pub struct SimEventLog {
    events: Vec<Event>,
}

impl SimEventLog {
    pub fn record(&mut self, tick: u64, kind: EventKind) {
        debug!(tick, event = ?kind, "sim event");
        self.events.push(Event { tick, kind });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn at_tick(&self, tick: u64) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |event| event.tick == tick)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// One completed trip, recorded at drop-off. All timestamps are ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedTripRecord {
    pub request: String,
    pub vehicle: String,
    pub requested_at: u64,
    pub assigned_at: u64,
    pub picked_up_at: u64,
    pub completed_at: u64,
    pub failed_attempts: u32,
}

impl CompletedTripRecord {
    pub fn new(vehicle: &str, request: &RideRequest, completed_at: u64) -> Self {
        Self {
            request: request.id.clone(),
            vehicle: vehicle.to_string(),
            requested_at: request.requested_at,
            assigned_at: request.assigned_at.unwrap_or(completed_at),
            picked_up_at: request.picked_up_at.unwrap_or(completed_at),
            completed_at,
            failed_attempts: request.failed_attempts,
        }
    }

    /// Ticks from first activation to assignment.
    pub fn time_to_match(&self) -> u64 {
        self.assigned_at.saturating_sub(self.requested_at)
    }

    /// Ticks from assignment to pickup.
    pub fn time_to_pickup(&self) -> u64 {
        self.picked_up_at.saturating_sub(self.assigned_at)
    }

    /// Ticks from pickup to drop-off.
    pub fn trip_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.picked_up_at)
    }
}

#[derive(Debug, Default, Resource)]
pub struct SimTelemetry {
    pub completed_trips: Vec<CompletedTripRecord>,
    pub abandoned_requests: Vec<String>,
}

impl SimTelemetry {
    pub fn mean_time_to_match(&self) -> Option<f64> {
        mean(self.completed_trips.iter().map(CompletedTripRecord::time_to_match))
    }

    pub fn mean_trip_duration(&self) -> Option<f64> {
        mean(self.completed_trips.iter().map(CompletedTripRecord::trip_duration))
    }
}

fn mean(values: impl Iterator<Item = u64>) -> Option<f64> {
    let (sum, count) = values.fold((0u64, 0u64), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Aggregated counts at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FleetCounts {
    pub vehicles_idle: usize,
    pub vehicles_to_pickup: usize,
    pub vehicles_to_dropoff: usize,
    pub requests_waiting: usize,
    pub trips_completed: usize,
    pub requests_abandoned: usize,
}

impl FleetCounts {
    pub fn add_vehicle(&mut self, state: VehicleState) {
        match state {
            VehicleState::Idle => self.vehicles_idle += 1,
            VehicleState::ToPickup => self.vehicles_to_pickup += 1,
            VehicleState::ToDropoff => self.vehicles_to_dropoff += 1,
        }
    }
}

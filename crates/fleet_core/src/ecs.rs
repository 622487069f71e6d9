use std::collections::VecDeque;

use bevy_ecs::prelude::{Component, Resource};

use crate::graph::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Waiting,
    Assigned,
    PickedUp,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RideRequest {
    pub id: String,
    pub pickup: NodeId,
    pub dropoff: NodeId,
    /// Tick at which the request is a dispatch candidate. Bumped by one on
    /// every failed match.
    pub active_at: u64,
    /// Activation tick as first submitted.
    pub requested_at: u64,
    pub picked_up: bool,
    pub state: RequestState,
    /// Number of dispatch rounds that found no idle vehicle.
    pub failed_attempts: u32,
    pub assigned_at: Option<u64>,
    pub picked_up_at: Option<u64>,
}

impl RideRequest {
    pub fn new(id: impl Into<String>, pickup: NodeId, dropoff: NodeId, active_at: u64) -> Self {
        Self {
            id: id.into(),
            pickup,
            dropoff,
            active_at,
            requested_at: active_at,
            picked_up: false,
            state: RequestState::Waiting,
            failed_attempts: 0,
            assigned_at: None,
            picked_up_at: None,
        }
    }

    pub fn mark_picked_up(&mut self, tick: u64) {
        self.picked_up = true;
        self.picked_up_at = Some(tick);
        self.state = RequestState::PickedUp;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    Idle,
    ToPickup,
    ToDropoff,
}

/// A vehicle in the fleet.
///
/// Only the first entry of `assigned` drives movement. `picked_up` takes part
/// in the capacity check but movement never fills it: pooled rides are not
/// modelled, so at most one request is served at a time.
#[derive(Debug, Clone, PartialEq, Component)]
pub struct Vehicle {
    pub id: String,
    pub position: NodeId,
    pub capacity: usize,
    pub assigned: Vec<RideRequest>,
    pub picked_up: Vec<RideRequest>,
    pub has_passenger: bool,
    /// Ticks spent serving a request.
    pub active_ticks: u64,
    /// Ticks that started with a passenger on board.
    pub occupied_ticks: u64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, position: NodeId, capacity: usize) -> Self {
        Self {
            id: id.into(),
            position,
            capacity,
            assigned: Vec::new(),
            picked_up: Vec::new(),
            has_passenger: false,
            active_ticks: 0,
            occupied_ticks: 0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.assigned.is_empty() && self.picked_up.is_empty()
    }

    pub fn state(&self) -> VehicleState {
        if self.is_idle() {
            VehicleState::Idle
        } else if self.has_passenger {
            VehicleState::ToDropoff
        } else {
            VehicleState::ToPickup
        }
    }

    pub fn load(&self) -> usize {
        self.assigned.len() + self.picked_up.len()
    }

    pub fn has_free_seat(&self) -> bool {
        self.load() < self.capacity
    }

    /// Appends `request` to the assigned list, or hands it back when every
    /// seat is already committed.
    pub fn try_assign(&mut self, mut request: RideRequest, tick: u64) -> Result<(), RideRequest> {
        if !self.has_free_seat() {
            return Err(request);
        }
        request.state = RequestState::Assigned;
        request.assigned_at = Some(tick);
        self.assigned.push(request);
        Ok(())
    }

    /// The request movement is currently serving.
    pub fn active_request(&self) -> Option<&RideRequest> {
        self.assigned.first()
    }

    /// Passengers on board right now.
    pub fn current_occupancy(&self) -> usize {
        self.assigned.iter().filter(|r| r.picked_up).count() + self.picked_up.len()
    }
}

/// Requests not yet matched, in arrival order.
#[derive(Debug, Clone, Default, Resource)]
pub struct WaitingQueue(pub VecDeque<RideRequest>);

impl WaitingQueue {
    pub fn new(requests: impl IntoIterator<Item = RideRequest>) -> Self {
        Self(requests.into_iter().collect())
    }

    /// Removes and returns every request active at `tick`, preserving order.
    /// The rest stay queued in their existing order.
    pub fn take_active(&mut self, tick: u64) -> Vec<RideRequest> {
        let (active, rest): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut self.0)
            .into_iter()
            .partition(|request| request.active_at == tick);
        self.0 = rest;
        Vec::from(active)
    }

    pub fn push_back(&mut self, request: RideRequest) {
        self.0.push_back(request);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RideRequest> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RoadGraph;

    fn two_nodes() -> (NodeId, NodeId) {
        let mut graph = RoadGraph::new();
        let a = graph.add_node("A", 0.0, 0.0).unwrap();
        let b = graph.add_node("B", 0.0, 1.0).unwrap();
        (a, b)
    }

    #[test]
    fn assign_fails_once_capacity_is_reached() {
        let (a, b) = two_nodes();
        let mut vehicle = Vehicle::new("V1", a, 2);
        assert!(vehicle.try_assign(RideRequest::new("R1", a, b, 1), 1).is_ok());
        assert!(vehicle.try_assign(RideRequest::new("R2", b, a, 1), 1).is_ok());

        let rejected = vehicle
            .try_assign(RideRequest::new("R3", a, b, 1), 1)
            .unwrap_err();
        assert_eq!(rejected.id, "R3");
        assert_eq!(rejected.state, RequestState::Waiting);
        assert_eq!(vehicle.load(), 2);
    }

    #[test]
    fn picked_up_requests_count_against_capacity() {
        let (a, b) = two_nodes();
        let mut vehicle = Vehicle::new("V1", a, 1);
        vehicle.picked_up.push(RideRequest::new("R0", a, b, 1));
        assert!(!vehicle.is_idle());
        assert!(vehicle
            .try_assign(RideRequest::new("R1", a, b, 1), 1)
            .is_err());
    }

    #[test]
    fn idle_vehicle_always_accepts() {
        let (a, b) = two_nodes();
        let mut vehicle = Vehicle::new("V1", a, 1);
        assert!(vehicle.is_idle());
        vehicle.try_assign(RideRequest::new("R1", a, b, 3), 3).unwrap();
        let active = vehicle.active_request().unwrap();
        assert_eq!(active.state, RequestState::Assigned);
        assert_eq!(active.assigned_at, Some(3));
        assert_eq!(vehicle.state(), VehicleState::ToPickup);
    }

    #[test]
    fn state_follows_passenger_flag() {
        let (a, b) = two_nodes();
        let mut vehicle = Vehicle::new("V1", a, 1);
        assert_eq!(vehicle.state(), VehicleState::Idle);
        vehicle.try_assign(RideRequest::new("R1", a, b, 1), 1).unwrap();
        vehicle.has_passenger = true;
        vehicle.assigned[0].mark_picked_up(1);
        assert_eq!(vehicle.state(), VehicleState::ToDropoff);
        assert_eq!(vehicle.current_occupancy(), 1);
    }

    #[test]
    fn take_active_keeps_fifo_order_and_leaves_the_rest() {
        let (a, b) = two_nodes();
        let mut queue = WaitingQueue::new([
            RideRequest::new("R1", a, b, 1),
            RideRequest::new("R2", a, b, 2),
            RideRequest::new("R3", a, b, 1),
        ]);
        let active: Vec<String> = queue.take_active(1).into_iter().map(|r| r.id).collect();
        assert_eq!(active, vec!["R1", "R3"]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|r| r.id.as_str()), Some("R2"));
    }
}

#![allow(dead_code)]

use bevy_ecs::prelude::World;
use fleet_core::clock::SimulationClock;
use fleet_core::ecs::{RideRequest, Vehicle, WaitingQueue};
use fleet_core::graph::RoadGraph;
use fleet_core::matching::DispatchAlgorithmResource;
use fleet_core::routing::{HeuristicKind, PathFinder};
use fleet_core::scenario::{RetryPolicy, SimConfig};
use fleet_core::telemetry::{SimEventLog, SimTelemetry};

/// Helper that populates a raw ECS world for system-level tests, skipping
/// the validation `Simulation` performs.
#[derive(Debug, Default)]
pub struct TestWorldBuilder {
    graph: RoadGraph,
    vehicles: Vec<Vehicle>,
    requests: Vec<RideRequest>,
    config: SimConfig,
}

impl TestWorldBuilder {
    pub fn new(graph: RoadGraph) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.vehicles.push(vehicle);
        self
    }

    pub fn with_request(mut self, request: RideRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.config = self.config.with_horizon(horizon);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config = self.config.with_retry_policy(policy);
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.config = self.config.with_heuristic(heuristic);
        self
    }

    /// Build the ECS world with the configured resources.
    pub fn build(self) -> World {
        let mut world = World::new();
        world.insert_resource(SimulationClock::new(self.config.horizon));
        world.insert_resource(PathFinder::new(self.config.heuristic));
        world.insert_resource(DispatchAlgorithmResource::default());
        world.insert_resource(WaitingQueue::new(self.requests));
        world.insert_resource(SimEventLog::default());
        world.insert_resource(SimTelemetry::default());
        world.insert_resource(self.graph);
        world.insert_resource(self.config);
        for vehicle in self.vehicles {
            world.spawn(vehicle);
        }
        world
    }
}

/// Fleet sorted by id.
pub fn vehicles(world: &mut World) -> Vec<Vehicle> {
    let mut fleet: Vec<Vehicle> = world.query::<&Vehicle>().iter(world).cloned().collect();
    fleet.sort_by(|a, b| a.id.cmp(&b.id));
    fleet
}

pub fn vehicle(world: &mut World, id: &str) -> Vehicle {
    vehicles(world)
        .into_iter()
        .find(|vehicle| vehicle.id == id)
        .expect("vehicle exists")
}

//! Simulation runner: advances the clock and runs the per-tick schedule.
//!
//! Each tick runs dispatch then movement, chained on a single-threaded
//! executor, followed by the termination check. Nothing is retried or rolled
//! back; a request assigned during dispatch may start moving in the same tick.

use std::collections::HashSet;

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use tracing::info;

use crate::clock::SimulationClock;
use crate::ecs::{RideRequest, Vehicle, WaitingQueue};
use crate::error::ConfigError;
use crate::graph::{NodeId, RoadGraph};
use crate::matching::DispatchAlgorithmResource;
use crate::routing::PathFinder;
use crate::scenario::SimConfig;
use crate::systems::{dispatch::dispatch_system, movement::movement_system};
use crate::telemetry::{Event, EventKind, FleetCounts, SimEventLog, SimTelemetry};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Queue empty and every vehicle idle.
    AllServed,
    HorizonReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub last_tick: u64,
    pub stop_reason: StopReason,
}

/// Builds the per-tick schedule: dispatch, then movement.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((dispatch_system, movement_system).chain());
    schedule
}

/// True when no request is waiting and every vehicle is idle.
pub fn fleet_is_settled(world: &mut World) -> bool {
    if !world.resource::<WaitingQueue>().is_empty() {
        return false;
    }
    world
        .query::<&Vehicle>()
        .iter(world)
        .all(Vehicle::is_idle)
}

/// Advances the clock by one tick and runs the schedule.
/// Returns `false` without doing anything once the horizon is spent.
pub fn run_next_tick(world: &mut World, schedule: &mut Schedule) -> bool {
    if world.resource_mut::<SimulationClock>().advance().is_none() {
        return false;
    }
    schedule.run(world);
    true
}

/// Runs ticks until the fleet settles or the horizon is reached.
pub fn run_until_settled(world: &mut World, schedule: &mut Schedule) -> RunSummary {
    while run_next_tick(world, schedule) {
        if fleet_is_settled(world) {
            let clock = *world.resource::<SimulationClock>();
            if clock.now() < clock.horizon() {
                world
                    .resource_mut::<SimEventLog>()
                    .record(clock.now(), EventKind::TerminatedEarly);
            }
            return RunSummary {
                last_tick: clock.now(),
                stop_reason: StopReason::AllServed,
            };
        }
    }

    let last_tick = world.resource::<SimulationClock>().now();
    world
        .resource_mut::<SimEventLog>()
        .record(last_tick, EventKind::HorizonReached);
    RunSummary {
        last_tick,
        stop_reason: StopReason::HorizonReached,
    }
}

/// A configured simulation: world, schedule and the result of the last run.
pub struct Simulation {
    world: World,
    schedule: Schedule,
    summary: Option<RunSummary>,
}

impl Simulation {
    /// Simulation with default settings and the given tick horizon.
    pub fn new(
        graph: RoadGraph,
        vehicles: Vec<Vehicle>,
        requests: Vec<RideRequest>,
        horizon: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_config(
            graph,
            vehicles,
            requests,
            SimConfig::default().with_horizon(horizon),
        )
    }

    /// Validates the inputs and builds the world. Requests keep their order.
    pub fn with_config(
        graph: RoadGraph,
        vehicles: Vec<Vehicle>,
        requests: Vec<RideRequest>,
        config: SimConfig,
    ) -> Result<Self, ConfigError> {
        validate(&graph, &vehicles, &requests, &config)?;

        let mut world = World::new();
        world.insert_resource(SimulationClock::new(config.horizon));
        world.insert_resource(PathFinder::new(config.heuristic));
        world.insert_resource(DispatchAlgorithmResource::default());
        world.insert_resource(WaitingQueue::new(requests));
        world.insert_resource(SimEventLog::default());
        world.insert_resource(SimTelemetry::default());
        world.insert_resource(graph);
        world.insert_resource(config);
        for vehicle in vehicles {
            world.spawn(vehicle);
        }

        Ok(Self {
            world,
            schedule: simulation_schedule(),
            summary: None,
        })
    }

    /// Runs ticks from the current one until the fleet settles or the
    /// horizon is reached. Outcome is available through [`Simulation::summary`]
    /// and [`Simulation::events`].
    pub fn run(&mut self) {
        let horizon = self.world.resource::<SimulationClock>().horizon();
        let vehicles = self.vehicles().len();
        let waiting = self.waiting().len();
        info!(horizon, vehicles, waiting, "simulation started");
        let summary = run_until_settled(&mut self.world, &mut self.schedule);
        info!(
            last_tick = summary.last_tick,
            stop_reason = ?summary.stop_reason,
            completed = self.telemetry().completed_trips.len(),
            "simulation finished"
        );
        self.summary = Some(summary);
    }

    /// Runs a single tick. Returns `false` once the horizon is spent.
    pub fn step(&mut self) -> bool {
        run_next_tick(&mut self.world, &mut self.schedule)
    }

    pub fn summary(&self) -> Option<RunSummary> {
        self.summary
    }

    pub fn now(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn events(&self) -> &[Event] {
        self.world.resource::<SimEventLog>().events()
    }

    pub fn telemetry(&self) -> &SimTelemetry {
        self.world.resource::<SimTelemetry>()
    }

    pub fn graph(&self) -> &RoadGraph {
        self.world.resource::<RoadGraph>()
    }

    pub fn waiting(&self) -> &WaitingQueue {
        self.world.resource::<WaitingQueue>()
    }

    /// Fleet sorted by vehicle id.
    pub fn vehicles(&mut self) -> Vec<&Vehicle> {
        let mut query = self.world.query::<&Vehicle>();
        let mut vehicles: Vec<&Vehicle> = query.iter(&self.world).collect();
        vehicles.sort_by(|a, b| a.id.cmp(&b.id));
        vehicles
    }

    pub fn vehicle(&mut self, id: &str) -> Option<&Vehicle> {
        self.vehicles().into_iter().find(|vehicle| vehicle.id == id)
    }

    pub fn counts(&mut self) -> FleetCounts {
        let mut counts = FleetCounts::default();
        for vehicle in self.vehicles() {
            counts.add_vehicle(vehicle.state());
        }
        counts.requests_waiting = self.waiting().len();
        let telemetry = self.telemetry();
        counts.trips_completed = telemetry.completed_trips.len();
        counts.requests_abandoned = telemetry.abandoned_requests.len();
        counts
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

fn validate(
    graph: &RoadGraph,
    vehicles: &[Vehicle],
    requests: &[RideRequest],
    config: &SimConfig,
) -> Result<(), ConfigError> {
    let known = |node: NodeId| -> Result<(), ConfigError> {
        graph
            .get(node)
            .map(|_| ())
            .ok_or_else(|| ConfigError::UnknownNode {
                id: format!("#{}", node.index()),
            })
    };

    let mut vehicle_ids = HashSet::new();
    for vehicle in vehicles {
        if !vehicle_ids.insert(vehicle.id.as_str()) {
            return Err(ConfigError::DuplicateVehicle {
                id: vehicle.id.clone(),
            });
        }
        if vehicle.capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                vehicle: vehicle.id.clone(),
            });
        }
        known(vehicle.position)?;
    }

    let mut request_ids = HashSet::new();
    for request in requests {
        if !request_ids.insert(request.id.as_str()) {
            return Err(ConfigError::DuplicateRequest {
                id: request.id.clone(),
            });
        }
        if request.active_at < 1 {
            return Err(ConfigError::RequestBeforeFirstTick {
                request: request.id.clone(),
                tick: request.active_at,
            });
        }
        known(request.pickup)?;
        known(request.dropoff)?;
    }

    if config.require_connected {
        if let Some((from, to)) = graph.first_unreachable() {
            return Err(ConfigError::Disconnected {
                from: graph.label(from).to_string(),
                to: graph.label(to).to_string(),
            });
        }
    }

    Ok(())
}

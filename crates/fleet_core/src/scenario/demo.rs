//! Built-in Cape Town demo network.

use crate::ecs::{RideRequest, Vehicle};
use crate::error::ConfigError;
use crate::graph::RoadGraph;
use crate::scenario::build::Scenario;
use crate::scenario::params::SimConfig;

const NODES: [(&str, f64, f64); 10] = [
    ("Node1", -33.9249, 18.4241),
    ("Node2", -33.9180, 18.4233),
    ("Node3", -33.9300, 18.4232),
    ("Node4", -33.9106, 18.3945),
    ("Node5", -33.9398, 18.4662),
    ("Node6", -33.9590, 18.4705),
    ("Node7", -33.9165, 18.4160),
    ("Node8", -33.8675, 18.5061),
    ("Node9", -34.0409, 18.6197),
    ("Node10", -33.9849, 18.4695),
];

const EDGES: [(&str, &str, f64); 24] = [
    ("Node1", "Node2", 10.0),
    ("Node2", "Node3", 15.0),
    ("Node3", "Node4", 20.0),
    ("Node4", "Node5", 25.0),
    ("Node5", "Node6", 30.0),
    ("Node6", "Node7", 35.0),
    ("Node7", "Node8", 40.0),
    ("Node8", "Node9", 45.0),
    ("Node9", "Node10", 50.0),
    ("Node1", "Node3", 12.0),
    ("Node2", "Node4", 18.0),
    ("Node3", "Node5", 22.0),
    ("Node4", "Node6", 28.0),
    ("Node5", "Node7", 32.0),
    ("Node6", "Node8", 38.0),
    ("Node7", "Node9", 42.0),
    ("Node8", "Node10", 48.0),
    ("Node1", "Node4", 25.0),
    ("Node2", "Node5", 30.0),
    ("Node3", "Node6", 35.0),
    ("Node4", "Node7", 40.0),
    ("Node5", "Node8", 45.0),
    ("Node6", "Node9", 50.0),
    ("Node7", "Node10", 55.0),
];

const VEHICLES: [(&str, &str, usize); 3] = [
    ("Vehicle1", "Node1", 3),
    ("Vehicle2", "Node4", 4),
    ("Vehicle3", "Node6", 6),
];

/// Queue order, which is not activation order.
const REQUESTS: [(&str, &str, &str, u64); 6] = [
    ("RideRequest1", "Node2", "Node5", 1),
    ("RideRequest4", "Node5", "Node4", 4),
    ("RideRequest5", "Node3", "Node7", 6),
    ("RideRequest6", "Node3", "Node10", 6),
    ("RideRequest2", "Node3", "Node10", 1),
    ("RideRequest3", "Node7", "Node1", 1),
];

const DEMO_HORIZON: u64 = 20;

/// Ten-node Cape Town network with three vehicles and six requests.
pub fn cape_town_demo() -> Result<Scenario, ConfigError> {
    let mut graph = RoadGraph::new();
    for (id, lat, lon) in NODES {
        graph.add_node(id, lat, lon)?;
    }
    for (from, to, weight) in EDGES {
        graph.connect(from, to, weight)?;
    }

    let mut scenario = Scenario::new(graph, SimConfig::default().with_horizon(DEMO_HORIZON));
    for (id, start, capacity) in VEHICLES {
        let start = scenario.graph.resolve(start)?;
        scenario.vehicles.push(Vehicle::new(id, start, capacity));
    }
    for (id, pickup, dropoff, tick) in REQUESTS {
        let pickup = scenario.graph.resolve(pickup)?;
        let dropoff = scenario.graph.resolve(dropoff)?;
        scenario
            .requests
            .push(RideRequest::new(id, pickup, dropoff, tick));
    }
    Ok(scenario)
}

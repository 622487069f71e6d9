//! Test helpers for common test setup and utilities.
//!
//! Shared fixtures for unit tests, integration tests and benches.

use crate::ecs::{RideRequest, Vehicle};
use crate::graph::{NodeId, RoadGraph};
use crate::scenario::{Scenario, SimConfig};

/// Spacing between grid nodes, in degrees.
pub const GRID_STEP_DEG: f64 = 0.01;

/// Two nodes `A` (0,0) and `B` (0,1) joined by an edge of weight 1.
pub fn two_node_graph() -> (RoadGraph, NodeId, NodeId) {
    let mut graph = RoadGraph::new();
    let a = graph
        .add_node("A", 0.0, 0.0)
        .expect("A has valid coordinates");
    let b = graph
        .add_node("B", 0.0, 1.0)
        .expect("B has valid coordinates");
    graph.add_edge(a, b, 1.0).expect("weight is valid");
    (graph, a, b)
}

/// Vehicle `V` at `A` with one seat and request `R` from `B` to `A` at tick 1.
pub fn two_node_scenario(horizon: u64) -> Scenario {
    let (graph, a, b) = two_node_graph();
    Scenario::new(graph, SimConfig::default().with_horizon(horizon))
        .with_vehicle(Vehicle::new("V", a, 1))
        .with_request(RideRequest::new("R", b, a, 1))
}

/// `rows` x `cols` grid named `r{row}c{col}`, 4-connected.
///
/// Edge weights are the haversine distance times `weight_factor`; a factor of
/// at least 1 keeps the haversine heuristic admissible.
pub fn grid_graph(rows: usize, cols: usize, weight_factor: f64) -> RoadGraph {
    let mut graph = RoadGraph::new();
    let mut ids = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let id = graph
                .add_node(
                    format!("r{row}c{col}"),
                    row as f64 * GRID_STEP_DEG,
                    col as f64 * GRID_STEP_DEG,
                )
                .expect("grid coordinates are valid");
            ids.push(id);
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let here = ids[row * cols + col];
            let mut link = |there: NodeId| {
                let km = crate::spatial::distance_km_between_nodes(
                    graph.node(here),
                    graph.node(there),
                );
                graph
                    .add_edge(here, there, km * weight_factor)
                    .expect("weight is valid");
            };
            if col + 1 < cols {
                link(ids[row * cols + col + 1]);
            }
            if row + 1 < rows {
                link(ids[(row + 1) * cols + col]);
            }
        }
    }
    graph
}

/// Grid node handle by coordinates.
pub fn grid_node(graph: &RoadGraph, row: usize, col: usize) -> NodeId {
    graph
        .node_id(&format!("r{row}c{col}"))
        .expect("grid node exists")
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ecs::{RideRequest, Vehicle};
use crate::error::ConfigError;
use crate::graph::{NodeId, RoadGraph};
use crate::runner::Simulation;
use crate::scenario::params::{ScenarioParams, SimConfig};

/// Everything needed to start a simulation, before validation.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub graph: RoadGraph,
    pub vehicles: Vec<Vehicle>,
    /// In queue order.
    pub requests: Vec<RideRequest>,
    pub config: SimConfig,
}

impl Scenario {
    pub fn new(graph: RoadGraph, config: SimConfig) -> Self {
        Self {
            graph,
            vehicles: Vec::new(),
            requests: Vec::new(),
            config,
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

    /// Validates and hands the scenario to a [`Simulation`].
    pub fn into_simulation(self) -> Result<Simulation, ConfigError> {
        Simulation::with_config(self.graph, self.vehicles, self.requests, self.config)
    }
}

/// Tops `scenario` up with `params.num_requests` random requests appended
/// after the existing ones. Same seed, same requests.
pub fn build_scenario(mut scenario: Scenario, params: &ScenarioParams) -> Scenario {
    let mut rng = StdRng::seed_from_u64(params.seed.unwrap_or(0));
    let nodes: Vec<NodeId> = scenario.graph.node_ids().collect();
    if nodes.len() < 2 {
        return scenario;
    }

    let window = params.request_window.max(1);
    let first = scenario.requests.len() + 1;
    for n in first..first + params.num_requests {
        let pickup = nodes[rng.gen_range(0..nodes.len())];
        let dropoff = random_destination(&mut rng, &nodes, pickup);
        let tick = rng.gen_range(1..=window);
        scenario
            .requests
            .push(RideRequest::new(format!("Generated{n}"), pickup, dropoff, tick));
    }
    scenario
}

/// Uniform node other than `pickup`. `nodes` must hold at least two entries.
pub fn random_destination<R: Rng>(rng: &mut R, nodes: &[NodeId], pickup: NodeId) -> NodeId {
    let others: Vec<NodeId> = nodes.iter().copied().filter(|&n| n != pickup).collect();
    if others.is_empty() {
        return pickup;
    }
    others[rng.gen_range(0..others.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Scenario {
        let mut graph = RoadGraph::new();
        graph.add_node("A", 0.0, 0.0).unwrap();
        graph.add_node("B", 0.0, 0.1).unwrap();
        graph.add_node("C", 0.1, 0.0).unwrap();
        graph.connect("A", "B", 1.0).unwrap();
        graph.connect("B", "C", 1.0).unwrap();
        graph.connect("C", "A", 1.0).unwrap();
        Scenario::new(graph, SimConfig::default())
    }

    #[test]
    fn generated_requests_are_reproducible() {
        let params = ScenarioParams::default().with_seed(7).with_requests(20);
        let first = build_scenario(triangle(), &params);
        let second = build_scenario(triangle(), &params);
        assert_eq!(first.requests, second.requests);
        assert_eq!(first.requests.len(), 20);
    }

    #[test]
    fn generated_requests_stay_in_window_and_never_loop() {
        let params = ScenarioParams::default()
            .with_seed(3)
            .with_requests(50)
            .with_request_window(4);
        let scenario = build_scenario(triangle(), &params);
        for request in &scenario.requests {
            assert!((1..=4).contains(&request.active_at));
            assert_ne!(request.pickup, request.dropoff);
        }
    }

    #[test]
    fn generated_ids_continue_after_existing_requests() {
        let base = triangle();
        let a = base.graph.node_id("A").unwrap();
        let b = base.graph.node_id("B").unwrap();
        let base = base.with_request(RideRequest::new("Manual", a, b, 1));
        let scenario = build_scenario(base, &ScenarioParams::default().with_requests(2));
        let ids: Vec<&str> = scenario.requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Manual", "Generated2", "Generated3"]);
    }

    #[test]
    fn single_node_graph_gets_no_requests() {
        let mut graph = RoadGraph::new();
        graph.add_node("A", 0.0, 0.0).unwrap();
        let scenario = build_scenario(
            Scenario::new(graph, SimConfig::default()),
            &ScenarioParams::default().with_requests(5),
        );
        assert!(scenario.requests.is_empty());
    }
}

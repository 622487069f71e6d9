use ordered_float::OrderedFloat;
use pathfinding::prelude::dijkstra;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fleet_core::graph::{NodeId, RoadGraph};
use fleet_core::routing::{HeuristicKind, PathFinder};
use fleet_core::scenario::cape_town_demo;
use fleet_core::spatial::haversine_km;
use fleet_core::test_helpers::{grid_graph, grid_node};

fn oracle_cost(graph: &RoadGraph, from: NodeId, to: NodeId) -> Option<f64> {
    dijkstra(
        &from,
        |node: &NodeId| {
            graph
                .neighbors(*node)
                .iter()
                .map(|edge| (edge.to, OrderedFloat(edge.weight)))
                .collect::<Vec<_>>()
        },
        |node| *node == to,
    )
    .map(|(_, cost)| cost.0)
}

/// Grid whose edge weights are randomly scaled up from the straight-line
/// distance, so the haversine heuristic stays admissible.
fn noisy_grid(seed: u64) -> RoadGraph {
    let base = grid_graph(6, 6, 1.0);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = RoadGraph::new();
    for id in base.node_ids() {
        let node = base.node(id);
        graph.add_node(node.id.clone(), node.lat, node.lon).unwrap();
    }
    for id in base.node_ids() {
        for edge in base.neighbors(id) {
            if edge.from < edge.to {
                let factor: f64 = rng.gen_range(1.0..3.0);
                graph
                    .connect(base.label(edge.from), base.label(edge.to), edge.weight * factor)
                    .unwrap();
            }
        }
    }
    graph
}

#[test]
fn zero_heuristic_matches_dijkstra_on_every_pair() {
    let graph = noisy_grid(11);
    let finder = PathFinder::new(HeuristicKind::Zero);
    for from in graph.node_ids() {
        for to in graph.node_ids() {
            let expected = oracle_cost(&graph, from, to).unwrap();
            let outcome = finder.search(&graph, from, to).unwrap();
            assert!((outcome.cost - expected).abs() < 1e-9);
            assert!(outcome.expanded <= graph.node_count());
        }
    }
}

#[test]
fn haversine_heuristic_finds_optimal_cost_on_admissible_graph() {
    let graph = noisy_grid(5);
    let finder = PathFinder::default();
    let corner = grid_node(&graph, 0, 0);
    for to in graph.node_ids() {
        let expected = oracle_cost(&graph, corner, to).unwrap();
        let outcome = finder.search(&graph, corner, to).unwrap();
        assert!((outcome.cost - expected).abs() < 1e-9);
    }
}

#[test]
fn haversine_heuristic_expands_no_more_than_zero_heuristic() {
    let graph = grid_graph(8, 8, 1.0);
    let from = grid_node(&graph, 0, 0);
    let to = grid_node(&graph, 7, 7);
    let informed = PathFinder::default().search(&graph, from, to).unwrap();
    let blind = PathFinder::new(HeuristicKind::Zero)
        .search(&graph, from, to)
        .unwrap();
    assert!(informed.expanded <= blind.expanded);
    assert!((informed.cost - blind.cost).abs() < 1e-9);
}

#[test]
fn path_walks_existing_edges_and_ends_at_goal() {
    let scenario = cape_town_demo().unwrap();
    let graph = &scenario.graph;
    let start = graph.node_id("Node3").unwrap();
    let goal = graph.node_id("Node10").unwrap();

    let outcome = PathFinder::default().search(graph, start, goal).unwrap();
    let mut previous = start;
    for &node in &outcome.path {
        assert!(graph.has_edge(previous, node));
        previous = node;
    }
    assert_eq!(previous, goal);

    let labels: Vec<&str> = outcome.path.iter().map(|&n| graph.label(n)).collect();
    assert_eq!(labels, vec!["Node5", "Node7", "Node10"]);
    assert_eq!(outcome.cost, 109.0);

    let route = graph.shortest_route(start, goal).unwrap();
    assert_eq!(route.cost(), outcome.cost);
}

#[test]
fn disconnected_goal_yields_none() {
    let mut graph = grid_graph(3, 3, 1.0);
    let island = graph.add_node("island", 10.0, 10.0).unwrap();
    let from = grid_node(&graph, 0, 0);
    assert!(PathFinder::default().search(&graph, from, island).is_none());
    assert!(PathFinder::default().next_hop(&graph, island, from).is_none());
    assert!(!graph.is_connected());
}

#[test]
fn next_hop_is_none_at_goal() {
    let graph = grid_graph(2, 2, 1.0);
    let node = grid_node(&graph, 1, 1);
    assert!(PathFinder::default().next_hop(&graph, node, node).is_none());
}

#[test]
fn haversine_is_symmetric_across_demo_nodes() {
    let scenario = cape_town_demo().unwrap();
    let graph = &scenario.graph;
    for a in graph.node_ids() {
        for b in graph.node_ids() {
            let (na, nb) = (graph.node(a), graph.node(b));
            let ab = haversine_km(na.lat, na.lon, nb.lat, nb.lon);
            let ba = haversine_km(nb.lat, nb.lon, na.lat, na.lon);
            assert!((ab - ba).abs() < 1e-12);
            assert!(ab >= 0.0);
        }
    }
}

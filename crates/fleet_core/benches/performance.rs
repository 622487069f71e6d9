//! Performance benchmarks for fleet_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleet_core::ecs::Vehicle;
use fleet_core::matching::{DispatchAlgorithm, IdleVehicle, NearestIdleVehicle};
use fleet_core::routing::{HeuristicKind, PathFinder};
use fleet_core::scenario::{build_scenario, cape_town_demo, Scenario, ScenarioParams, SimConfig};
use fleet_core::test_helpers::{grid_graph, grid_node};

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![("small", 10, 5, 50), ("medium", 20, 20, 200), ("large", 30, 50, 1000)];

    let mut group = c.benchmark_group("simulation_run");
    group.bench_function("cape_town_demo", |b| {
        b.iter(|| {
            let mut sim = cape_town_demo()
                .and_then(Scenario::into_simulation)
                .expect("demo is valid");
            sim.run();
            black_box(sim.summary());
        });
    });
    for (name, side, vehicles, requests) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(side, vehicles, requests),
            |b, &(side, vehicles, requests)| {
                b.iter(|| {
                    let graph = grid_graph(side, side, 1.5);
                    let mut scenario = Scenario::new(graph, SimConfig::default().with_horizon(500));
                    for i in 0..vehicles {
                        let start = grid_node(&scenario.graph, (i * 7) % side, (i * 3) % side);
                        scenario.vehicles.push(Vehicle::new(format!("V{i:03}"), start, 4));
                    }
                    let params = ScenarioParams::default()
                        .with_seed(42)
                        .with_requests(requests)
                        .with_request_window(100);
                    let mut sim = build_scenario(scenario, &params)
                        .into_simulation()
                        .expect("grid scenario is valid");
                    sim.run();
                    black_box(sim.summary());
                });
            },
        );
    }
    group.finish();
}

fn bench_path_finding(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_finding");
    for side in [10usize, 30, 60] {
        let graph = grid_graph(side, side, 1.0);
        let from = grid_node(&graph, 0, 0);
        let to = grid_node(&graph, side - 1, side - 1);
        for (label, kind) in [("haversine", HeuristicKind::Haversine), ("zero", HeuristicKind::Zero)] {
            let finder = PathFinder::new(kind);
            group.bench_with_input(
                BenchmarkId::new(label, side * side),
                &(from, to),
                |b, &(from, to)| {
                    b.iter(|| black_box(finder.next_hop(&graph, from, to)));
                },
            );
        }
        group.bench_with_input(
            BenchmarkId::new("dijkstra_route", side * side),
            &(from, to),
            |b, &(from, to)| {
                b.iter(|| black_box(graph.shortest_route(from, to)));
            },
        );
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let graph = grid_graph(30, 30, 1.0);
    let ids: Vec<String> = (0..200).map(|i| format!("V{i:03}")).collect();
    let idle: Vec<IdleVehicle<'_>> = ids
        .iter()
        .enumerate()
        .map(|(slot, id)| IdleVehicle {
            slot,
            id: id.as_str(),
            position: grid_node(&graph, (slot * 7) % 30, (slot * 13) % 30),
        })
        .collect();
    let pickup = grid_node(&graph, 15, 15);

    c.bench_function("nearest_idle_vehicle_200", |b| {
        b.iter(|| black_box(NearestIdleVehicle.select_vehicle(&graph, pickup, &idle)));
    });
}

criterion_group!(benches, bench_simulation_run, bench_path_finding, bench_dispatch);
criterion_main!(benches);

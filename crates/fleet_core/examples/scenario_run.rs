//! Run the Cape Town demo topped up with generated requests and print
//! completed trips.
//!
//! Run with: cargo run -p fleet_core --example scenario_run

use fleet_core::scenario::{build_scenario, cape_town_demo, ScenarioParams};

fn main() {
    const EXTRA_REQUESTS: usize = 40;
    const HORIZON: u64 = 200;

    let demo = cape_town_demo().expect("demo scenario is valid");
    let mut scenario = build_scenario(
        demo,
        &ScenarioParams::default()
            .with_seed(123)
            .with_requests(EXTRA_REQUESTS)
            .with_request_window(60),
    );
    scenario.config = scenario.config.with_horizon(HORIZON);

    let mut sim = scenario.into_simulation().expect("scenario is valid");
    sim.run();

    let summary = sim.summary().expect("run finished");
    let counts = sim.counts();
    println!(
        "--- Scenario run ({} generated requests, horizon {}, seed 123) ---",
        EXTRA_REQUESTS, HORIZON
    );
    println!("Last tick: {} ({:?})", summary.last_tick, summary.stop_reason);
    println!("Completed trips: {}", counts.trips_completed);
    println!("Still waiting: {}", counts.requests_waiting);

    let telemetry = sim.telemetry();
    const SAMPLE: usize = 20;
    for (i, r) in telemetry.completed_trips.iter().take(SAMPLE).enumerate() {
        println!(
            "  {}  request={} vehicle={}  time_to_match={}  time_to_pickup={}  trip_duration={}  completed_at={}",
            i + 1,
            r.request,
            r.vehicle,
            r.time_to_match(),
            r.time_to_pickup(),
            r.trip_duration(),
            r.completed_at,
        );
    }
    if telemetry.completed_trips.len() > SAMPLE {
        println!("  ... and {} more", telemetry.completed_trips.len() - SAMPLE);
    }
}

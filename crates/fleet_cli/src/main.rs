//! Runs a dispatch scenario and prints its event trace and KPIs.
//!
//! Run with: cargo run -p fleet_cli -- [--scenario path.json] [--horizon N]

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use fleet_core::routing::HeuristicKind;
use fleet_core::scenario::{build_scenario, cape_town_demo, RetryPolicy, ScenarioFile, ScenarioParams};
use fleet_core::telemetry::{Event, EventKind, Leg};
use fleet_core::{ConfigError, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fleet_sim",
    about = "Tick-based ride dispatch simulation",
    long_about = "Runs a ride dispatch scenario: requests are matched to the nearest\n\
                  idle vehicle and vehicles advance one A* hop per tick."
)]
struct Cli {
    /// JSON scenario file; the built-in Cape Town demo when omitted
    #[arg(long, env = "FLEET_SCENARIO")]
    scenario: Option<String>,
    /// Override the scenario's tick horizon
    #[arg(long)]
    horizon: Option<u64>,
    /// Drop requests after this many failed matches instead of retrying forever
    #[arg(long)]
    max_attempts: Option<u32>,
    /// A* heuristic
    #[arg(value_enum, long)]
    heuristic: Option<HeuristicArg>,
    /// Extra randomly generated requests
    #[arg(long, default_value_t = 0)]
    extra_requests: usize,
    /// Generated requests activate in 1..=window
    #[arg(long, default_value_t = 10)]
    request_window: u64,
    /// Seed for generated requests
    #[arg(long)]
    seed: Option<u64>,
    /// Reject scenarios whose road graph is not connected
    #[arg(long)]
    require_connected: bool,
    /// Output format
    #[arg(value_enum, long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Print the resolved scenario as JSON and exit
    #[arg(long)]
    dump_scenario: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeuristicArg {
    Haversine,
    Zero,
}

impl From<HeuristicArg> for HeuristicKind {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::Haversine => HeuristicKind::Haversine,
            HeuristicArg::Zero => HeuristicKind::Zero,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable trace
    Text,
    /// One JSON object per event, then a summary object
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fleet_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let mut scenario = match &cli.scenario {
        Some(path) => {
            info!(path = %path, "loading scenario file");
            ScenarioFile::load(path)?.into_scenario()?
        }
        None => cape_town_demo()?,
    };

    if let Some(horizon) = cli.horizon {
        scenario.config = scenario.config.with_horizon(horizon);
    }
    if let Some(limit) = cli.max_attempts {
        scenario.config = scenario.config.with_retry_policy(RetryPolicy::MaxAttempts(limit));
    }
    if let Some(heuristic) = cli.heuristic {
        scenario.config = scenario.config.with_heuristic(heuristic.into());
    }
    if cli.require_connected {
        scenario.config = scenario.config.with_require_connected(true);
    }
    if cli.extra_requests > 0 {
        let mut params = ScenarioParams::default()
            .with_requests(cli.extra_requests)
            .with_request_window(cli.request_window);
        if let Some(seed) = cli.seed {
            params = params.with_seed(seed);
        }
        scenario = build_scenario(scenario, &params);
    }

    if cli.dump_scenario {
        println!("{}", ScenarioFile::from(&scenario).to_json()?);
        return Ok(());
    }

    let mut sim = scenario.into_simulation()?;
    sim.run();

    match cli.format {
        OutputFormat::Text => print_text(&mut sim),
        OutputFormat::Json => print_json(&mut sim)?,
    }
    Ok(())
}

fn print_text(sim: &mut Simulation) {
    let mut current_tick = None;
    for event in sim.events() {
        if current_tick != Some(event.tick) {
            println!("--- Tick {} ---", event.tick);
            current_tick = Some(event.tick);
        }
        println!("{}", render_event(event));
    }

    let counts = sim.counts();
    let telemetry = sim.telemetry();
    println!();
    println!("--- Summary ---");
    println!("Trips completed:    {}", counts.trips_completed);
    println!("Requests waiting:   {}", counts.requests_waiting);
    println!("Requests abandoned: {}", counts.requests_abandoned);
    if let Some(mean) = telemetry.mean_time_to_match() {
        println!("Mean time to match: {mean:.2} ticks");
    }
    if let Some(mean) = telemetry.mean_trip_duration() {
        println!("Mean trip duration: {mean:.2} ticks");
    }
    for vehicle in sim.vehicles() {
        println!(
            "{}: active {} ticks, occupied {} ticks",
            vehicle.id, vehicle.active_ticks, vehicle.occupied_ticks
        );
    }
}

fn print_json(sim: &mut Simulation) -> Result<(), ConfigError> {
    for event in sim.events() {
        println!("{}", serde_json::to_string(event)?);
    }
    let summary = serde_json::json!({
        "counts": sim.counts(),
        "completed_trips": sim.telemetry().completed_trips,
        "abandoned_requests": sim.telemetry().abandoned_requests,
    });
    println!("{summary}");
    Ok(())
}

fn render_event(event: &Event) -> String {
    match &event.kind {
        EventKind::RequestEntered { request } => format!("Processing {request}"),
        EventKind::Assigned { request, vehicle } => {
            format!("Assigned {request} to {vehicle}")
        }
        EventKind::NoVehicleAvailable {
            request,
            retry_at: Some(tick),
        } => format!("No vehicle available for {request}, retrying at tick {tick}"),
        EventKind::NoVehicleAvailable {
            request,
            retry_at: None,
        } => format!("No vehicle available for {request}"),
        EventKind::RequestAbandoned { request, attempts } => {
            format!("Abandoned {request} after {attempts} attempts")
        }
        EventKind::Heading {
            vehicle,
            target,
            leg,
        } => {
            let leg = match leg {
                Leg::Pickup => "pickup",
                Leg::Dropoff => "dropoff",
            };
            format!("{vehicle} heading to {target} ({leg})")
        }
        EventKind::VehicleMoved { vehicle, from, to } => {
            format!("{vehicle} moved from {from} to {to}")
        }
        EventKind::VehicleStalled {
            vehicle,
            at,
            target,
        } => format!("{vehicle} has no path from {at} to {target}"),
        EventKind::PickedUp {
            vehicle,
            request,
            at,
        } => format!("{vehicle} picked up {request} at {at}"),
        EventKind::DroppedOff {
            vehicle,
            request,
            at,
        } => format!("{vehicle} dropped off {request} at {at}"),
        EventKind::TerminatedEarly => {
            "All requests served and all vehicles idle, stopping early".to_string()
        }
        EventKind::HorizonReached => "Tick horizon reached".to_string(),
    }
}

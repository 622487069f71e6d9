//! Scenario setup: the built-in demo, JSON files and random request top-ups.

mod build;
mod demo;
mod file;
mod params;

pub use build::{build_scenario, random_destination, Scenario};
pub use demo::cape_town_demo;
pub use file::{EdgeSpec, NodeSpec, RequestSpec, ScenarioFile, VehicleSpec};
pub use params::{RetryPolicy, ScenarioParams, SimConfig};

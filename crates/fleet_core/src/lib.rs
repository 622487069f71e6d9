//! Tick-based ride-dispatch simulation on a weighted road graph.
//!
//! Requests are matched to the nearest idle vehicle, and vehicles advance one
//! A* hop per tick. The simulation state lives in a `bevy_ecs` world; see
//! [`runner::Simulation`] for the entry point.

pub mod clock;
pub mod ecs;
pub mod error;
pub mod graph;
pub mod matching;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod spatial;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::ConfigError;
pub use runner::Simulation;

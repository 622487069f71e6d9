//! Construction-time validation errors.
//!
//! Runtime conditions (no idle vehicle, unreachable destination) are not
//! errors; they surface as [`crate::telemetry::EventKind`] entries instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("node `{id}` already exists with different coordinates")]
    DuplicateNode { id: String },

    #[error("node `{id}` has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { id: String, lat: f64, lon: f64 },

    #[error("unknown node `{id}`")]
    UnknownNode { id: String },

    #[error("edge `{from}` -> `{to}` has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },

    #[error("vehicle `{vehicle}` has zero seat capacity")]
    ZeroCapacity { vehicle: String },

    #[error("vehicle `{id}` is defined more than once")]
    DuplicateVehicle { id: String },

    #[error("ride request `{id}` is defined more than once")]
    DuplicateRequest { id: String },

    #[error("ride request `{request}` activates at tick {tick}, but ticks start at 1")]
    RequestBeforeFirstTick { request: String, tick: u64 },

    #[error("no path between `{from}` and `{to}`")]
    Disconnected { from: String, to: String },

    #[error("invalid scenario: {0}")]
    Scenario(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Scenario(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Scenario(err.to_string())
    }
}

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::routing::HeuristicKind;

/// Default number of ticks to simulate.
const DEFAULT_HORIZON: u64 = 20;

/// What to do with a request that found no idle vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryPolicy {
    /// Requeue for the next tick, without limit.
    #[default]
    RetryForever,
    /// Drop the request once it has failed to match this many times.
    MaxAttempts(u32),
}

impl RetryPolicy {
    /// Whether a request with `failed_attempts` failures goes back in the queue.
    pub fn allows_retry(&self, failed_attempts: u32) -> bool {
        match self {
            RetryPolicy::RetryForever => true,
            RetryPolicy::MaxAttempts(limit) => failed_attempts < *limit,
        }
    }
}

/// Simulation settings, inserted into the world as a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct SimConfig {
    /// Last tick to run; ticks are numbered from 1.
    pub horizon: u64,
    pub retry_policy: RetryPolicy,
    pub heuristic: HeuristicKind,
    /// Reject graphs with unreachable nodes at construction.
    pub require_connected: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            retry_policy: RetryPolicy::default(),
            heuristic: HeuristicKind::default(),
            require_connected: false,
        }
    }
}

impl SimConfig {
    pub fn with_horizon(mut self, horizon: u64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_require_connected(mut self, require_connected: bool) -> Self {
        self.require_connected = require_connected;
        self
    }
}

/// Parameters for topping up a scenario with randomly generated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioParams {
    /// Number of random requests to add.
    pub num_requests: usize,
    /// Random requests activate uniformly in `1..=request_window`.
    pub request_window: u64,
    pub seed: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            num_requests: 0,
            request_window: 10,
            seed: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_requests(mut self, num_requests: usize) -> Self {
        self.num_requests = num_requests;
        self
    }

    pub fn with_request_window(mut self, ticks: u64) -> Self {
        self.request_window = ticks.max(1);
        self
    }
}

//! JSON scenario files.
//!
//! ```json
//! {
//!   "nodes":    [{"id": "A", "lat": 0.0, "lon": 0.0}],
//!   "edges":    [{"from": "A", "to": "B", "weight": 1.0}],
//!   "vehicles": [{"id": "V", "start": "A", "capacity": 1}],
//!   "requests": [{"id": "R", "pickup": "B", "dropoff": "A", "tick": 1}],
//!   "config":   {"horizon": 10}
//! }
//! ```
//!
//! Nodes are referenced by their string id everywhere else in the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ecs::{RideRequest, Vehicle};
use crate::error::ConfigError;
use crate::graph::RoadGraph;
use crate::scenario::build::Scenario;
use crate::scenario::params::SimConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub id: String,
    pub start: String,
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub tick: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
    #[serde(default)]
    pub vehicles: Vec<VehicleSpec>,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
    #[serde(default)]
    pub config: SimConfig,
}

impl ScenarioFile {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves node references and builds the graph, fleet and queue.
    pub fn into_scenario(self) -> Result<Scenario, ConfigError> {
        let mut graph = RoadGraph::new();
        for node in &self.nodes {
            graph.add_node(node.id.as_str(), node.lat, node.lon)?;
        }
        for edge in &self.edges {
            graph.connect(&edge.from, &edge.to, edge.weight)?;
        }

        let vehicles = self
            .vehicles
            .iter()
            .map(|v| Ok(Vehicle::new(v.id.as_str(), graph.resolve(&v.start)?, v.capacity)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let requests = self
            .requests
            .iter()
            .map(|r| {
                Ok(RideRequest::new(
                    r.id.as_str(),
                    graph.resolve(&r.pickup)?,
                    graph.resolve(&r.dropoff)?,
                    r.tick,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Scenario {
            graph,
            vehicles,
            requests,
            config: self.config,
        })
    }
}

impl From<&Scenario> for ScenarioFile {
    fn from(scenario: &Scenario) -> Self {
        let graph = &scenario.graph;
        let nodes = graph
            .node_ids()
            .map(|id| {
                let node = graph.node(id);
                NodeSpec {
                    id: node.id.clone(),
                    lat: node.lat,
                    lon: node.lon,
                }
            })
            .collect();
        let edges = graph
            .node_ids()
            .flat_map(|id| graph.neighbors(id).iter())
            .filter(|edge| edge.from < edge.to)
            .map(|edge| EdgeSpec {
                from: graph.label(edge.from).to_string(),
                to: graph.label(edge.to).to_string(),
                weight: edge.weight,
            })
            .collect();
        let vehicles = scenario
            .vehicles
            .iter()
            .map(|v| VehicleSpec {
                id: v.id.clone(),
                start: graph.label(v.position).to_string(),
                capacity: v.capacity,
            })
            .collect();
        let requests = scenario
            .requests
            .iter()
            .map(|r| RequestSpec {
                id: r.id.clone(),
                pickup: graph.label(r.pickup).to_string(),
                dropoff: graph.label(r.dropoff).to_string(),
                tick: r.active_at,
            })
            .collect();

        Self {
            nodes,
            edges,
            vehicles,
            requests,
            config: scenario.config,
        }
    }
}

//! Road network: an undirected, weighted graph of geographic nodes.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]; the string id is
//! interned once so vehicles, requests and searches only carry the handle.
//! Every `add_edge` inserts both directions with the same weight.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

use bevy_ecs::prelude::Resource;
use ordered_float::OrderedFloat;
use pathfinding::prelude::dijkstra;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Arena handle for a [`Node`]. Only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A location. Equality and hashing use `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Directed half of a road; the graph always stores the reverse half too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// Ordered list of edges, kept for display and KPIs. Movement never reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    pub edges: Vec<Edge>,
}

impl Route {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Sum of edge weights.
    pub fn cost(&self) -> f64 {
        self.edges.iter().map(|edge| edge.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Visited nodes, starting with the first edge's origin.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        if let Some(first) = self.edges.first() {
            nodes.push(first.from);
        }
        nodes.extend(self.edges.iter().map(|edge| edge.to));
        nodes
    }
}

#[derive(Debug, Clone, Default, Resource)]
pub struct RoadGraph {
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
    adjacency: Vec<Vec<Edge>>,
}

impl RoadGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, or returns the existing handle when the same id is added
    /// again with identical coordinates.
    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Result<NodeId, ConfigError> {
        let id = id.into();
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(ConfigError::InvalidCoordinates { id, lat, lon });
        }
        if let Some(&existing) = self.index.get(&id) {
            let node = &self.nodes[existing.index()];
            if node.lat == lat && node.lon == lon {
                return Ok(existing);
            }
            return Err(ConfigError::DuplicateNode { id });
        }

        let handle = NodeId(self.nodes.len() as u32);
        self.index.insert(id.clone(), handle);
        self.nodes.push(Node { id, lat, lon });
        self.adjacency.push(Vec::new());
        Ok(handle)
    }

    /// Connects two nodes in both directions.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<(), ConfigError> {
        let from_label = self.label_or_unknown(from)?;
        let to_label = self.label_or_unknown(to)?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                from: from_label,
                to: to_label,
                weight,
            });
        }

        self.adjacency[from.index()].push(Edge { from, to, weight });
        self.adjacency[to.index()].push(Edge {
            from: to,
            to: from,
            weight,
        });
        Ok(())
    }

    /// [`RoadGraph::add_edge`] addressed by string ids.
    pub fn connect(&mut self, from: &str, to: &str, weight: f64) -> Result<(), ConfigError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.add_edge(from, to, weight)
    }

    fn label_or_unknown(&self, id: NodeId) -> Result<String, ConfigError> {
        self.get(id)
            .map(|node| node.id.clone())
            .ok_or_else(|| ConfigError::UnknownNode {
                id: format!("#{}", id.0),
            })
    }

    /// Outgoing edges of `node` in insertion order.
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The node behind `id`. `id` must have been issued by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn resolve(&self, id: &str) -> Result<NodeId, ConfigError> {
        self.node_id(id).ok_or_else(|| ConfigError::UnknownNode { id: id.to_string() })
    }

    /// String id of a node, for events and display.
    pub fn label(&self, id: NodeId) -> &str {
        &self.node(id).id
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of logical (undirected) connections.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.neighbors(from).iter().any(|edge| edge.to == to)
    }

    /// Weight of the first `from -> to` edge in adjacency order.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .find(|edge| edge.to == to)
            .map(|edge| edge.weight)
    }

    /// `Some(1.0)` when the nodes are adjacent, for hop-count costing.
    pub fn unweighted_edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.has_edge(from, to).then_some(1.0)
    }

    /// First node (in insertion order) that cannot be reached from the first
    /// node, paired with that origin.
    pub fn first_unreachable(&self) -> Option<(NodeId, NodeId)> {
        let origin = self.node_ids().next()?;
        let mut seen = vec![false; self.nodes.len()];
        let mut frontier = VecDeque::from([origin]);
        seen[origin.index()] = true;
        while let Some(current) = frontier.pop_front() {
            for edge in self.neighbors(current) {
                if !seen[edge.to.index()] {
                    seen[edge.to.index()] = true;
                    frontier.push_back(edge.to);
                }
            }
        }
        seen.iter()
            .position(|reached| !reached)
            .map(|i| (origin, NodeId(i as u32)))
    }

    pub fn is_connected(&self) -> bool {
        self.first_unreachable().is_none()
    }

    /// Cheapest route by edge weight. Display-only bookkeeping; the movement
    /// system re-plans through [`crate::routing::PathFinder`] every tick.
    pub fn shortest_route(&self, from: NodeId, to: NodeId) -> Option<Route> {
        let (path, _cost) = dijkstra(
            &from,
            |node: &NodeId| {
                self.neighbors(*node)
                    .iter()
                    .map(|edge| (edge.to, OrderedFloat(edge.weight)))
            },
            |node| *node == to,
        )?;

        let edges = path
            .windows(2)
            .filter_map(|pair| {
                self.neighbors(pair[0])
                    .iter()
                    .filter(|edge| edge.to == pair[1])
                    .min_by_key(|edge| OrderedFloat(edge.weight))
                    .copied()
            })
            .collect();
        Some(Route::new(edges))
    }
}

impl fmt::Display for RoadGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, edges) in self.nodes.iter().zip(&self.adjacency) {
            write!(f, "{}:", node.id)?;
            for edge in edges {
                write!(f, " {} ({})", self.label(edge.to), edge.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

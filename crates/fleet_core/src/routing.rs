//! Single-pair A* search over the [`RoadGraph`], recomputed from scratch on
//! every call.
//!
//! Vehicles re-plan each tick: [`PathFinder::next_hop`] runs a full search and
//! keeps only the first hop. The open set is a binary heap keyed by
//! `(g + h, node id)`, so equal scores always resolve to the lexicographically
//! smallest node id.
//!
//! The default heuristic is haversine distance. It is only admissible when
//! edge weights are at least the great-circle distance between endpoints;
//! otherwise the returned path may be suboptimal.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use bevy_ecs::prelude::Resource;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::graph::{Node, NodeId, RoadGraph};
use crate::spatial::distance_km_between_nodes;

/// Cost-to-go estimate guiding the search. Implementations must be
/// `Send + Sync` so the path finder can live in an ECS resource.
pub trait Heuristic: Send + Sync {
    fn estimate(&self, from: &Node, to: &Node) -> f64;
}

/// Great-circle distance in kilometres.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineHeuristic;

impl Heuristic for HaversineHeuristic {
    fn estimate(&self, from: &Node, to: &Node) -> f64 {
        distance_km_between_nodes(from, to)
    }
}

/// Always zero; turns A* into Dijkstra.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn estimate(&self, _from: &Node, _to: &Node) -> f64 {
        0.0
    }
}

/// Which heuristic to build. Serialized as part of [`crate::scenario::SimConfig`].
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    #[default]
    Haversine,
    Zero,
}

pub fn build_heuristic(kind: HeuristicKind) -> Box<dyn Heuristic> {
    match kind {
        HeuristicKind::Haversine => Box::new(HaversineHeuristic),
        HeuristicKind::Zero => Box::new(ZeroHeuristic),
    }
}

/// Result of one completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Nodes after `start`, ending with the goal. Empty when start == goal.
    pub path: Vec<NodeId>,
    /// `g` of the goal when it was reached.
    pub cost: f64,
    /// Nodes moved to the closed set.
    pub expanded: usize,
}

impl SearchOutcome {
    pub fn next_hop(&self) -> Option<NodeId> {
        self.path.first().copied()
    }
}

struct OpenEntry<'g> {
    f: OrderedFloat<f64>,
    g: f64,
    label: &'g str,
    node: NodeId,
}

impl Ord for OpenEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the smallest (f, label).
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.label.cmp(self.label))
    }
}

impl PartialOrd for OpenEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry<'_> {}

#[derive(Resource)]
pub struct PathFinder {
    heuristic: Box<dyn Heuristic>,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new(HeuristicKind::default())
    }
}

impl PathFinder {
    pub fn new(kind: HeuristicKind) -> Self {
        Self::with_heuristic(build_heuristic(kind))
    }

    pub fn with_heuristic(heuristic: Box<dyn Heuristic>) -> Self {
        Self { heuristic }
    }

    pub fn estimate(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> f64 {
        self.heuristic.estimate(graph.node(from), graph.node(to))
    }

    /// Immediate next node on the best path from `start` to `goal`.
    /// `None` when `start == goal` or the goal is unreachable.
    pub fn next_hop(&self, graph: &RoadGraph, start: NodeId, goal: NodeId) -> Option<NodeId> {
        self.search(graph, start, goal)?.next_hop()
    }

    /// Full A* search. `None` when the open set drains without reaching `goal`.
    pub fn search(&self, graph: &RoadGraph, start: NodeId, goal: NodeId) -> Option<SearchOutcome> {
        let goal_node = graph.get(goal)?;
        graph.get(start)?;

        let entry = move |node: NodeId, g: f64| OpenEntry {
            f: OrderedFloat(g + self.heuristic.estimate(graph.node(node), goal_node)),
            g,
            label: graph.label(node),
            node,
        };

        let mut open = BinaryHeap::new();
        let mut closed: HashSet<NodeId> = HashSet::new();
        let mut g_score: HashMap<NodeId, f64> = HashMap::new();
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();

        g_score.insert(start, 0.0);
        open.push(entry(start, 0.0));

        while let Some(OpenEntry { node: current, g, .. }) = open.pop() {
            // Lazy deletion: skip entries superseded by a cheaper push.
            if closed.contains(&current) || g_score.get(&current) != Some(&g) {
                continue;
            }

            if current == goal {
                return Some(SearchOutcome {
                    path: reconstruct_path(&came_from, current),
                    cost: g,
                    expanded: closed.len(),
                });
            }

            closed.insert(current);

            for edge in graph.neighbors(current) {
                let neighbor = edge.to;
                if closed.contains(&neighbor) {
                    continue;
                }
                let tentative = g + edge.weight;
                if let Some(&known) = g_score.get(&neighbor) {
                    if tentative >= known {
                        continue;
                    }
                }
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative);
                open.push(entry(neighbor, tentative));
            }
        }

        None
    }
}

/// Walks `came_from` back from `current`; the start node itself is excluded.
fn reconstruct_path(came_from: &HashMap<NodeId, NodeId>, mut current: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    while let Some(&previous) = came_from.get(&current) {
        path.push(current);
        current = previous;
    }
    path.reverse();
    path
}

use crate::graph::{NodeId, RoadGraph};

use super::types::IdleVehicle;

/// Chooses which idle vehicle serves a request.
pub trait DispatchAlgorithm: Send + Sync {
    /// Returns the `slot` of the chosen vehicle, or `None` when `idle` is
    /// empty. Must be deterministic for a given input.
    fn select_vehicle(
        &self,
        graph: &RoadGraph,
        pickup: NodeId,
        idle: &[IdleVehicle<'_>],
    ) -> Option<usize>;
}

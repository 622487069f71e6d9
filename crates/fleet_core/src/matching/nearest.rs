use ordered_float::OrderedFloat;

use crate::graph::{NodeId, RoadGraph};
use crate::spatial::distance_km_between_nodes;

use super::algorithm::DispatchAlgorithm;
use super::types::IdleVehicle;

/// Greedy nearest-vehicle dispatch.
///
/// Scores each idle vehicle by straight-line (haversine) distance from its
/// position to the pickup node, not by true route cost. Equal distances go to
/// the vehicle with the smallest id.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestIdleVehicle;

impl DispatchAlgorithm for NearestIdleVehicle {
    fn select_vehicle(
        &self,
        graph: &RoadGraph,
        pickup: NodeId,
        idle: &[IdleVehicle<'_>],
    ) -> Option<usize> {
        let pickup_node = graph.node(pickup);
        idle.iter()
            .min_by_key(|candidate| {
                let distance = distance_km_between_nodes(graph.node(candidate.position), pickup_node);
                (OrderedFloat(distance), candidate.id)
            })
            .map(|candidate| candidate.slot)
    }
}

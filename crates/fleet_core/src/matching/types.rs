use crate::graph::NodeId;

/// An idle vehicle offered to a [`super::DispatchAlgorithm`].
///
/// `slot` is the vehicle's index in the caller's fleet slice and is what the
/// algorithm hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleVehicle<'a> {
    pub slot: usize,
    pub id: &'a str,
    pub position: NodeId,
}

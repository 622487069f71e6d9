pub mod algorithm;
pub mod nearest;
pub mod types;

use bevy_ecs::prelude::Resource;

pub use algorithm::DispatchAlgorithm;
pub use nearest::NearestIdleVehicle;
pub use types::IdleVehicle;

/// Resource wrapper for the dispatch algorithm trait object.
#[derive(Resource)]
pub struct DispatchAlgorithmResource(pub Box<dyn DispatchAlgorithm>);

impl DispatchAlgorithmResource {
    pub fn new(algorithm: Box<dyn DispatchAlgorithm>) -> Self {
        Self(algorithm)
    }
}

impl Default for DispatchAlgorithmResource {
    fn default() -> Self {
        Self::new(Box::new(NearestIdleVehicle))
    }
}

impl std::ops::Deref for DispatchAlgorithmResource {
    type Target = dyn DispatchAlgorithm;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

use bevy_ecs::prelude::Resource;

/// Logical tick counter. Tick 0 means "not started"; the first tick is 1 and
/// the last is `horizon`.
#[derive(Debug, Default, Clone, Copy, Resource)]
pub struct SimulationClock {
    now: u64,
    horizon: u64,
}

impl SimulationClock {
    pub fn new(horizon: u64) -> Self {
        Self { now: 0, horizon }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn horizon(&self) -> u64 {
        self.horizon
    }

    /// Moves to the next tick, or returns `None` once the horizon is spent.
    pub fn advance(&mut self) -> Option<u64> {
        if self.now >= self.horizon {
            return None;
        }
        self.now += 1;
        Some(self.now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.now >= self.horizon
    }
}

#![allow(dead_code)]

use bevy_ecs::prelude::World;
use bevy_ecs::schedule::Schedule;
use fleet_core::runner::{run_next_tick, run_until_settled, simulation_schedule, RunSummary};

/// Helper that owns a reusable `Schedule` so tests can step or drain the simulation.
pub struct ScheduleRunner {
    schedule: Schedule,
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleRunner {
    /// Create a runner with the default simulation schedule.
    pub fn new() -> Self {
        Self {
            schedule: simulation_schedule(),
        }
    }

    /// Run a single tick (returns `false` once the horizon is spent).
    pub fn run_one(&mut self, world: &mut World) -> bool {
        run_next_tick(world, &mut self.schedule)
    }

    /// Run `ticks` ticks, returning how many actually ran.
    pub fn run_ticks(&mut self, world: &mut World, ticks: usize) -> usize {
        (0..ticks).take_while(|_| self.run_one(world)).count()
    }

    /// Drive the simulation until the fleet settles or the horizon is reached.
    pub fn run_full(&mut self, world: &mut World) -> RunSummary {
        run_until_settled(world, &mut self.schedule)
    }
}

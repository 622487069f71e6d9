pub mod events;
pub mod schedule;
pub mod world;

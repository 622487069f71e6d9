pub mod dispatch;
pub mod movement;

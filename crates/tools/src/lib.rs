//! Developer tooling: game inspector and frame timing.
//!
//! # Invariants
//! - Tools only read game state; they never drive the simulation.

mod inspector;
mod timing;

pub use inspector::{GameInspector, GameSummary, NearestObstacle, ObstacleInfo};
pub use timing::FrameTimer;

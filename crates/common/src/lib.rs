//! Shared types for the skate-escape core: lanes, kind tags, per-frame input
//! and the game configuration.
//!
//! # Invariants
//! - `Lane` is closed over {-1, 0, 1}; an out-of-range lane cannot be built.
//! - Every loaded `GameConfig` has passed `validate()`.

pub mod config;
pub mod types;

pub use config::{
    BuildingConfig, CollisionConfig, ConfigError, GameConfig, GroundConfig, JumpConfig,
    KindWeights, ObstacleConfig, OfficerConfig, PlayerConfig, SpeedConfig, TimingConfig,
};
pub use types::{Facade, FrameInput, Lane, ObstacleKind, Side, translation_of};

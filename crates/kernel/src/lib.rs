//! Game kernel: authoritative simulation state for the endless runner.
//!
//! One `GameState` owns every pool, the player and the officer, and is
//! advanced by a synchronous `update(dt, input)` call per rendered frame.
//!
//! # Invariants
//! - Pools never grow or shrink after construction; passed objects are
//!   teleported to the back of their queue.
//! - The collision latch only clears through `restart`.
//! - Same config, seed and input sequence produce the same `state_hash`.

pub mod collision;
pub mod game;
pub mod generator;
pub mod officer;
pub mod player;
pub mod pool;
pub mod rng;

pub use collision::{Collision, CollisionDetector, Hit};
pub use game::{FrameReport, GameEvent, GameState, PoolId, Scroll};
pub use generator::Generator;
pub use officer::Officer;
pub use player::{JumpProfile, PlayerController, PlayerPose, Timer};
pub use pool::{Placement, PoolSpec, Recycled, RecyclePool, Slot};
pub use rng::SpawnRng;

//! Input layer: keys map to named actions, actions are latched between frames
//! and handed to the kernel as one `FrameInput`.
//!
//! # Invariants
//! - Each action is a single-slot edge flag; repeats before a frame coalesce.
//! - The kernel never sees raw keys, only actions.

pub mod action;
pub mod latch;
pub mod script;

pub use action::Action;
pub use latch::{InputLatch, KeyBindings};
pub use script::{InputScript, ScriptError};

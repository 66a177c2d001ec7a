//! Rendering adapter: turns game state into `(shape, transform, material)`
//! draw commands and score/game-over notifications.
//!
//! # Invariants
//! - Renderers read game state; they never mutate it.
//! - Draw order is fixed: ground, sidewalks, buildings, player, obstacles,
//!   officer.

mod draw;
mod present;
mod renderer;

pub use draw::{DrawCommand, DrawSink, Material, Shape, build_draw_list, emit_frame};
pub use present::{Presentation, RecordingPresentation, present};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

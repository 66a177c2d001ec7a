use glam::{Mat4, Vec3};
use skate_kernel::GameState;
use std::fmt::Write;

use crate::draw::{Shape, build_draw_list};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    /// Chase camera above and behind the skater.
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 9.0, 15.0),
            target: Vec3::new(0.0, 0.0, -5.0),
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads game state and a view configuration, then produces
/// output. It never mutates the game; the kernel owns the truth.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given game state and view.
    fn render(&mut self, game: &GameState, view: &RenderView) -> Self::Output;
}

/// Human-readable frame dump for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every building (off by default; there are a hundred).
    pub include_buildings: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, game: &GameState, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (tick={}, t={:.2}s, seed={}) ===",
            game.tick(),
            game.time(),
            game.seed()
        );
        let _ = writeln!(
            out,
            "Distance: {}m  speed={:.2}  {}",
            game.display_score(),
            game.speed(),
            if game.is_collided() { "GAME OVER" } else { "running" }
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z, view.fov_degrees
        );

        let list = build_draw_list(game);
        let _ = writeln!(out, "Draw commands: {}", list.len());
        for command in &list {
            if command.shape == Shape::Building && !self.include_buildings {
                continue;
            }
            let p = command.transform.w_axis;
            let _ = writeln!(
                out,
                "  {:<28} {:<13} pos=({:.2}, {:.2}, {:.2})",
                format!("{:?}", command.shape),
                format!("{:?}", command.material),
                p.x,
                p.y,
                p.z
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skate_common::{FrameInput, GameConfig};

    #[test]
    fn debug_renderer_fresh_game() {
        let game = GameState::new(GameConfig::default(), 1);
        let output = DebugTextRenderer::new().render(&game, &RenderView::default());
        assert!(output.contains("tick=0"));
        assert!(output.contains("Distance: 0m"));
        assert!(output.contains("running"));
        assert!(output.contains("Skater"));
        assert!(output.contains("Officer"));
        assert!(!output.contains("Building "));
    }

    #[test]
    fn debug_renderer_lists_buildings_on_request() {
        let game = GameState::new(GameConfig::default(), 1);
        let mut renderer = DebugTextRenderer {
            include_buildings: true,
        };
        let output = renderer.render(&game, &RenderView::default());
        assert!(output.contains("Facade"));
    }

    #[test]
    fn debug_renderer_reports_game_over() {
        let mut config = GameConfig::default();
        config.timing.opening_grace = 0.0;
        config.obstacles.front_depth = -10_000.0;
        let mut game = GameState::new(config, 2);
        // The officer catches a center-lane skater within a few seconds.
        for _ in 0..600 {
            game.update(1.0 / 60.0, FrameInput::default());
        }
        let output = DebugTextRenderer::new().render(&game, &RenderView::default());
        assert!(output.contains("GAME OVER"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.eye, Vec3::new(0.0, 9.0, 15.0));
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let view = RenderView::default();
        let eye = view.view_matrix().transform_point3(view.eye);
        assert!(eye.length() < 1e-4);
        let target = view.view_matrix().transform_point3(view.target);
        assert!(target.z < 0.0);
    }
}

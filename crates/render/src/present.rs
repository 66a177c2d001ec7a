use skate_kernel::{FrameReport, GameEvent, GameState};

/// Score and game-over display. Calls are fire-and-forget.
pub trait Presentation {
    fn show_score(&mut self, distance: u64);
    fn show_game_over(&mut self, final_distance: u64);
    fn hide_game_over(&mut self);
}

/// Forward one frame's outcome to the presentation layer.
pub fn present(game: &GameState, report: &FrameReport, sink: &mut impl Presentation) {
    for event in &report.events {
        match event {
            GameEvent::Restarted { .. } => sink.hide_game_over(),
            GameEvent::GameOver { score } => sink.show_game_over(*score),
            _ => {}
        }
    }
    if !game.is_collided() {
        sink.show_score(game.display_score());
    }
}

/// Keeps the last values shown; used by headless runs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingPresentation {
    pub score: Option<u64>,
    pub game_over: Option<u64>,
    pub score_updates: usize,
}

impl Presentation for RecordingPresentation {
    fn show_score(&mut self, distance: u64) {
        self.score = Some(distance);
        self.score_updates += 1;
    }

    fn show_game_over(&mut self, final_distance: u64) {
        self.game_over = Some(final_distance);
    }

    fn hide_game_over(&mut self) {
        self.game_over = None;
    }
}

use glam::Vec3;
use skate_common::{Lane, ObstacleKind};
use skate_kernel::GameState;

/// Read-only queries against a running game for debugging and the CLI.
pub struct GameInspector;

impl GameInspector {
    pub fn summary(game: &GameState) -> GameSummary {
        GameSummary {
            tick: game.tick(),
            time: game.time(),
            seed: game.seed(),
            speed: game.speed(),
            distance: game.display_score(),
            lane: game.player().lane(),
            collided: game.is_collided(),
            pending_events: game.events().len(),
            nearest_obstacle: Self::nearest_obstacle(game),
        }
    }

    /// The closest obstacle still in front of the skater (depth below zero).
    pub fn nearest_obstacle(game: &GameState) -> Option<NearestObstacle> {
        game.obstacles()
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.depth < 0.0)
            .max_by(|(_, a), (_, b)| a.depth.total_cmp(&b.depth))
            .map(|(index, slot)| NearestObstacle {
                index,
                kind: slot.kind,
                lane: slot.lane,
                distance: -slot.depth,
            })
    }

    pub fn inspect_obstacle(game: &GameState, index: usize) -> Option<ObstacleInfo> {
        game.obstacles().get(index).map(|slot| ObstacleInfo {
            index,
            kind: slot.kind,
            lane: slot.lane,
            position: slot.position(),
        })
    }

    /// Obstacle counts per kind, in kind order.
    pub fn kind_histogram(game: &GameState) -> Vec<(ObstacleKind, usize)> {
        ObstacleKind::ALL
            .iter()
            .map(|&kind| {
                let count = game.obstacles().slots().iter().filter(|s| s.kind == kind).count();
                (kind, count)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestObstacle {
    pub index: usize,
    pub kind: ObstacleKind,
    pub lane: Option<Lane>,
    /// Units of road between the skater and the obstacle.
    pub distance: f32,
}

#[derive(Debug, Clone)]
pub struct GameSummary {
    pub tick: u64,
    pub time: f64,
    pub seed: u64,
    pub speed: f32,
    pub distance: u64,
    pub lane: Lane,
    pub collided: bool,
    pub pending_events: usize,
    pub nearest_obstacle: Option<NearestObstacle>,
}

impl std::fmt::Display for GameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Game: tick={} t={:.2}s seed={} speed={:.2} distance={}m lane={:?} collided={} pending_events={}",
            self.tick,
            self.time,
            self.seed,
            self.speed,
            self.distance,
            self.lane,
            self.collided,
            self.pending_events
        )?;
        if let Some(nearest) = &self.nearest_obstacle {
            write!(
                f,
                " nearest={:?}#{} at {:.1}",
                nearest.kind, nearest.index, nearest.distance
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ObstacleInfo {
    pub index: usize,
    pub kind: ObstacleKind,
    pub lane: Option<Lane>,
    pub position: Vec3,
}

impl std::fmt::Display for ObstacleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Obstacle [{}] {:?} pos=({:.2}, {:.2}, {:.2})",
            self.index, self.kind, self.position.x, self.position.y, self.position.z
        )
    }
}

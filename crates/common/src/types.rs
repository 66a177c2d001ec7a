use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// One of the three road lanes the skater can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Signed lane offset in {-1, 0, 1}.
    pub fn offset(self) -> i32 {
        match self {
            Lane::Left => -1,
            Lane::Center => 0,
            Lane::Right => 1,
        }
    }

    pub fn from_offset(offset: i32) -> Option<Lane> {
        match offset {
            -1 => Some(Lane::Left),
            0 => Some(Lane::Center),
            1 => Some(Lane::Right),
            _ => None,
        }
    }

    /// World-space x of the lane center.
    pub fn x(self, lane_width: f32) -> f32 {
        self.offset() as f32 * lane_width
    }

    /// The lane one step to the left, if still on the road.
    pub fn left(self) -> Option<Lane> {
        Lane::from_offset(self.offset() - 1)
    }

    /// The lane one step to the right, if still on the road.
    pub fn right(self) -> Option<Lane> {
        Lane::from_offset(self.offset() + 1)
    }
}

/// Obstacle variety placed on the road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Wooden bench, drawn with the upright fence-panel mesh.
    Bench,
    /// Low bar the skater is expected to jump, drawn with the flat bench mesh.
    JumpBar,
    /// Traffic cone.
    Cone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Bench, ObstacleKind::JumpBar, ObstacleKind::Cone];
}

/// Building facade drawn along the sidewalks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facade {
    Office,
    Brick,
    Glass,
    Tower,
}

impl Facade {
    pub const ALL: [Facade; 4] = [Facade::Office, Facade::Brick, Facade::Glass, Facade::Tower];
}

/// Road side for the building rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for the left side, +1 for the right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Actions latched since the previous frame. Each flag is single-slot:
/// repeated presses before consumption collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub restart: bool,
}

impl FrameInput {
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.jump || self.restart)
    }
}

/// Translation column of a homogeneous transform.
pub fn translation_of(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

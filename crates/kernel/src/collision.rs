use glam::Vec3;
use serde::{Deserialize, Serialize};
use skate_common::ObstacleKind;

use crate::pool::Slot;

/// What the skater ran into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Hit {
    Obstacle { index: usize, kind: ObstacleKind },
    Officer,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collision {
    pub hit: Hit,
    pub distance: f32,
}

/// Sphere-distance test of the skater against every obstacle and the officer.
///
/// Linear in the pool size. A spatial index along the depth axis would be the
/// place to start if pools grow by orders of magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    threshold: f32,
}

impl CollisionDetector {
    pub fn new(threshold: f32) -> Self {
        assert!(threshold >= 0.0, "collision threshold must be non-negative");
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// First obstacle (in slot order) closer than the threshold, then the officer.
    pub fn check(
        &self,
        player: Vec3,
        obstacles: &[Slot<ObstacleKind>],
        officer: Vec3,
    ) -> Option<Collision> {
        for (index, slot) in obstacles.iter().enumerate() {
            let distance = player.distance(slot.position());
            if distance < self.threshold {
                return Some(Collision {
                    hit: Hit::Obstacle {
                        index,
                        kind: slot.kind,
                    },
                    distance,
                });
            }
        }
        let distance = player.distance(officer);
        (distance < self.threshold).then_some(Collision {
            hit: Hit::Officer,
            distance,
        })
    }
}

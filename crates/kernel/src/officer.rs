use glam::{Mat4, Vec3};
use skate_common::OfficerConfig;
use std::f64::consts::TAU;

/// The officer chasing the skater. Scrolls with the world and is never
/// recycled; once passed it stays behind the camera until restart.
#[derive(Debug, Clone)]
pub struct Officer {
    config: OfficerConfig,
    position: Vec3,
}

impl Officer {
    pub fn new(config: OfficerConfig) -> Self {
        let position = Vec3::from_array(config.start);
        Self { config, position }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn advance(&mut self, dz: f32) {
        self.position.z += dz;
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.config.scale))
    }

    /// Arm swing driven by wall-clock time, so it keeps waving during grace
    /// periods and after the chase ends.
    pub fn wave_angle(&self, wall_time: f64) -> f32 {
        (wall_time * TAU * f64::from(self.config.wave_hz)).sin() as f32
    }

    pub fn reset(&mut self) {
        self.position = Vec3::from_array(self.config.start);
    }
}

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use skate_common::{JumpConfig, Lane, PlayerConfig};
use std::f32::consts::{FRAC_PI_2, PI};

/// A one-shot animation clock measured in gameplay seconds.
///
/// The start is kept at clock precision; only the elapsed time is narrowed
/// to `f32`, so timers still finish deep into a long session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    start: f64,
    duration: f32,
}

impl Timer {
    pub fn new(start: f64, duration: f32) -> Self {
        assert!(duration > 0.0, "timer duration must be positive, got {duration}");
        Self { start, duration }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Elapsed time clamped to [0, duration].
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.start) as f32).clamp(0.0, self.duration)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start >= f64::from(self.duration)
    }
}

/// Height and crouch curves of a jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpProfile {
    pub duration: f32,
    pub crouch_duration: f32,
    pub crouch_bend: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl JumpProfile {
    pub fn from_config(config: &JumpConfig) -> Self {
        Self {
            duration: config.duration,
            crouch_duration: config.duration * config.crouch_fraction,
            crouch_bend: config.crouch_bend,
            min_height: config.min_height,
            max_height: config.max_height,
        }
    }

    /// Half-sine arc: `min` at both ends, `max` at mid-air.
    pub fn height(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, self.duration);
        self.min_height + (self.max_height - self.min_height) * (PI / self.duration * p).sin()
    }

    pub fn is_crouching(&self, progress: f32) -> bool {
        progress < self.crouch_duration
    }

    /// Knee bend while crouching, zero afterwards.
    pub fn bend_angle(&self, progress: f32) -> f32 {
        if self.is_crouching(progress) {
            self.crouch_bend * (PI / self.crouch_duration * progress).sin()
        } else {
            0.0
        }
    }

    /// Rendered height: held on the ground through the crouch, then the arc.
    pub fn pose_height(&self, progress: f32) -> f32 {
        if self.is_crouching(progress) {
            self.min_height
        } else {
            self.height(progress)
        }
    }
}

/// Frame output of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    pub lane: Lane,
    pub height: f32,
    pub bend_angle: f32,
    pub lean_angle: f32,
}

/// Lane, jump and lean state of the skater. The three animations run on
/// independent timers and combine into one transform.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    profile: JumpProfile,
    lane: Lane,
    jump: Option<Timer>,
    lean_left: Option<Timer>,
    lean_right: Option<Timer>,
    pose: PlayerPose,
}

impl PlayerController {
    pub fn new(config: PlayerConfig, jump: &JumpConfig) -> Self {
        let pose = PlayerPose {
            lane: Lane::Center,
            height: config.ride_height,
            bend_angle: 0.0,
            lean_angle: 0.0,
        };
        Self {
            config,
            profile: JumpProfile::from_config(jump),
            lane: Lane::Center,
            jump: None,
            lean_left: None,
            lean_right: None,
            pose,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn pose(&self) -> PlayerPose {
        self.pose
    }

    pub fn profile(&self) -> &JumpProfile {
        &self.profile
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// A lean animation is still playing from the previous lane change.
    pub fn is_shifting(&self) -> bool {
        self.lean_left.is_some() || self.lean_right.is_some()
    }

    /// Move one lane left. Refused at the road edge or mid-shift.
    pub fn shift_left(&mut self, now: f64) -> bool {
        if self.is_shifting() {
            return false;
        }
        match self.lane.left() {
            Some(lane) => {
                self.lane = lane;
                self.lean_left = Some(Timer::new(now, self.config.lean_duration));
                true
            }
            None => false,
        }
    }

    /// Move one lane right. Refused at the road edge or mid-shift.
    pub fn shift_right(&mut self, now: f64) -> bool {
        if self.is_shifting() {
            return false;
        }
        match self.lane.right() {
            Some(lane) => {
                self.lane = lane;
                self.lean_right = Some(Timer::new(now, self.config.lean_duration));
                true
            }
            None => false,
        }
    }

    pub fn start_jump(&mut self, now: f64) -> bool {
        if self.jump.is_some() {
            return false;
        }
        self.jump = Some(Timer::new(now, self.profile.duration));
        true
    }

    /// Drop every animation that has run its full duration by `now`.
    pub fn tick(&mut self, now: f64) {
        for timer in [&mut self.jump, &mut self.lean_left, &mut self.lean_right] {
            if matches!(timer, Some(t) if t.is_finished(now)) {
                *timer = None;
            }
        }
    }

    /// Step all timers to `now` and recompute the pose.
    pub fn update(&mut self, now: f64) -> PlayerPose {
        self.tick(now);

        let mut height = self.config.ride_height;
        let mut bend_angle = 0.0;
        if let Some(timer) = self.jump {
            let p = timer.progress(now);
            height = self.profile.pose_height(p);
            bend_angle = self.profile.bend_angle(p);
        }

        let mut lean_angle = 0.0;
        if self.lean_left.is_some() {
            lean_angle -= self.config.lean_angle;
        }
        if self.lean_right.is_some() {
            lean_angle += self.config.lean_angle;
        }

        self.pose = PlayerPose {
            lane: self.lane,
            height,
            bend_angle,
            lean_angle,
        };
        self.pose
    }

    /// `translate(lane, height, 0) · rotY(π/2) · rotX(lean) · scale`.
    pub fn transform(&self) -> Mat4 {
        let translation = Vec3::new(self.lane.x(self.config.lane_width), self.pose.height, 0.0);
        let rotation = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(self.pose.lean_angle);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.config.scale), rotation, translation)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.lane.x(self.config.lane_width), self.pose.height, 0.0)
    }

    /// Back to the center lane with no animation running.
    pub fn reset(&mut self) {
        self.lane = Lane::Center;
        self.jump = None;
        self.lean_left = None;
        self.lean_right = None;
        self.pose = PlayerPose {
            lane: Lane::Center,
            height: self.config.ride_height,
            bend_angle: 0.0,
            lean_angle: 0.0,
        };
    }
}

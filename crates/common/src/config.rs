//! Game configuration: every tunable constant of the scene, loadable from
//! YAML or JSON. Defaults reproduce the stock scene.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f32::consts::PI;
use std::path::Path;

use crate::types::{Facade, ObstacleKind};

/// Errors from loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension: {0:?}")]
    UnsupportedExtension(String),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

/// Discrete distribution over kind tags. Sampling walks the map in key order,
/// so the same random draw always selects the same kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindWeights<K: Ord>(BTreeMap<K, f32>);

impl<K: Ord + Copy> KindWeights<K> {
    pub fn new(pairs: impl IntoIterator<Item = (K, f32)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Equal weight for every listed kind.
    pub fn uniform(kinds: &[K]) -> Self {
        Self::new(kinds.iter().map(|k| (*k, 1.0)))
    }

    pub fn total(&self) -> f32 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f32)> + '_ {
        self.0.iter().map(|(k, w)| (*k, *w))
    }

    pub fn get(&self, kind: K) -> f32 {
        self.0.get(&kind).copied().unwrap_or(0.0)
    }

    /// Select the kind whose cumulative weight band contains `unit * total`.
    /// `unit` is expected in [0, 1).
    pub fn select(&self, unit: f32) -> Option<K> {
        let target = unit * self.total();
        let mut acc = 0.0;
        let mut last = None;
        for (kind, weight) in self.iter() {
            if weight <= 0.0 {
                continue;
            }
            acc += weight;
            last = Some(kind);
            if target < acc {
                return Some(kind);
            }
        }
        // Float rounding at the top of the range lands on the last band.
        last
    }

    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.0.values().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(invalid(field, "weights must be finite and non-negative"));
        }
        if self.total() <= 0.0 {
            return Err(invalid(field, "at least one weight must be positive"));
        }
        Ok(())
    }
}

/// Lateral placement, ride height and lean animation of the skater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub lane_width: f32,
    pub ride_height: f32,
    pub scale: f32,
    /// Seconds a lean-into-the-turn tilt lasts after a lane change.
    pub lean_duration: f32,
    /// Tilt (radians) about the board axis while leaning.
    pub lean_angle: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            lane_width: 4.0,
            ride_height: 2.25,
            scale: 1.5,
            lean_duration: 0.3,
            lean_angle: PI / 20.0,
        }
    }
}

/// Half-sine jump arc with a crouch wind-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub duration: f32,
    /// Fraction of `duration` spent crouching before the rise.
    pub crouch_fraction: f32,
    /// Peak knee bend (radians) during the crouch.
    pub crouch_bend: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            duration: 0.8,
            crouch_fraction: 0.2,
            crouch_bend: 0.5,
            min_height: 2.25,
            max_height: 5.625,
        }
    }
}

/// Obstacle pool layout and spawn distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub count: usize,
    /// Depth the opening layout starts behind.
    pub front_depth: f32,
    /// Depth past which an obstacle is respawned at the back.
    pub cutoff: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub height: f32,
    /// Kind distribution of the opening layout (new game and restart).
    pub opening_weights: KindWeights<ObstacleKind>,
    /// Kind distribution when a passed obstacle is respawned.
    pub recycle_weights: KindWeights<ObstacleKind>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            count: 50,
            front_depth: -100.0,
            cutoff: 25.0,
            min_gap: 10.0,
            max_gap: 15.0,
            height: 2.0,
            opening_weights: KindWeights::new([
                (ObstacleKind::JumpBar, 0.25),
                (ObstacleKind::Cone, 0.40),
                (ObstacleKind::Bench, 0.35),
            ]),
            recycle_weights: KindWeights::new([
                (ObstacleKind::JumpBar, 0.10),
                (ObstacleKind::Cone, 0.10),
                (ObstacleKind::Bench, 0.80),
            ]),
        }
    }
}

/// One building row per road side, evenly spaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    pub count: usize,
    pub front_depth: f32,
    pub cutoff: f32,
    pub spacing: f32,
    /// Distance of the facade center from the road axis.
    pub lateral_offset: f32,
    pub height: f32,
    pub scale: [f32; 3],
    pub weights: KindWeights<Facade>,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            count: 50,
            front_depth: 0.6,
            cutoff: 2.0,
            spacing: 12.6,
            lateral_offset: 18.5,
            height: 6.0,
            scale: [5.0, 5.0, 6.0],
            weights: KindWeights::uniform(&Facade::ALL),
        }
    }
}

/// The pursuing officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficerConfig {
    pub start: [f32; 3],
    pub scale: f32,
    /// Arm waves per second of wall-clock time.
    pub wave_hz: f32,
}

impl Default for OfficerConfig {
    fn default() -> Self {
        Self {
            start: [0.0, 2.0, -20.0],
            scale: 1.5,
            wave_hz: 1.0,
        }
    }
}

/// World scroll speed ramp. The ramp is applied per frame, not per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub initial: f32,
    pub cap: f32,
    pub ramp_per_frame: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: 15.0,
            cap: 50.0,
            ramp_per_frame: 0.05,
        }
    }
}

/// Grace periods during which gameplay time is held at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub opening_grace: f32,
    pub restart_grace: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            opening_grace: 4.0,
            restart_grace: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Center distance below which the skater is caught. Zero disables hits.
    pub threshold: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { threshold: 2.5 }
    }
}

/// Texture scroll rates of the road and sidewalk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    pub road_divisor: f32,
    pub sidewalk_factor: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            road_divisor: 450.0,
            sidewalk_factor: 20.0,
        }
    }
}

/// Complete scene configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub jump: JumpConfig,
    pub obstacles: ObstacleConfig,
    pub buildings: BuildingConfig,
    pub officer: OfficerConfig,
    pub speed: SpeedConfig,
    pub timing: TimingConfig,
    pub collision: CollisionConfig,
    pub ground: GroundConfig,
}

impl GameConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text),
            "json" => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedExtension(ext)),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("player.lane_width", self.player.lane_width)?;
        require_positive("player.scale", self.player.scale)?;
        require_positive("player.lean_duration", self.player.lean_duration)?;

        let jump = &self.jump;
        require_positive("jump.duration", jump.duration)?;
        if !(0.0..1.0).contains(&jump.crouch_fraction) {
            return Err(invalid("jump.crouch_fraction", "must be in [0, 1)"));
        }
        if jump.max_height < jump.min_height {
            return Err(invalid("jump.max_height", "must be >= jump.min_height"));
        }

        let obstacles = &self.obstacles;
        if obstacles.count == 0 {
            return Err(invalid("obstacles.count", "pool must hold at least one slot"));
        }
        require_positive("obstacles.min_gap", obstacles.min_gap)?;
        if obstacles.max_gap < obstacles.min_gap {
            return Err(invalid("obstacles.max_gap", "must be >= obstacles.min_gap"));
        }
        if obstacles.front_depth >= obstacles.cutoff {
            return Err(invalid("obstacles.front_depth", "must lie behind the cutoff"));
        }
        obstacles.opening_weights.validate("obstacles.opening_weights")?;
        obstacles.recycle_weights.validate("obstacles.recycle_weights")?;

        let buildings = &self.buildings;
        if buildings.count == 0 {
            return Err(invalid("buildings.count", "pool must hold at least one slot"));
        }
        require_positive("buildings.spacing", buildings.spacing)?;
        if buildings.front_depth >= buildings.cutoff {
            return Err(invalid("buildings.front_depth", "must lie behind the cutoff"));
        }
        buildings.weights.validate("buildings.weights")?;

        require_positive("officer.scale", self.officer.scale)?;

        let speed = &self.speed;
        require_positive("speed.initial", speed.initial)?;
        if speed.cap < speed.initial {
            return Err(invalid("speed.cap", "must be >= speed.initial"));
        }
        if speed.ramp_per_frame < 0.0 {
            return Err(invalid("speed.ramp_per_frame", "must be >= 0"));
        }

        if self.timing.opening_grace < 0.0 || self.timing.restart_grace < 0.0 {
            return Err(invalid("timing", "grace periods must be >= 0"));
        }
        if self.collision.threshold < 0.0 {
            return Err(invalid("collision.threshold", "must be >= 0"));
        }
        require_positive("ground.road_divisor", self.ground.road_divisor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn weights_select_by_cumulative_band() {
        // Key order: Bench, JumpBar, Cone.
        let w = KindWeights::new([
            (ObstacleKind::Bench, 0.8),
            (ObstacleKind::JumpBar, 0.1),
            (ObstacleKind::Cone, 0.1),
        ]);
        assert_eq!(w.select(0.0), Some(ObstacleKind::Bench));
        assert_eq!(w.select(0.79), Some(ObstacleKind::Bench));
        assert_eq!(w.select(0.85), Some(ObstacleKind::JumpBar));
        assert_eq!(w.select(0.95), Some(ObstacleKind::Cone));
        assert_eq!(w.select(1.0), Some(ObstacleKind::Cone));
    }

    #[test]
    fn zero_weight_kind_is_never_selected() {
        let w = KindWeights::new([(ObstacleKind::Bench, 0.0), (ObstacleKind::Cone, 1.0)]);
        assert_eq!(w.select(0.0), Some(ObstacleKind::Cone));
        assert_eq!(w.select(0.5), Some(ObstacleKind::Cone));
    }

    #[test]
    fn negative_weight_is_rejected() {
        let w = KindWeights::new([(Facade::Office, -1.0), (Facade::Tower, 2.0)]);
        assert!(matches!(
            w.validate("buildings.weights"),
            Err(ConfigError::Invalid { field: "buildings.weights", .. })
        ));
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let w = KindWeights::new([(Facade::Office, 0.0)]);
        assert!(w.validate("w").is_err());
    }

    #[test]
    fn inverted_gap_range_is_rejected() {
        let mut config = GameConfig::default();
        config.obstacles.max_gap = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "obstacles.max_gap", .. })
        ));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut config = GameConfig::default();
        config.obstacles.count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = GameConfig::from_yaml_str(
            "speed:\n  initial: 20.0\nobstacles:\n  recycle_weights:\n    cone: 1.0\n",
        )
        .unwrap();
        assert_eq!(config.speed.initial, 20.0);
        assert_eq!(config.speed.cap, 50.0);
        assert_eq!(config.obstacles.recycle_weights.get(ObstacleKind::Cone), 1.0);
        assert_eq!(config.obstacles.recycle_weights.get(ObstacleKind::Bench), 0.0);
        assert_eq!(config.obstacles.count, 50);
    }

    #[test]
    fn yaml_and_json_round_trip_defaults() {
        let config = GameConfig::default();
        let yaml = config.to_yaml_string().unwrap();
        assert_eq!(GameConfig::from_yaml_str(&yaml).unwrap(), config);
        let json = config.to_json_string().unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn invalid_json_values_fail_validation() {
        let err = GameConfig::from_json_str(r#"{"collision": {"threshold": -1.0}}"#).unwrap_err();
        assert!(err.to_string().contains("collision.threshold"));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "timing:\n  opening_grace: 1.0").unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.timing.opening_grace, 1.0);

        let bad = dir.path().join("scene.toml");
        std::fs::write(&bad, "").unwrap();
        assert!(matches!(
            GameConfig::load(&bad),
            Err(ConfigError::UnsupportedExtension(_))
        ));
    }
}

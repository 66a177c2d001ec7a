use serde::{Deserialize, Serialize};
use skate_common::{Facade, FrameInput, GameConfig, Lane, ObstacleKind, Side};

use crate::collision::{Collision, CollisionDetector};
use crate::generator::Generator;
use crate::officer::Officer;
use crate::player::PlayerController;
use crate::pool::{PoolSpec, RecyclePool};

/// Which pool a recycle event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolId {
    Obstacles,
    Buildings(Side),
}

/// A record of every notable state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Full reset requested by the player.
    Restarted { tick: u64 },
    LaneChanged { from: Lane, to: Lane },
    JumpStarted { at: f64 },
    /// A passed slot was sent to the back of its pool.
    Recycled { pool: PoolId, index: usize, depth: f32 },
    /// The skater was caught. Latched until restart.
    Collided(Collision),
    /// Presentation should show the final distance.
    GameOver { score: u64 },
}

/// Road and sidewalk texture offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scroll {
    pub road: f32,
    pub sidewalk: f32,
}

/// What one call to `GameState::update` did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    /// Gameplay seconds since the grace period ended (0 while gated).
    pub gameplay_time: f64,
    /// Gameplay delta of this frame (0 while gated).
    pub gameplay_dt: f32,
    /// Distance the world scrolled toward the camera.
    pub dz: f32,
    pub events: Vec<GameEvent>,
}

/// The whole simulation, owned by the frame loop.
///
/// Given the same config, seed and sequence of `(dt, input)` calls, two
/// states evolve identically (compare with `state_hash`).
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    seed: u64,
    generator: Generator,
    obstacles: RecyclePool<ObstacleKind>,
    buildings_left: RecyclePool<Facade>,
    buildings_right: RecyclePool<Facade>,
    player: PlayerController,
    officer: Officer,
    detector: CollisionDetector,
    speed: f32,
    /// Clocks and distance accumulate per frame, so they stay in `f64`.
    score: f64,
    collision: Option<Collision>,
    scroll: Scroll,
    tick: u64,
    time: f64,
    gameplay_time: f64,
    restarted_at: Option<f64>,
    event_log: Vec<GameEvent>,
}

impl GameState {
    /// `config` must have passed `GameConfig::validate`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut generator = Generator::with_seed(seed);
        let obstacles = RecyclePool::new(PoolSpec::obstacles(&config), &mut generator);
        let buildings_left = RecyclePool::new(PoolSpec::buildings(&config, Side::Left), &mut generator);
        let buildings_right =
            RecyclePool::new(PoolSpec::buildings(&config, Side::Right), &mut generator);
        let player = PlayerController::new(config.player.clone(), &config.jump);
        let officer = Officer::new(config.officer.clone());
        let detector = CollisionDetector::new(config.collision.threshold);
        let speed = config.speed.initial;
        Self {
            config,
            seed,
            generator,
            obstacles,
            buildings_left,
            buildings_right,
            player,
            officer,
            detector,
            speed,
            score: 0.0,
            collision: None,
            scroll: Scroll::default(),
            tick: 0,
            time: 0.0,
            gameplay_time: 0.0,
            restarted_at: None,
            event_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Wall-clock seconds since construction.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn gameplay_time(&self) -> f64 {
        self.gameplay_time
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Distance shown to the player, whole world units.
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn is_collided(&self) -> bool {
        self.collision.is_some()
    }

    pub fn collision(&self) -> Option<&Collision> {
        self.collision.as_ref()
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub fn obstacles(&self) -> &RecyclePool<ObstacleKind> {
        &self.obstacles
    }

    pub fn buildings(&self, side: Side) -> &RecyclePool<Facade> {
        match side {
            Side::Left => &self.buildings_left,
            Side::Right => &self.buildings_right,
        }
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn officer(&self) -> &Officer {
        &self.officer
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// True while the opening or post-restart grace period holds gameplay.
    pub fn in_grace(&self) -> bool {
        let (origin, grace) = self.grace_window();
        self.time - origin < grace
    }

    fn grace_window(&self) -> (f64, f64) {
        match self.restarted_at {
            Some(at) => (at, f64::from(self.config.timing.restart_grace)),
            None => (0.0, f64::from(self.config.timing.opening_grace)),
        }
    }

    /// Reset pools, player, officer, speed, score and the collision latch in
    /// one step. The restart grace period starts now.
    pub fn restart(&mut self) {
        self.obstacles.reseed(&mut self.generator);
        self.buildings_left.reseed(&mut self.generator);
        self.buildings_right.reseed(&mut self.generator);
        self.player.reset();
        self.officer.reset();
        self.speed = self.config.speed.initial;
        self.score = 0.0;
        self.collision = None;
        self.scroll = Scroll::default();
        self.gameplay_time = 0.0;
        self.restarted_at = Some(self.time);
        tracing::info!(tick = self.tick, "game restarted");
    }

    /// Advance one rendered frame of `dt` wall-clock seconds.
    pub fn update(&mut self, dt: f32, input: FrameInput) -> FrameReport {
        assert!(dt.is_finite() && dt >= 0.0, "frame delta must be finite and non-negative");
        let _span = tracing::trace_span!("frame_update", tick = self.tick).entered();

        self.tick += 1;
        self.time += f64::from(dt);
        let mut events = Vec::new();

        if input.restart {
            self.restart();
            events.push(GameEvent::Restarted { tick: self.tick });
        }

        let (gt, gdt) = if self.in_grace() {
            (0.0, 0.0)
        } else {
            let (origin, grace) = self.grace_window();
            (self.time - origin - grace, dt)
        };
        self.gameplay_time = gt;

        let dz = gdt * self.speed;
        self.ramp_speed(gdt);

        if !self.is_collided() && gt > 0.0 {
            self.player.tick(gt);
            self.apply_input(input, gt, &mut events);
        }

        self.obstacles.advance(dz);
        for r in self.obstacles.recycle_check(&mut self.generator) {
            events.push(GameEvent::Recycled {
                pool: PoolId::Obstacles,
                index: r.index,
                depth: r.depth,
            });
        }
        for side in [Side::Left, Side::Right] {
            let pool = match side {
                Side::Left => &mut self.buildings_left,
                Side::Right => &mut self.buildings_right,
            };
            pool.advance(dz);
            for r in pool.recycle_check(&mut self.generator) {
                events.push(GameEvent::Recycled {
                    pool: PoolId::Buildings(side),
                    index: r.index,
                    depth: r.depth,
                });
            }
        }
        self.officer.advance(dz);

        self.player.update(gt);

        if !self.is_collided() && gdt > 0.0 {
            let hit = self.detector.check(
                self.player.position(),
                self.obstacles.slots(),
                self.officer.position(),
            );
            if let Some(collision) = hit {
                self.collision = Some(collision);
                self.speed = 0.0;
                let score = self.display_score();
                tracing::info!(?collision, score, "collision, game over");
                events.push(GameEvent::Collided(collision));
                events.push(GameEvent::GameOver { score });
            }
        }

        if !self.is_collided() {
            self.score += f64::from(gdt * self.speed);
            let road = self.speed * gdt / self.config.ground.road_divisor;
            self.scroll.road += road;
            self.scroll.sidewalk += road * self.config.ground.sidewalk_factor;
        }

        self.event_log.extend(events.iter().cloned());
        FrameReport {
            tick: self.tick,
            gameplay_time: gt,
            gameplay_dt: gdt,
            dz,
            events,
        }
    }

    /// Per-frame ramp while ungated and still running.
    fn ramp_speed(&mut self, gdt: f32) {
        let cap = self.config.speed.cap;
        if gdt > 0.0 && !self.is_collided() && self.speed > 0.0 && self.speed < cap {
            self.speed = (self.speed + self.config.speed.ramp_per_frame).min(cap);
        }
    }

    fn apply_input(&mut self, input: FrameInput, now: f64, events: &mut Vec<GameEvent>) {
        let from = self.player.lane();
        if input.left && self.player.shift_left(now) {
            events.push(GameEvent::LaneChanged {
                from,
                to: self.player.lane(),
            });
        }
        let from = self.player.lane();
        if input.right && self.player.shift_right(now) {
            events.push(GameEvent::LaneChanged {
                from,
                to: self.player.lane(),
            });
        }
        if input.jump && self.player.start_jump(now) {
            events.push(GameEvent::JumpStarted { at: now });
        }
    }

    /// FNV-1a over the simulation state, for determinism checks.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.generator.rng().state().to_le_bytes());
        mix(&mut h, &self.speed.to_le_bytes());
        mix(&mut h, &self.score.to_le_bytes());
        mix(&mut h, &self.player.lane().offset().to_le_bytes());
        mix(&mut h, &self.player.pose().height.to_le_bytes());
        mix(&mut h, &[self.collision.is_some() as u8]);
        mix(&mut h, &self.officer.position().z.to_le_bytes());
        for slot in self.obstacles.slots() {
            mix(&mut h, &slot.x.to_le_bytes());
            mix(&mut h, &slot.depth.to_le_bytes());
            mix(&mut h, &[slot.kind as u8]);
        }
        for slot in self.buildings_left.slots().iter().chain(self.buildings_right.slots()) {
            mix(&mut h, &slot.depth.to_le_bytes());
            mix(&mut h, &[slot.kind as u8]);
        }
        h
    }

    #[cfg(test)]
    pub(crate) fn obstacles_mut(&mut self) -> &mut RecyclePool<ObstacleKind> {
        &mut self.obstacles
    }
}

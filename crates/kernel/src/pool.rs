//! Fixed-size circular pools of world objects scrolling toward the camera.
//!
//! Objects are never created or destroyed after construction. When a slot
//! passes the cutoff it is teleported behind its index predecessor, which is
//! the back of the queue as long as slots stay in index order.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use skate_common::{Facade, GameConfig, KindWeights, Lane, ObstacleKind, Side};

use crate::generator::Generator;

/// How a pool chooses the lateral position of a spawned object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// Uniformly random road lane, `lane * width`.
    Lanes { width: f32 },
    /// Constant x (a sidewalk row).
    Fixed { x: f32 },
}

/// Layout rules for one pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSpec<K: Ord> {
    pub count: usize,
    pub front_depth: f32,
    pub cutoff: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    pub height: f32,
    pub placement: Placement,
    pub opening_weights: KindWeights<K>,
    pub recycle_weights: KindWeights<K>,
}

impl PoolSpec<ObstacleKind> {
    pub fn obstacles(config: &GameConfig) -> Self {
        let c = &config.obstacles;
        Self {
            count: c.count,
            front_depth: c.front_depth,
            cutoff: c.cutoff,
            min_gap: c.min_gap,
            max_gap: c.max_gap,
            height: c.height,
            placement: Placement::Lanes {
                width: config.player.lane_width,
            },
            opening_weights: c.opening_weights.clone(),
            recycle_weights: c.recycle_weights.clone(),
        }
    }
}

impl PoolSpec<Facade> {
    pub fn buildings(config: &GameConfig, side: Side) -> Self {
        let c = &config.buildings;
        Self {
            count: c.count,
            front_depth: c.front_depth,
            cutoff: c.cutoff,
            min_gap: c.spacing,
            max_gap: c.spacing,
            height: c.height,
            placement: Placement::Fixed {
                x: side.sign() * c.lateral_offset,
            },
            opening_weights: c.weights.clone(),
            recycle_weights: c.weights.clone(),
        }
    }
}

/// One pool entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot<K> {
    /// Road lane for lane-placed pools.
    pub lane: Option<Lane>,
    pub x: f32,
    pub y: f32,
    /// Grows toward the camera; the player sits at depth 0.
    pub depth: f32,
    pub kind: K,
}

impl<K> Slot<K> {
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.depth)
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position())
    }
}

/// A slot that was sent to the back of the queue this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recycled<K> {
    pub index: usize,
    pub kind: K,
    pub lane: Option<Lane>,
    pub depth: f32,
}

#[derive(Debug, Clone)]
pub struct RecyclePool<K: Ord> {
    spec: PoolSpec<K>,
    slots: Vec<Slot<K>>,
}

impl<K: Ord + Copy + std::fmt::Debug> RecyclePool<K> {
    /// Build the opening layout.
    pub fn new(spec: PoolSpec<K>, generator: &mut Generator) -> Self {
        assert!(spec.count > 0, "pool must hold at least one slot");
        assert!(spec.min_gap > 0.0, "pool gap must be positive");
        assert!(spec.max_gap >= spec.min_gap, "pool gap range is inverted");

        let mut slots = Vec::with_capacity(spec.count);
        let mut depth = spec.front_depth;
        for _ in 0..spec.count {
            depth -= generator.pick_gap(spec.min_gap, spec.max_gap);
            let (lane, x) = place(spec.placement, generator);
            let kind = generator.pick_kind(&spec.opening_weights);
            slots.push(Slot {
                lane,
                x,
                y: spec.height,
                depth,
                kind,
            });
        }
        Self { spec, slots }
    }

    /// Lay every slot out again from the opening distribution, in place.
    pub fn reseed(&mut self, generator: &mut Generator) {
        let mut depth = self.spec.front_depth;
        for slot in &mut self.slots {
            depth -= generator.pick_gap(self.spec.min_gap, self.spec.max_gap);
            let (lane, x) = place(self.spec.placement, generator);
            *slot = Slot {
                lane,
                x,
                y: self.spec.height,
                depth,
                kind: generator.pick_kind(&self.spec.opening_weights),
            };
        }
    }

    /// Move every slot `dz` toward the camera.
    pub fn advance(&mut self, dz: f32) {
        for slot in &mut self.slots {
            slot.depth += dz;
        }
    }

    /// Respawn every slot past the cutoff behind its index predecessor.
    ///
    /// Runs after `advance`, so the predecessor depth already includes this
    /// frame's motion. When the predecessor is itself waiting to be recycled
    /// the anchor falls back to the furthest-back slot; the result is always
    /// strictly behind the cutoff.
    pub fn recycle_check(&mut self, generator: &mut Generator) -> Vec<Recycled<K>> {
        let mut recycled = Vec::new();
        let n = self.slots.len();
        for i in 0..n {
            if self.slots[i].depth <= self.spec.cutoff {
                continue;
            }
            let predecessor = self.slots[(i + n - 1) % n].depth;
            let anchor = if predecessor > self.spec.cutoff {
                self.back_depth()
            } else {
                predecessor
            }
            .min(self.spec.cutoff);

            let (lane, x) = place(self.spec.placement, generator);
            let kind = generator.pick_kind(&self.spec.recycle_weights);
            let depth = anchor - generator.pick_gap(self.spec.min_gap, self.spec.max_gap);
            self.slots[i] = Slot {
                lane,
                x,
                y: self.spec.height,
                depth,
                kind,
            };
            tracing::debug!(slot = i, ?kind, depth, "recycled");
            recycled.push(Recycled {
                index: i,
                kind,
                lane,
                depth,
            });
        }
        recycled
    }

    pub fn slots(&self) -> &[Slot<K>] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Slot<K>> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn spec(&self) -> &PoolSpec<K> {
        &self.spec
    }

    /// Depth of the furthest slot from the camera.
    pub fn back_depth(&self) -> f32 {
        self.slots.iter().map(|s| s.depth).fold(f32::INFINITY, f32::min)
    }

    /// Depth of the slot closest to the camera.
    pub fn front_depth(&self) -> f32 {
        self.slots
            .iter()
            .map(|s| s.depth)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    #[cfg(test)]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot<K> {
        &mut self.slots[index]
    }
}

fn place(placement: Placement, generator: &mut Generator) -> (Option<Lane>, f32) {
    match placement {
        Placement::Lanes { width } => {
            let lane = generator.pick_lane();
            (Some(lane), lane.x(width))
        }
        Placement::Fixed { x } => (None, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle_pool(seed: u64) -> (RecyclePool<ObstacleKind>, Generator) {
        let mut generator = Generator::with_seed(seed);
        let pool = RecyclePool::new(PoolSpec::obstacles(&GameConfig::default()), &mut generator);
        (pool, generator)
    }

    #[test]
    fn opening_layout_is_spaced_behind_front() {
        let (pool, _) = obstacle_pool(1);
        assert_eq!(pool.len(), 50);
        let mut previous = -100.0;
        for slot in pool.slots() {
            let gap = previous - slot.depth;
            assert!((10.0..15.0).contains(&gap), "gap {gap}");
            previous = slot.depth;
        }
    }

    #[test]
    fn obstacles_sit_on_lanes() {
        let (pool, _) = obstacle_pool(2);
        for slot in pool.slots() {
            let lane = slot.lane.unwrap();
            assert_eq!(slot.x, lane.x(4.0));
            assert_eq!(slot.y, 2.0);
        }
    }

    #[test]
    fn buildings_use_fixed_side_and_even_spacing() {
        let config = GameConfig::default();
        let mut generator = Generator::with_seed(3);
        let left = RecyclePool::new(PoolSpec::buildings(&config, Side::Left), &mut generator);
        let right = RecyclePool::new(PoolSpec::buildings(&config, Side::Right), &mut generator);
        assert!(left.slots().iter().all(|s| s.x == -18.5 && s.lane.is_none()));
        assert!(right.slots().iter().all(|s| s.x == 18.5));
        assert!((left.slots()[0].depth - -12.0).abs() < 1e-4);
        let d = left.slots()[0].depth - left.slots()[1].depth;
        assert!((d - 12.6).abs() < 1e-4);
    }

    #[test]
    fn advance_moves_every_slot() {
        let (mut pool, _) = obstacle_pool(4);
        let before: Vec<f32> = pool.slots().iter().map(|s| s.depth).collect();
        pool.advance(2.5);
        for (slot, old) in pool.slots().iter().zip(before) {
            assert_eq!(slot.depth, old + 2.5);
        }
    }

    #[test]
    fn nothing_recycles_before_cutoff() {
        let (mut pool, mut generator) = obstacle_pool(5);
        pool.advance(50.0);
        assert!(pool.recycle_check(&mut generator).is_empty());
    }

    #[test]
    fn passed_slot_moves_behind_predecessor() {
        let (mut pool, mut generator) = obstacle_pool(6);
        // Push the front slot just past the cutoff.
        let shift = 25.5 - pool.slots()[0].depth;
        pool.advance(shift);
        let back = pool.slots()[49].depth;
        let recycled = pool.recycle_check(&mut generator);
        assert_eq!(recycled.len(), 1);
        assert_eq!(recycled[0].index, 0);
        let gap = back - pool.slots()[0].depth;
        assert!((10.0..15.0).contains(&gap), "gap {gap}");
        assert_eq!(pool.back_depth(), pool.slots()[0].depth);
    }

    #[test]
    fn recycled_depth_is_behind_cutoff_for_any_seed() {
        for seed in 0..64 {
            let (mut pool, mut generator) = obstacle_pool(seed);
            for _ in 0..2_000 {
                pool.advance(0.8);
                for r in pool.recycle_check(&mut generator) {
                    assert!(r.depth < pool.spec().cutoff, "seed {seed}: {}", r.depth);
                }
            }
        }
    }

    #[test]
    fn huge_step_still_lands_behind_cutoff() {
        let (mut pool, mut generator) = obstacle_pool(8);
        // Every slot crosses the cutoff in a single step.
        pool.advance(1_000.0);
        let recycled = pool.recycle_check(&mut generator);
        assert_eq!(recycled.len(), 50);
        assert!(pool.slots().iter().all(|s| s.depth < 25.0));
    }

    #[test]
    fn single_slot_pool_recycles_behind_cutoff() {
        let mut spec = PoolSpec::obstacles(&GameConfig::default());
        spec.count = 1;
        let mut generator = Generator::with_seed(9);
        let mut pool = RecyclePool::new(spec, &mut generator);
        pool.advance(200.0);
        let recycled = pool.recycle_check(&mut generator);
        assert_eq!(recycled.len(), 1);
        assert!(recycled[0].depth < 25.0);
    }

    #[test]
    fn recycle_uses_recycle_weights() {
        let mut spec = PoolSpec::obstacles(&GameConfig::default());
        spec.recycle_weights = KindWeights::new([(ObstacleKind::Cone, 1.0)]);
        let mut generator = Generator::with_seed(10);
        let mut pool = RecyclePool::new(spec, &mut generator);
        pool.advance(1_000.0);
        pool.recycle_check(&mut generator);
        assert!(pool.slots().iter().all(|s| s.kind == ObstacleKind::Cone));
    }

    #[test]
    fn reseed_restores_opening_layout_rules() {
        let (mut pool, mut generator) = obstacle_pool(11);
        pool.advance(300.0);
        pool.recycle_check(&mut generator);
        pool.reseed(&mut generator);
        assert_eq!(pool.len(), 50);
        assert!(pool.front_depth() <= -110.0);
        assert!(pool.front_depth() > -115.0);
    }

    #[test]
    fn slot_transform_translation_matches_position() {
        let (pool, _) = obstacle_pool(12);
        let slot = pool.slots()[3];
        assert_eq!(skate_common::translation_of(&slot.transform()), slot.position());
    }
}

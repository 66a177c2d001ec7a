use skate_common::{KindWeights, Lane};

use crate::rng::SpawnRng;

/// Randomized lane, kind and spacing decisions for spawned world objects.
///
/// All draws come from one injected `SpawnRng`, so pools built from the same
/// seed lay out identically.
#[derive(Debug, Clone)]
pub struct Generator {
    rng: SpawnRng,
}

impl Generator {
    pub fn new(rng: SpawnRng) -> Self {
        Self { rng }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(SpawnRng::new(seed))
    }

    pub fn rng(&self) -> &SpawnRng {
        &self.rng
    }

    /// Uniform choice among the three lanes.
    pub fn pick_lane(&mut self) -> Lane {
        Lane::ALL[self.rng.index(Lane::ALL.len())]
    }

    /// Draw a kind from a validated distribution.
    pub fn pick_kind<K: Ord + Copy>(&mut self, weights: &KindWeights<K>) -> K {
        let unit = self.rng.next_f32();
        match weights.select(unit) {
            Some(kind) => kind,
            None => panic!("kind weights must contain a positive entry"),
        }
    }

    /// Spacing to the object in front, in [min, max).
    pub fn pick_gap(&mut self, min: f32, max: f32) -> f32 {
        self.rng.range(min, max)
    }
}

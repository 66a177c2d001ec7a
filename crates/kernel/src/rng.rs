use serde::{Deserialize, Serialize};

/// Seedable pseudo-random source for spawn decisions.
///
/// Splitmix64 keeps the sequence identical across platforms, so a seed plus an
/// input timeline fully determines a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Current internal state (the seed of the next draw).
    pub fn state(&self) -> u64 {
        self.state
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1). Uses the top 24 bits so every value is exact in f32.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in [min, max); returns `min` when the range is empty.
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in [0, n). `n` must be non-zero.
    pub fn index(&mut self, n: usize) -> usize {
        assert!(n > 0, "index range must be non-empty");
        (self.next_u64() % n as u64) as usize
    }
}

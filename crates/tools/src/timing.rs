use std::time::Duration;

/// Rolling window of frame durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: Vec<Duration>,
    capacity: usize,
    next: usize,
    total: u64,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "frame timer needs at least one sample slot");
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            next: 0,
            total: 0,
        }
    }

    pub fn record(&mut self, frame: Duration) {
        if self.samples.len() < self.capacity {
            self.samples.push(frame);
        } else {
            self.samples[self.next] = frame;
        }
        self.next = (self.next + 1) % self.capacity;
        self.total += 1;
        tracing::trace!(?frame, "frame timed");
    }

    /// Frames recorded over the timer's lifetime, not just the window.
    pub fn count(&self) -> u64 {
        self.total
    }

    pub fn average(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: Duration = self.samples.iter().sum();
        Some(sum / self.samples.len() as u32)
    }

    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().min().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}

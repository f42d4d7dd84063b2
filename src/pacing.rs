use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;

/// Pause inserted between consecutive inputs so the game UI can settle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    pub base_ms: u64,
    /// Standard deviation of the normal jitter around `base_ms`.
    pub jitter_ms: u64,
    /// Floor for a sampled pause.
    pub min_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            base_ms: 200,
            jitter_ms: 30,
            min_ms: 120,
        }
    }
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            base_ms: 0,
            jitter_ms: 0,
            min_ms: 0,
        }
    }

    pub fn fixed(ms: u64) -> Self {
        Self {
            base_ms: ms,
            jitter_ms: 0,
            min_ms: ms,
        }
    }

    pub fn sample(&self) -> Duration {
        if self.jitter_ms == 0 {
            return Duration::from_millis(self.base_ms.max(self.min_ms));
        }
        let ms = match Normal::new(self.base_ms as f64, self.jitter_ms as f64) {
            Ok(dist) => dist.sample(&mut rand::thread_rng()).max(self.min_ms as f64) as u64,
            Err(_) => self.base_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn pause(&self) {
        let d = self.sample();
        if !d.is_zero() {
            thread::sleep(d);
        }
    }
}

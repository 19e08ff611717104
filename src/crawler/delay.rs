//! Randomized politeness delay applied before every fetch

use crate::config::FetcherConfig;
use rand::Rng;
use std::time::Duration;

/// Uniformly distributed pause between two inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomDelay {
    min_ms: u64,
    max_ms: u64,
}

impl RandomDelay {
    /// Creates a delay sampled from `[min_ms, max_ms]`
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: min_ms.max(max_ms),
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Lower bound
    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    /// Upper bound
    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }

    /// Draws the next pause length
    pub fn sample(&self) -> Duration {
        let millis = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(millis)
    }

    /// Sleeps for a freshly sampled pause and returns its length
    pub async fn wait(&self) -> Duration {
        let pause = self.sample();
        if !pause.is_zero() {
            tracing::trace!("Sleeping {:?} before request", pause);
            tokio::time::sleep(pause).await;
        }
        pause
    }
}

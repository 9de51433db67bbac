//! Randomized politeness pauses between requests

use super::CancelSignal;
use crate::config::CrawlerConfig;
use rand::Rng;
use std::time::Duration;

/// Bounds of the random pause taken between listing pages and task launches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Politeness {
    min: Duration,
    max: Duration,
}

impl Politeness {
    /// Creates a pause range; the bounds are swapped if given in reverse
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.min_pause),
            Duration::from_millis(config.max_pause),
        )
    }

    /// Picks a pause uniformly within the range
    pub fn interval(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..=self.max)
    }

    /// Sleeps for a random interval, waking early on cancellation
    ///
    /// Returns false when the run was cancelled before or during the pause.
    pub async fn pause(&self, cancel: &CancelSignal) -> bool {
        let delay = self.interval();
        if delay.is_zero() {
            return !cancel.is_active();
        }

        tokio::select! {
            _ = tokio::time::sleep(delay) => !cancel.is_active(),
            _ = cancel.cancelled() => false,
        }
    }
}

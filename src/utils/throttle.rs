//! Request pacing.
//!
//! Traversals pause for a fixed delay after each fetch so that walking a
//! work's neighbours stays well under OpenAlex's rate limits. The pause goes
//! through [`Throttle`] so tests can observe delays without sleeping.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::trace;

/// Something that can wait for a given delay
#[async_trait]
pub trait Throttle: Send + Sync + std::fmt::Debug {
    async fn pause(&self, delay: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepThrottle;

#[async_trait]
impl Throttle for SleepThrottle {
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            return;
        }
        trace!(delay_ms = delay.as_millis() as u64, "throttling");
        tokio::time::sleep(delay).await;
    }
}

/// Records requested pauses and returns immediately
#[derive(Debug, Default)]
pub struct RecordingThrottle {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses requested so far, in order
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    /// Sum of all requested pauses
    pub fn total(&self) -> Duration {
        self.pauses.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Throttle for RecordingThrottle {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_throttle_waits() {
        let start = tokio::time::Instant::now();
        SleepThrottle.pause(Duration::from_millis(200)).await;
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[test]
    fn test_recording_throttle() {
        let throttle = RecordingThrottle::new();
        tokio_test::block_on(async {
            throttle.pause(Duration::from_millis(101)).await;
            throttle.pause(Duration::from_millis(200)).await;
        });
        assert_eq!(
            throttle.pauses(),
            vec![Duration::from_millis(101), Duration::from_millis(200)]
        );
        assert_eq!(throttle.total(), Duration::from_millis(301));
    }
}

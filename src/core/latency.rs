use crate::domain::ports::LatencyPolicy;
use async_trait::async_trait;
use std::time::Duration;

/// Delay of the reference inference call.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl LatencyPolicy for FixedDelay {
    async fn wait(&self) {
        tracing::debug!("⏳ Simulating inference latency of {:?}", self.0);
        tokio::time::sleep(self.0).await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait]
impl LatencyPolicy for NoDelay {
    async fn wait(&self) {}
}

/// `NoDelay` for zero, `FixedDelay` otherwise.
pub fn from_millis(ms: u64) -> std::sync::Arc<dyn LatencyPolicy> {
    if ms == 0 {
        std::sync::Arc::new(NoDelay)
    } else {
        std::sync::Arc::new(FixedDelay(Duration::from_millis(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits_full_duration() {
        let start = tokio::time::Instant::now();
        FixedDelay::default().wait().await;
        assert!(start.elapsed() >= DEFAULT_LATENCY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_returns_immediately() {
        let start = tokio::time::Instant::now();
        from_millis(0).wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}

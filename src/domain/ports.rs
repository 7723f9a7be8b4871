use crate::domain::settings::{ConfidenceConfig, RecommendationsConfig, ScoringConfig};
use crate::domain::model::WeatherObservation;
use async_trait::async_trait;

/// Maps a validated observation to a clamped, rounded FWI score.
pub trait ScoreCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn compute_fwi(&self, obs: &WeatherObservation) -> f64;
}

/// Produces a confidence value in [0, 1] for a finished score.
///
/// Policies may ignore their arguments (the reference policy is a random draw).
pub trait ConfidenceEstimator: Send + Sync {
    fn name(&self) -> &str;
    fn estimate(&self, obs: &WeatherObservation, fwi: f64) -> f64;
}

/// Simulated or real inference latency awaited before scoring.
#[async_trait]
pub trait LatencyPolicy: Send + Sync {
    async fn wait(&self);
}

/// Source of engine settings (CLI flags, TOML file, ...).
pub trait ConfigProvider: Send + Sync {
    fn latency_ms(&self) -> u64;
    fn confidence(&self) -> ConfidenceConfig;
    fn scoring(&self) -> ScoringConfig;
    fn recommendations(&self) -> Option<RecommendationsConfig>;
}

use crate::core::classifier::classify;
use crate::core::confidence::{self, RandomConfidence};
use crate::core::latency::{self, FixedDelay};
use crate::core::recommendations::RecommendationTable;
use crate::core::score::{self, PlaceholderScore};
use crate::core::validator::{self, ValidationErrors, ValidationResult};
use crate::domain::model::{FirePrediction, RawObservation, WeatherObservation};
use crate::domain::ports::{ConfidenceEstimator, ConfigProvider, LatencyPolicy, ScoreCalculator};
use crate::utils::error::{FwiError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Validates a raw submission and turns it into a [`FirePrediction`].
///
/// Every component sits behind a port, so a clone of the engine can be handed to each
/// concurrent request and the scoring, confidence and latency policies can be swapped
/// without touching the rest of the flow.
#[derive(Clone)]
pub struct PredictionEngine {
    scorer: Arc<dyn ScoreCalculator>,
    confidence: Arc<dyn ConfidenceEstimator>,
    latency: Arc<dyn LatencyPolicy>,
    recommendations: Arc<RecommendationTable>,
}

impl PredictionEngine {
    /// Reference behaviour: placeholder formula, random confidence, two second latency.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> PredictionEngineBuilder {
        PredictionEngineBuilder::default()
    }

    pub fn from_provider<C: ConfigProvider>(config: &C) -> Result<Self> {
        let recommendations = match config.recommendations() {
            Some(section) => RecommendationTable::from_config(&section)?,
            None => RecommendationTable::default(),
        };

        let engine = Self {
            scorer: score::from_config(&config.scoring())?,
            confidence: confidence::from_config(&config.confidence())?,
            latency: latency::from_millis(config.latency_ms()),
            recommendations: Arc::new(recommendations),
        };

        tracing::debug!(
            "Engine configured: scorer={}, confidence={}, latency={}ms",
            engine.scorer.name(),
            engine.confidence.name(),
            config.latency_ms()
        );
        Ok(engine)
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub fn confidence_name(&self) -> &str {
        self.confidence.name()
    }

    pub fn validate(&self, raw: &RawObservation) -> ValidationResult {
        validator::validate(raw)
    }

    /// Scores an already validated observation. Deterministic apart from the confidence policy.
    pub fn evaluate(&self, obs: &WeatherObservation) -> FirePrediction {
        let fwi = self.scorer.compute_fwi(obs);
        let risk_level = classify(fwi);

        let estimated = self.confidence.estimate(obs, fwi);
        let confidence = if estimated.is_nan() {
            tracing::warn!("Confidence policy '{}' returned NaN", self.confidence.name());
            0.0
        } else {
            estimated.clamp(0.0, 1.0)
        };

        let recommendations = self.recommendations.for_level(risk_level).to_vec();

        FirePrediction::new(fwi, risk_level, confidence, recommendations)
    }

    /// Validate, await the latency policy, then score. Invalid input returns at once.
    pub async fn predict(
        &self,
        raw: &RawObservation,
    ) -> std::result::Result<FirePrediction, ValidationErrors> {
        let obs = self.validate_logged(raw)?;

        self.latency.wait().await;

        let prediction = self.evaluate(&obs);
        self.log_prediction(&prediction);
        Ok(prediction)
    }

    /// Like [`predict`](Self::predict), but gives up with [`FwiError::Cancelled`] once
    /// `cancel` fires. A cancelled call never yields a partial prediction.
    pub async fn predict_until(
        &self,
        raw: &RawObservation,
        cancel: &CancellationToken,
    ) -> Result<FirePrediction> {
        let obs = self.validate_logged(raw)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("🛑 Prediction superseded before completion");
                Err(FwiError::Cancelled)
            }
            _ = self.latency.wait() => {
                let prediction = self.evaluate(&obs);
                self.log_prediction(&prediction);
                Ok(prediction)
            }
        }
    }

    /// Like [`predict`](Self::predict), bounded by `timeout`.
    pub async fn predict_within(
        &self,
        raw: &RawObservation,
        timeout: Duration,
    ) -> Result<FirePrediction> {
        match tokio::time::timeout(timeout, self.predict(raw)).await {
            Ok(outcome) => Ok(outcome?),
            Err(_) => {
                tracing::warn!("⏰ Prediction timed out after {:?}", timeout);
                Err(FwiError::TimedOut { after: timeout })
            }
        }
    }

    fn validate_logged(&self, raw: &RawObservation) -> ValidationResult {
        validator::validate(raw).inspect_err(|errors| {
            tracing::warn!(
                "❌ Observation rejected: {} invalid field(s): {}",
                errors.len(),
                errors.field_keys().join(", ")
            );
        })
    }

    fn log_prediction(&self, prediction: &FirePrediction) {
        tracing::info!(
            "🔥 FWI {:.2} → {} risk (confidence {})",
            prediction.fwi(),
            prediction.risk_level(),
            prediction.confidence_percent()
        );
    }
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("scorer", &self.scorer.name())
            .field("confidence", &self.confidence.name())
            .field("recommendations", &self.recommendations)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct PredictionEngineBuilder {
    scorer: Option<Arc<dyn ScoreCalculator>>,
    confidence: Option<Arc<dyn ConfidenceEstimator>>,
    latency: Option<Arc<dyn LatencyPolicy>>,
    recommendations: Option<RecommendationTable>,
}

impl PredictionEngineBuilder {
    pub fn scorer(mut self, scorer: impl ScoreCalculator + 'static) -> Self {
        self.scorer = Some(Arc::new(scorer));
        self
    }

    pub fn confidence(mut self, confidence: impl ConfidenceEstimator + 'static) -> Self {
        self.confidence = Some(Arc::new(confidence));
        self
    }

    pub fn latency(mut self, latency: impl LatencyPolicy + 'static) -> Self {
        self.latency = Some(Arc::new(latency));
        self
    }

    pub fn recommendations(mut self, table: RecommendationTable) -> Self {
        self.recommendations = Some(table);
        self
    }

    pub fn build(self) -> PredictionEngine {
        PredictionEngine {
            scorer: self
                .scorer
                .unwrap_or_else(|| Arc::new(PlaceholderScore::default())),
            confidence: self
                .confidence
                .unwrap_or_else(|| Arc::new(RandomConfidence::default())),
            latency: self
                .latency
                .unwrap_or_else(|| Arc::new(FixedDelay::default())),
            recommendations: Arc::new(self.recommendations.unwrap_or_default()),
        }
    }
}

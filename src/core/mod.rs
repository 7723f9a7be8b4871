pub mod classifier;
pub mod confidence;
pub mod engine;
pub mod latency;
pub mod recommendations;
pub mod score;
pub mod validator;

pub use crate::domain::model::{Field, FirePrediction, RawObservation, RiskLevel, WeatherObservation};
pub use crate::domain::ports::{ConfidenceEstimator, ConfigProvider, LatencyPolicy, ScoreCalculator};
pub use crate::utils::error::Result;

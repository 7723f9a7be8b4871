use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Plain settings shared by every ConfigProvider; the engine components are built from these.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidencePolicy {
    #[default]
    Random,
    Fixed,
    Boundary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    #[serde(default)]
    pub policy: ConfidencePolicy,
    /// random: lower bound (inclusive)
    pub min: Option<f64>,
    /// random: upper bound (exclusive)
    pub max: Option<f64>,
    /// fixed: the value returned
    pub value: Option<f64>,
    /// boundary: confidence right on a tier threshold
    pub floor: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    #[default]
    Placeholder,
    Linear,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub policy: ScoringPolicy,
    pub linear: Option<LinearModelConfig>,
}

/// Exported regression: `intercept + Σ coef * (x - mean) / scale`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearModelConfig {
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub coefficients: HashMap<String, f64>,
    #[serde(default)]
    pub means: HashMap<String, f64>,
    #[serde(default)]
    pub scales: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    pub low: Option<Vec<String>>,
    pub moderate: Option<Vec<String>>,
    pub high: Option<Vec<String>>,
    pub extreme: Option<Vec<String>>,
}

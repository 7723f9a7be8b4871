use crate::domain::settings::{LinearModelConfig, ScoringConfig, ScoringPolicy};
use crate::domain::model::{Field, WeatherObservation, FIELD_COUNT};
use crate::domain::ports::ScoreCalculator;
use crate::utils::error::{FwiError, Result};
use std::collections::HashMap;
use std::sync::Arc;

pub const FWI_MIN: f64 = 0.0;
pub const FWI_MAX: f64 = 50.0;

/// Clamps to [0, 50] and rounds to two decimals. The rounded value is canonical downstream.
pub fn finalize_fwi(raw: f64) -> f64 {
    if raw.is_nan() {
        return FWI_MIN;
    }
    round_to_hundredths(raw.clamp(FWI_MIN, FWI_MAX))
}

/// Rounds the exact decimal value of a non-negative double, ties upward.
///
/// Scaling by 100 first would round the product instead (14.99499... becomes 15.0).
fn round_to_hundredths(value: f64) -> f64 {
    // An exact tie needs an odd multiple of 1/8; `{:.2}` would send it to even.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        return (value * 100.0).ceil() / 100.0;
    }
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Weights of the placeholder linear formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub temperature: f64,
    pub wind_speed: f64,
    pub ffmc: f64,
    pub dmc: f64,
    pub isi: f64,
    pub relative_humidity: f64,
    pub rainfall: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            wind_speed: 0.4,
            ffmc: 0.1,
            dmc: 0.2,
            isi: 0.5,
            relative_humidity: -0.1,
            rainfall: -2.0,
        }
    }
}

/// Fixed weighted sum of the weather and fuel-moisture inputs.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderScore {
    weights: ScoreWeights,
}

impl PlaceholderScore {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn raw_score(&self, obs: &WeatherObservation) -> f64 {
        let w = &self.weights;
        w.temperature * obs.temperature
            + w.wind_speed * obs.wind_speed
            + w.ffmc * obs.ffmc
            + w.dmc * obs.dmc
            + w.isi * obs.isi
            + w.relative_humidity * obs.relative_humidity
            + w.rainfall * obs.rainfall
    }
}

impl ScoreCalculator for PlaceholderScore {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn compute_fwi(&self, obs: &WeatherObservation) -> f64 {
        finalize_fwi(self.raw_score(obs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FeatureTerm {
    coefficient: f64,
    mean: f64,
    scale: f64,
}

/// Standardise-then-regress model over all nine inputs, e.g. an exported ridge regression.
#[derive(Debug, Clone)]
pub struct LinearModelScore {
    intercept: f64,
    terms: [FeatureTerm; FIELD_COUNT],
}

impl LinearModelScore {
    pub fn from_config(config: &LinearModelConfig) -> Result<Self> {
        let mut terms = [FeatureTerm {
            coefficient: 0.0,
            mean: 0.0,
            scale: 1.0,
        }; FIELD_COUNT];

        check_keys("scoring.linear.coefficients", &config.coefficients)?;
        check_keys("scoring.linear.means", &config.means)?;
        check_keys("scoring.linear.scales", &config.scales)?;

        for (index, field) in Field::ALL.into_iter().enumerate() {
            let term = &mut terms[index];
            if let Some(value) = find(&config.coefficients, field) {
                term.coefficient = value;
            }
            if let Some(value) = find(&config.means, field) {
                term.mean = value;
            }
            if let Some(value) = find(&config.scales, field) {
                if value == 0.0 || !value.is_finite() {
                    return Err(FwiError::InvalidConfigValueError {
                        field: format!("scoring.linear.scales.{}", field.key()),
                        value: value.to_string(),
                        reason: "Scale must be a non-zero finite number".to_string(),
                    });
                }
                term.scale = value;
            }
        }

        Ok(Self {
            intercept: config.intercept,
            terms,
        })
    }

    pub fn raw_score(&self, obs: &WeatherObservation) -> f64 {
        Field::ALL
            .into_iter()
            .zip(self.terms.iter())
            .fold(self.intercept, |acc, (field, term)| {
                acc + term.coefficient * (obs.get(field) - term.mean) / term.scale
            })
    }
}

fn find(values: &HashMap<String, f64>, field: Field) -> Option<f64> {
    values
        .get(field.key())
        .or_else(|| values.get(field.alias()))
        .copied()
}

fn check_keys(section: &str, values: &HashMap<String, f64>) -> Result<()> {
    for (key, value) in values {
        if Field::from_key(key).is_none() {
            return Err(FwiError::InvalidConfigValueError {
                field: section.to_string(),
                value: key.clone(),
                reason: "Unknown observation field".to_string(),
            });
        }
        crate::utils::validation::validate_finite(&format!("{}.{}", section, key), *value)?;
    }
    Ok(())
}

impl ScoreCalculator for LinearModelScore {
    fn name(&self) -> &str {
        "linear"
    }

    fn compute_fwi(&self, obs: &WeatherObservation) -> f64 {
        finalize_fwi(self.raw_score(obs))
    }
}

/// Builds the configured scorer. The linear policy needs a `[scoring.linear]` section.
pub fn from_config(config: &ScoringConfig) -> Result<Arc<dyn ScoreCalculator>> {
    let scorer: Arc<dyn ScoreCalculator> = match config.policy {
        ScoringPolicy::Placeholder => Arc::new(PlaceholderScore::default()),
        ScoringPolicy::Linear => {
            let linear = config
                .linear
                .as_ref()
                .ok_or_else(|| FwiError::MissingConfigError {
                    field: "scoring.linear".to_string(),
                })?;
            Arc::new(LinearModelScore::from_config(linear)?)
        }
    };
    Ok(scorer)
}

use crate::domain::settings::{ConfidenceConfig, ConfidencePolicy};
use crate::core::classifier::distance_to_boundary;
use crate::domain::model::WeatherObservation;
use crate::domain::ports::ConfidenceEstimator;
use crate::utils::error::{FwiError, Result};
use rand::Rng;
use std::sync::Arc;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_MAX_CONFIDENCE: f64 = 1.0;

/// Uniform draw from `[min, max)`, independent of the observation.
#[derive(Debug, Clone, Copy)]
pub struct RandomConfidence {
    min: f64,
    max: f64,
}

impl RandomConfidence {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min >= max {
            return Err(FwiError::InvalidConfigValueError {
                field: "confidence".to_string(),
                value: format!("[{}, {})", min, max),
                reason: "Bounds must satisfy 0 <= min < max <= 1".to_string(),
            });
        }
        Ok(Self { min, max })
    }
}

impl Default for RandomConfidence {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_CONFIDENCE,
            max: DEFAULT_MAX_CONFIDENCE,
        }
    }
}

impl ConfidenceEstimator for RandomConfidence {
    fn name(&self) -> &str {
        "random"
    }

    fn estimate(&self, _obs: &WeatherObservation, _fwi: f64) -> f64 {
        rand::rng().random_range(self.min..self.max)
    }
}

/// Always the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(f64);

impl FixedConfidence {
    pub fn new(value: f64) -> Result<Self> {
        crate::utils::validation::validate_range("confidence.value", value, 0.0, 1.0)?;
        Ok(Self(value))
    }
}

impl ConfidenceEstimator for FixedConfidence {
    fn name(&self) -> &str {
        "fixed"
    }

    fn estimate(&self, _obs: &WeatherObservation, _fwi: f64) -> f64 {
        self.0
    }
}

/// Scores sitting on a tier boundary get `floor`; five or more units away get 1.0.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryConfidence {
    floor: f64,
}

impl BoundaryConfidence {
    const FULL_CONFIDENCE_DISTANCE: f64 = 5.0;

    pub fn new(floor: f64) -> Result<Self> {
        crate::utils::validation::validate_range("confidence.floor", floor, 0.0, 1.0)?;
        Ok(Self { floor })
    }
}

impl ConfidenceEstimator for BoundaryConfidence {
    fn name(&self) -> &str {
        "boundary"
    }

    fn estimate(&self, _obs: &WeatherObservation, fwi: f64) -> f64 {
        let ratio = (distance_to_boundary(fwi) / Self::FULL_CONFIDENCE_DISTANCE).min(1.0);
        self.floor + (1.0 - self.floor) * ratio
    }
}

/// Builds the configured policy.
pub fn from_config(config: &ConfidenceConfig) -> Result<Arc<dyn ConfidenceEstimator>> {
    let estimator: Arc<dyn ConfidenceEstimator> = match config.policy {
        ConfidencePolicy::Random => Arc::new(RandomConfidence::new(
            config.min.unwrap_or(DEFAULT_MIN_CONFIDENCE),
            config.max.unwrap_or(DEFAULT_MAX_CONFIDENCE),
        )?),
        ConfidencePolicy::Fixed => {
            let value = config.value.ok_or_else(|| FwiError::MissingConfigError {
                field: "confidence.value".to_string(),
            })?;
            Arc::new(FixedConfidence::new(value)?)
        }
        ConfidencePolicy::Boundary => {
            Arc::new(BoundaryConfidence::new(config.floor.unwrap_or(DEFAULT_MIN_CONFIDENCE))?)
        }
    };
    Ok(estimator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn observation() -> WeatherObservation {
        WeatherObservation {
            temperature: 25.0,
            relative_humidity: 65.0,
            wind_speed: 15.0,
            rainfall: 0.0,
            ffmc: 85.0,
            dmc: 25.0,
            isi: 5.0,
            fire_class: 3.0,
            region_code: 1.0,
        }
    }

    #[test]
    fn test_random_confidence_stays_in_default_band() {
        let estimator = RandomConfidence::default();
        for _ in 0..1000 {
            let value = estimator.estimate(&observation(), 23.0);
            assert!((0.8..1.0).contains(&value), "{}", value);
        }
    }

    #[test]
    fn test_random_confidence_rejects_bad_bounds() {
        assert!(RandomConfidence::new(0.9, 0.9).is_err());
        assert!(RandomConfidence::new(0.5, 1.5).is_err());
        assert!(RandomConfidence::new(-0.1, 0.5).is_err());
        assert!(RandomConfidence::new(0.5, 0.7).is_ok());
    }

    #[test]
    fn test_from_config_selects_policy() {
        let config = ConfidenceConfig {
            policy: ConfidencePolicy::Boundary,
            floor: Some(0.5),
            ..Default::default()
        };
        let estimator = from_config(&config).unwrap();
        assert_eq!(estimator.name(), "boundary");
        assert_abs_diff_eq!(estimator.estimate(&observation(), 30.0), 0.5, epsilon = 1e-9);

        assert_eq!(from_config(&ConfidenceConfig::default()).unwrap().name(), "random");
    }

    #[test]
    fn test_fixed_confidence() {
        let estimator = FixedConfidence::new(0.85).unwrap();
        assert_eq!(estimator.estimate(&observation(), 0.0), 0.85);
        assert!(FixedConfidence::new(1.01).is_err());
    }

    #[test]
    fn test_boundary_confidence_grows_away_from_thresholds() {
        let estimator = BoundaryConfidence::new(0.6).unwrap();
        assert_abs_diff_eq!(estimator.estimate(&observation(), 15.0), 0.6, epsilon = 1e-9);
        assert_abs_diff_eq!(estimator.estimate(&observation(), 17.5), 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(estimator.estimate(&observation(), 23.0), 1.0, epsilon = 1e-9);
    }
}

use crate::domain::settings::RecommendationsConfig;
use crate::domain::model::RiskLevel;
use crate::utils::error::Result;
use crate::utils::validation::Validate;

const LOW: [&str; 3] = [
    "Normal fire safety precautions apply",
    "Outdoor activities can proceed as planned",
    "Monitor weather conditions regularly",
];

const MODERATE: [&str; 3] = [
    "Increased awareness of fire conditions",
    "Avoid outdoor burning activities",
    "Keep fire suppression equipment nearby",
];

const HIGH: [&str; 3] = [
    "Exercise extreme caution with fire",
    "Postpone non-essential outdoor burning",
    "Have emergency evacuation plans ready",
];

const EXTREME: [&str; 3] = [
    "No outdoor burning permitted",
    "Prepare for potential evacuations",
    "Monitor emergency broadcasts closely",
];

/// Built-in advisories for a risk tier.
pub fn recommendations_for(level: RiskLevel) -> [&'static str; 3] {
    match level {
        RiskLevel::Low => LOW,
        RiskLevel::Moderate => MODERATE,
        RiskLevel::High => HIGH,
        RiskLevel::Extreme => EXTREME,
    }
}

/// Advisory lists per tier. Defaults to the built-in corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationTable {
    low: Vec<String>,
    moderate: Vec<String>,
    high: Vec<String>,
    extreme: Vec<String>,
}

fn owned(items: [&str; 3]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RecommendationTable {
    fn default() -> Self {
        Self {
            low: owned(LOW),
            moderate: owned(MODERATE),
            high: owned(HIGH),
            extreme: owned(EXTREME),
        }
    }
}

impl RecommendationTable {
    /// Sections left out of the configuration keep their built-in lists.
    pub fn from_config(config: &RecommendationsConfig) -> Result<Self> {
        config.validate()?;

        let defaults = Self::default();
        Ok(Self {
            low: config.low.clone().unwrap_or(defaults.low),
            moderate: config.moderate.clone().unwrap_or(defaults.moderate),
            high: config.high.clone().unwrap_or(defaults.high),
            extreme: config.extreme.clone().unwrap_or(defaults.extreme),
        })
    }

    pub fn for_level(&self, level: RiskLevel) -> &[String] {
        match level {
            RiskLevel::Low => &self.low,
            RiskLevel::Moderate => &self.moderate,
            RiskLevel::High => &self.high,
            RiskLevel::Extreme => &self.extreme,
        }
    }
}

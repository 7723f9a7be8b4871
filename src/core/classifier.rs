use crate::domain::model::RiskLevel;

/// Lower edges of the Moderate, High and Extreme tiers.
pub const MODERATE_THRESHOLD: f64 = 5.0;
pub const HIGH_THRESHOLD: f64 = 15.0;
pub const EXTREME_THRESHOLD: f64 = 30.0;

pub const THRESHOLDS: [f64; 3] = [MODERATE_THRESHOLD, HIGH_THRESHOLD, EXTREME_THRESHOLD];

/// Half-open tiers: `[0,5)` Low, `[5,15)` Moderate, `[15,30)` High, `[30,∞)` Extreme.
///
/// Expects the rounded FWI so the displayed score and its tier always agree.
pub fn classify(fwi: f64) -> RiskLevel {
    if fwi < MODERATE_THRESHOLD {
        RiskLevel::Low
    } else if fwi < HIGH_THRESHOLD {
        RiskLevel::Moderate
    } else if fwi < EXTREME_THRESHOLD {
        RiskLevel::High
    } else {
        RiskLevel::Extreme
    }
}

/// Distance from `fwi` to the nearest tier boundary.
pub fn distance_to_boundary(fwi: f64) -> f64 {
    THRESHOLDS
        .iter()
        .map(|threshold| (fwi - threshold).abs())
        .fold(f64::INFINITY, f64::min)
}

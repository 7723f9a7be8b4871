use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 表單送出的原始欄位值 (鍵為欄位名稱或別名，值為使用者輸入的文字)
pub type RawObservation = HashMap<String, String>;

pub const FIELD_COUNT: usize = 9;

/// The nine observation fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Temperature,
    RelativeHumidity,
    WindSpeed,
    Rainfall,
    Ffmc,
    Dmc,
    Isi,
    FireClass,
    RegionCode,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Temperature,
        Field::RelativeHumidity,
        Field::WindSpeed,
        Field::Rainfall,
        Field::Ffmc,
        Field::Dmc,
        Field::Isi,
        Field::FireClass,
        Field::RegionCode,
    ];

    /// Canonical key used in requests, responses and error maps.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::RelativeHumidity => "relativeHumidity",
            Field::WindSpeed => "windSpeed",
            Field::Rainfall => "rainfall",
            Field::Ffmc => "ffmc",
            Field::Dmc => "dmc",
            Field::Isi => "isi",
            Field::FireClass => "fireClass",
            Field::RegionCode => "regionCode",
        }
    }

    /// Short column name from the training dataset and the legacy form.
    pub fn alias(&self) -> &'static str {
        match self {
            Field::Temperature => "Temperature",
            Field::RelativeHumidity => "RH",
            Field::WindSpeed => "Ws",
            Field::Rainfall => "Rain",
            Field::Ffmc => "FFMC",
            Field::Dmc => "DMC",
            Field::Isi => "ISI",
            Field::FireClass => "Classes",
            Field::RegionCode => "Region",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Temperature => "Temperature (°C)",
            Field::RelativeHumidity => "Relative Humidity (%)",
            Field::WindSpeed => "Wind Speed (km/h)",
            Field::Rainfall => "Rainfall (mm)",
            Field::Ffmc => "Fine Fuel Moisture Code",
            Field::Dmc => "Duff Moisture Code",
            Field::Isi => "Initial Spread Index",
            Field::FireClass => "Fire Classes",
            Field::RegionCode => "Region Code",
        }
    }

    /// Resolves a canonical key or an alias.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.key() == key || field.alias() == key)
    }

    /// Looks the field up in a raw submission, canonical key first.
    pub fn lookup<'a>(&self, raw: &'a RawObservation) -> Option<&'a str> {
        raw.get(self.key())
            .or_else(|| raw.get(self.alias()))
            .map(String::as_str)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A fully validated observation. Every field is a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub temperature: f64,
    pub relative_humidity: f64,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub ffmc: f64,
    pub dmc: f64,
    pub isi: f64,
    pub fire_class: f64,
    pub region_code: f64,
}

impl WeatherObservation {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Temperature => self.temperature,
            Field::RelativeHumidity => self.relative_humidity,
            Field::WindSpeed => self.wind_speed,
            Field::Rainfall => self.rainfall,
            Field::Ffmc => self.ffmc,
            Field::Dmc => self.dmc,
            Field::Isi => self.isi,
            Field::FireClass => self.fire_class,
            Field::RegionCode => self.region_code,
        }
    }
}

/// Ordered fire danger tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Very low fire danger conditions",
            RiskLevel::Moderate => "Moderate fire danger conditions",
            RiskLevel::High => "High fire danger conditions",
            RiskLevel::Extreme => "Extreme fire danger conditions",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one successful prediction. Built once by the engine, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirePrediction {
    fwi: f64,
    risk_level: RiskLevel,
    confidence: f64,
    recommendations: Vec<String>,
}

impl FirePrediction {
    pub(crate) fn new(
        fwi: f64,
        risk_level: RiskLevel,
        confidence: f64,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            fwi,
            risk_level,
            confidence,
            recommendations,
        }
    }

    pub fn fwi(&self) -> f64 {
        self.fwi
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// 以百分比顯示信心值，例如 `92.4%`
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_prefers_canonical_key() {
        let mut raw = RawObservation::new();
        raw.insert("RH".to_string(), "40".to_string());
        raw.insert("relativeHumidity".to_string(), "55".to_string());

        assert_eq!(Field::RelativeHumidity.lookup(&raw), Some("55"));

        raw.remove("relativeHumidity");
        assert_eq!(Field::RelativeHumidity.lookup(&raw), Some("40"));
        assert_eq!(Field::Rainfall.lookup(&raw), None);
    }

    #[test]
    fn test_field_from_key_accepts_aliases() {
        assert_eq!(Field::from_key("Ws"), Some(Field::WindSpeed));
        assert_eq!(Field::from_key("windSpeed"), Some(Field::WindSpeed));
        assert_eq!(Field::from_key("wind"), None);
    }

    #[test]
    fn test_risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::High < RiskLevel::Extreme);
        assert_eq!(RiskLevel::Extreme.to_string(), "Extreme");
    }

    #[test]
    fn test_prediction_serializes_camel_case() {
        let prediction = FirePrediction::new(
            23.0,
            RiskLevel::High,
            0.9,
            vec!["Exercise extreme caution with fire".to_string()],
        );

        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["riskLevel"], "High");
        assert_eq!(json["fwi"], 23.0);
        assert_eq!(prediction.confidence_percent(), "90.0%");
    }
}

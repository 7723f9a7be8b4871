pub mod input;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::{
    ConfidenceConfig, ConfidencePolicy, RecommendationsConfig, ScoringConfig, TomlConfig,
};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::{Field, RawObservation};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fwi-predict")]
#[command(about = "Fire Weather Index prediction from weather and fuel-moisture observations")]
pub struct CliConfig {
    #[arg(long, help = "Air temperature (°C)")]
    pub temperature: Option<String>,

    #[arg(long, visible_alias = "rh", help = "Relative humidity (%)")]
    pub relative_humidity: Option<String>,

    #[arg(long, visible_alias = "ws", help = "Wind speed (km/h)")]
    pub wind_speed: Option<String>,

    #[arg(long, visible_alias = "rain", help = "Rainfall (mm)")]
    pub rainfall: Option<String>,

    #[arg(long, help = "Fine Fuel Moisture Code")]
    pub ffmc: Option<String>,

    #[arg(long, help = "Duff Moisture Code")]
    pub dmc: Option<String>,

    #[arg(long, help = "Initial Spread Index")]
    pub isi: Option<String>,

    #[arg(long, visible_alias = "classes", help = "Fire class")]
    pub fire_class: Option<String>,

    #[arg(long, visible_alias = "region", help = "Region code")]
    pub region_code: Option<String>,

    #[arg(short, long, help = "Observation file (.json or .toml); flags override its values")]
    pub input: Option<String>,

    #[arg(short, long, help = "Engine configuration file (TOML)")]
    pub config: Option<String>,

    #[arg(long, help = "Override simulated latency in milliseconds")]
    pub delay_ms: Option<u64>,

    #[arg(long, help = "Use a fixed confidence value instead of the configured policy")]
    pub confidence: Option<f64>,

    #[arg(long, help = "Give up after this many milliseconds")]
    pub timeout_ms: Option<u64>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(skip)]
    pub file_config: Option<TomlConfig>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 `--config` 指定的設定檔 (若有)
    pub fn load_file_config(&mut self) -> Result<()> {
        if let Some(path) = &self.config {
            tracing::info!("📁 Loading engine configuration from: {}", path);
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            self.file_config = Some(file_config);
        }
        Ok(())
    }

    fn flag_values(&self) -> [(Field, &Option<String>); 9] {
        [
            (Field::Temperature, &self.temperature),
            (Field::RelativeHumidity, &self.relative_humidity),
            (Field::WindSpeed, &self.wind_speed),
            (Field::Rainfall, &self.rainfall),
            (Field::Ffmc, &self.ffmc),
            (Field::Dmc, &self.dmc),
            (Field::Isi, &self.isi),
            (Field::FireClass, &self.fire_class),
            (Field::RegionCode, &self.region_code),
        ]
    }

    /// Input file values first, then command-line flags on top.
    pub fn raw_observation(&self) -> Result<RawObservation> {
        let mut raw = match &self.input {
            Some(path) => input::load_observation_file(path)?,
            None => RawObservation::new(),
        };

        for (field, value) in self.flag_values() {
            if let Some(value) = value {
                // 別名與正式名稱同時存在時以正式名稱為準，先移除別名避免混淆
                raw.remove(field.alias());
                raw.insert(field.key().to_string(), value.clone());
            }
        }

        Ok(raw)
    }

    fn file(&self) -> TomlConfig {
        self.file_config.clone().unwrap_or_default()
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn latency_ms(&self) -> u64 {
        self.delay_ms.unwrap_or_else(|| self.file().latency_ms())
    }

    fn confidence(&self) -> ConfidenceConfig {
        match self.confidence {
            Some(value) => ConfidenceConfig {
                policy: ConfidencePolicy::Fixed,
                value: Some(value),
                ..Default::default()
            },
            None => ConfigProvider::confidence(&self.file()),
        }
    }

    fn scoring(&self) -> ScoringConfig {
        ConfigProvider::scoring(&self.file())
    }

    fn recommendations(&self) -> Option<RecommendationsConfig> {
        ConfigProvider::recommendations(&self.file())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.input {
            validate_path("input", path)?;
        }
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Some(value) = self.confidence {
            validate_range("confidence", value, 0.0, 1.0)?;
        }
        if let Some(timeout) = self.timeout_ms {
            crate::utils::validation::validate_positive_number("timeout_ms", timeout as usize, 1)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file_and_aliases() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        std::io::Write::write_all(&mut file, br#"{"RH": "40", "temperature": "20"}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config =
            CliConfig::parse_from(["fwi-predict", "--input", path.as_str(), "--rh", "55", "--isi", "4"]);
        let raw = config.raw_observation().unwrap();

        assert_eq!(raw.get("relativeHumidity").map(String::as_str), Some("55"));
        assert!(!raw.contains_key("RH"));
        assert_eq!(raw.get("temperature").map(String::as_str), Some("20"));
        assert_eq!(raw.get("isi").map(String::as_str), Some("4"));
    }

    #[test]
    fn test_cli_overrides_engine_settings() {
        let config = CliConfig::parse_from(["fwi-predict", "--delay-ms", "0", "--confidence", "0.85"]);

        assert_eq!(config.latency_ms(), 0);
        let confidence = ConfigProvider::confidence(&config);
        assert_eq!(confidence.policy, ConfidencePolicy::Fixed);
        assert_eq!(confidence.value, Some(0.85));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_follow_reference_behaviour() {
        let config = CliConfig::parse_from(["fwi-predict"]);

        assert_eq!(config.latency_ms(), 2000);
        assert_eq!(ConfigProvider::confidence(&config).policy, ConfidencePolicy::Random);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_invalid_confidence_override() {
        let config = CliConfig::parse_from(["fwi-predict", "--confidence", "1.5"]);
        assert!(config.validate().is_err());
    }
}

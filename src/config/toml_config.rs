use crate::core::{confidence, score};
use crate::core::latency::DEFAULT_LATENCY;
use crate::domain::ports::ConfigProvider;
pub use crate::domain::settings::{
    ConfidenceConfig, ConfidencePolicy, LinearModelConfig, RecommendationsConfig, ScoringConfig,
    ScoringPolicy,
};
use crate::utils::error::{FwiError, Result};
use crate::utils::validation::{validate_non_empty_list, validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest simulated latency accepted from configuration.
const MAX_DELAY_MS: u64 = 600_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub engine: Option<EngineInfo>,
    pub latency: Option<LatencyConfig>,
    pub confidence: Option<ConfidenceConfig>,
    pub scoring: Option<ScoringConfig>,
    pub recommendations: Option<RecommendationsConfig>,
    pub batch: Option<BatchConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub concurrency: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FwiError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FwiError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FWI_DELAY_MS})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FwiError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(latency) = &self.latency {
            validate_range("latency.delay_ms", latency.delay_ms, 0, MAX_DELAY_MS)?;
        }

        // 直接嘗試建立各元件，錯誤訊息與實際載入時一致
        confidence::from_config(&ConfigProvider::confidence(self))?;
        score::from_config(&ConfigProvider::scoring(self))?;

        if let Some(recommendations) = &self.recommendations {
            recommendations.validate()?;
        }

        if let Some(concurrency) = self.batch.as_ref().and_then(|b| b.concurrency) {
            validate_positive_number("batch.concurrency", concurrency, 1)?;
        }

        Ok(())
    }

    pub fn engine_name(&self) -> &str {
        self.engine
            .as_ref()
            .map(|e| e.name.as_str())
            .unwrap_or("fwi-predict")
    }

    pub fn batch_concurrency(&self) -> usize {
        self.batch
            .as_ref()
            .and_then(|b| b.concurrency)
            .unwrap_or(4)
    }
}

impl ConfigProvider for TomlConfig {
    fn latency_ms(&self) -> u64 {
        self.latency
            .as_ref()
            .map(|l| l.delay_ms)
            .unwrap_or(DEFAULT_LATENCY.as_millis() as u64)
    }

    fn confidence(&self) -> ConfidenceConfig {
        self.confidence.clone().unwrap_or_default()
    }

    fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    fn recommendations(&self) -> Option<RecommendationsConfig> {
        self.recommendations.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

impl Validate for RecommendationsConfig {
    fn validate(&self) -> Result<()> {
        let sections = [
            ("recommendations.low", &self.low),
            ("recommendations.moderate", &self.moderate),
            ("recommendations.high", &self.high),
            ("recommendations.extreme", &self.extreme),
        ];
        for (name, list) in sections {
            if let Some(list) = list {
                validate_non_empty_list(name, list)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_reference_behaviour() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.latency_ms(), 2000);
        assert_eq!(ConfigProvider::confidence(&config).policy, ConfidencePolicy::Random);
        assert_eq!(ConfigProvider::scoring(&config).policy, ScoringPolicy::Placeholder);
        assert_eq!(config.engine_name(), "fwi-predict");
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[engine]
name = "station-7"
description = "Field station scorer"

[latency]
delay_ms = 0

[confidence]
policy = "fixed"
value = 0.9

[scoring]
policy = "linear"

[scoring.linear]
intercept = 7.5
coefficients = { isi = 4.0, FFMC = 1.2 }
means = { isi = 4.8 }
scales = { isi = 4.2 }

[recommendations]
low = ["Carry on"]

[batch]
concurrency = 8
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.engine_name(), "station-7");
        assert_eq!(config.latency_ms(), 0);
        assert_eq!(ConfigProvider::confidence(&config).value, Some(0.9));
        assert_eq!(ConfigProvider::scoring(&config).policy, ScoringPolicy::Linear);
        assert_eq!(config.batch_concurrency(), 8);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FWI_TEST_DELAY_MS", "150");

        let toml_content = r#"
[latency]
delay_ms = ${FWI_TEST_DELAY_MS}
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.latency_ms(), 150);

        std::env::remove_var("FWI_TEST_DELAY_MS");
    }

    #[test]
    fn test_fixed_policy_without_value_is_invalid() {
        let config = TomlConfig::from_toml_str(
            r#"
[confidence]
policy = "fixed"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(FwiError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_out_of_range_values_are_invalid() {
        let config = TomlConfig::from_toml_str(
            r#"
[confidence]
min = 0.9
max = 0.5
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[batch]
concurrency = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_policy_fails_to_parse() {
        let result = TomlConfig::from_toml_str(
            r#"
[scoring]
policy = "neural"
"#,
        );
        assert!(matches!(
            result,
            Err(FwiError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[engine]\nname = \"file-test\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.engine_name(), "file-test");
    }
}

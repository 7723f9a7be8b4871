use crate::domain::model::RawObservation;
use crate::utils::error::{FwiError, Result};
use crate::utils::validation::{validate_file_extension, validate_path};
use std::path::Path;

pub const INPUT_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// 從 JSON 或 TOML 檔案讀取一筆觀測值
///
/// Numbers and strings are both accepted; values are kept as text so the validator sees
/// exactly what a form would have submitted. `null` counts as absent.
pub fn load_observation_file<P: AsRef<Path>>(path: P) -> Result<RawObservation> {
    let path = path.as_ref();
    let display = path.to_string_lossy();
    validate_path("input", &display)?;
    validate_file_extension("input", &display, &INPUT_EXTENSIONS)?;

    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        parse_toml_observation(&content)
    } else {
        parse_json_observation(&content)
    }
}

pub fn parse_json_observation(content: &str) -> Result<RawObservation> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Object(map) = value else {
        return Err(FwiError::ConfigError {
            message: "Observation JSON must be an object of field values".to_string(),
        });
    };

    let mut raw = RawObservation::new();
    for (key, value) in map {
        let text = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        raw.insert(key, text);
    }
    Ok(raw)
}

pub fn parse_toml_observation(content: &str) -> Result<RawObservation> {
    let table: toml::Table = toml::from_str(content).map_err(|e| FwiError::ConfigValidationError {
        field: "input".to_string(),
        message: format!("TOML parsing error: {}", e),
    })?;

    Ok(table
        .into_iter()
        .map(|(key, value)| {
            let text = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, text)
        })
        .collect())
}

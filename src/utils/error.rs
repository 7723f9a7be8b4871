use crate::core::validator::ValidationErrors;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FwiError {
    #[error("Input validation failed: {0}")]
    InvalidInput(#[from] ValidationErrors),

    #[error("Prediction cancelled before completion")]
    Cancelled,

    #[error("Prediction timed out after {after:?}")]
    TimedOut { after: Duration },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Runtime,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FwiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FwiError::InvalidInput(_) => ErrorCategory::Input,
            FwiError::Cancelled | FwiError::TimedOut { .. } => ErrorCategory::Runtime,
            FwiError::ConfigError { .. }
            | FwiError::ConfigValidationError { .. }
            | FwiError::InvalidConfigValueError { .. }
            | FwiError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FwiError::CsvError(_) | FwiError::IoError(_) | FwiError::SerializationError(_) => {
                ErrorCategory::Io
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 被新請求取代，屬於正常流程
            FwiError::Cancelled => ErrorSeverity::Low,
            FwiError::TimedOut { .. } => ErrorSeverity::Medium,
            FwiError::InvalidInput(_)
            | FwiError::CsvError(_)
            | FwiError::SerializationError(_)
            | FwiError::ConfigError { .. }
            | FwiError::ConfigValidationError { .. }
            | FwiError::InvalidConfigValueError { .. }
            | FwiError::MissingConfigError { .. } => ErrorSeverity::High,
            FwiError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// Only timeouts are worth resubmitting unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FwiError::TimedOut { .. })
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FwiError::InvalidInput(errors) => format!(
                "Correct the following fields and resubmit: {}",
                errors.field_keys().join(", ")
            ),
            FwiError::Cancelled => "A newer request superseded this one; no action needed".to_string(),
            FwiError::TimedOut { .. } => {
                "Retry the prediction or increase the timeout".to_string()
            }
            FwiError::CsvError(_) => {
                "Check that the input CSV has a header row and consistent columns".to_string()
            }
            FwiError::IoError(_) => "Check that the file exists and is readable".to_string(),
            FwiError::SerializationError(_) => {
                "Check that the input file is valid JSON".to_string()
            }
            FwiError::ConfigError { .. } | FwiError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and section names".to_string()
            }
            FwiError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            FwiError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FwiError::InvalidInput(errors) => {
                let lines: Vec<String> = errors
                    .iter()
                    .map(|(field, error)| format!("  - {}: {}", field, error))
                    .collect();
                format!("Some inputs are invalid:\n{}", lines.join("\n"))
            }
            FwiError::Cancelled => "Prediction was cancelled".to_string(),
            FwiError::TimedOut { after } => {
                format!("Prediction did not finish within {:?}", after)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FwiError>;

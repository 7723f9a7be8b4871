pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, OutputFormat};

pub use crate::app::{batch::{BatchRunner, RowError}, response::PredictionResponse};
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::engine::{PredictionEngine, PredictionEngineBuilder};
pub use crate::core::validator::{validate, FieldError, ValidationErrors};
pub use crate::domain::model::{Field, FirePrediction, RawObservation, RiskLevel, WeatherObservation};
pub use crate::utils::error::{FwiError, Result};

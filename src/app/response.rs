use crate::core::validator::ValidationErrors;
use crate::domain::model::FirePrediction;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResponseBody {
    Ok { prediction: FirePrediction },
    Invalid { errors: ValidationErrors },
}

/// Request/response envelope for exposing the engine over a service boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub body: ResponseBody,
    pub generated_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn from_outcome(outcome: Result<FirePrediction, ValidationErrors>) -> Self {
        let body = match outcome {
            Ok(prediction) => ResponseBody::Ok { prediction },
            Err(errors) => ResponseBody::Invalid { errors },
        };
        Self {
            body,
            generated_at: Utc::now(),
        }
    }

    /// HTTP-equivalent status: 200 for a prediction, 422 for rejected input.
    pub fn status_code(&self) -> u16 {
        match self.body {
            ResponseBody::Ok { .. } => 200,
            ResponseBody::Invalid { .. } => 422,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Ok { .. })
    }

    pub fn to_json_pretty(&self) -> crate::utils::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        match &self.body {
            ResponseBody::Ok { prediction } => render_prediction(prediction),
            ResponseBody::Invalid { errors } => {
                let mut out = String::from("Invalid input:\n");
                for (field, message) in errors.messages() {
                    out.push_str(&format!("  {:<18} {}\n", field, message));
                }
                out
            }
        }
    }
}

fn render_prediction(prediction: &FirePrediction) -> String {
    let level = prediction.risk_level();
    let mut out = String::new();
    out.push_str(&format!("Fire Weather Index: {}\n", prediction.fwi()));
    out.push_str(&format!("{} Risk - {}\n", level, level.description()));
    out.push_str(&format!("Confidence: {}\n", prediction.confidence_percent()));
    out.push_str("Safety Recommendations:\n");
    for recommendation in prediction.recommendations() {
        out.push_str(&format!("  - {}\n", recommendation));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validator::validate;
    use crate::domain::model::{RawObservation, RiskLevel};

    fn sample_prediction() -> FirePrediction {
        FirePrediction::new(
            23.0,
            RiskLevel::High,
            0.875,
            vec![
                "Exercise extreme caution with fire".to_string(),
                "Postpone non-essential outdoor burning".to_string(),
                "Have emergency evacuation plans ready".to_string(),
            ],
        )
    }

    #[test]
    fn test_success_envelope() {
        let response = PredictionResponse::from_outcome(Ok(sample_prediction()));

        assert_eq!(response.status_code(), 200);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["prediction"]["riskLevel"], "High");
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn test_invalid_envelope() {
        let errors = validate(&RawObservation::new()).unwrap_err();
        let response = PredictionResponse::from_outcome(Err(errors));

        assert_eq!(response.status_code(), 422);
        assert!(!response.is_success());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["errors"]["temperature"], "Temperature (°C) is required");
    }

    #[test]
    fn test_render_text() {
        let text = PredictionResponse::from_outcome(Ok(sample_prediction())).render_text();

        assert!(text.contains("Fire Weather Index: 23\n"));
        assert!(text.contains("High Risk - High fire danger conditions"));
        assert!(text.contains("Confidence: 87.5%"));
        assert!(text.contains("  - Have emergency evacuation plans ready"));
    }
}

use crate::domain::model::{Field, RawObservation, WeatherObservation, FIELD_COUNT};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A problem with a single submitted field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    MissingField { field: Field },
    NotANumber { field: Field, value: String },
    OutOfRange {
        field: Field,
        value: f64,
        message: &'static str,
    },
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::MissingField { field }
            | FieldError::NotANumber { field, .. }
            | FieldError::OutOfRange { field, .. } => *field,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::MissingField { .. } => "MissingField",
            FieldError::NotANumber { .. } => "NotANumber",
            FieldError::OutOfRange { .. } => "OutOfRange",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::MissingField { field } => write!(f, "{} is required", field.label()),
            FieldError::NotANumber { field, .. } => {
                write!(f, "{} must be a valid number", field.label())
            }
            FieldError::OutOfRange { message, .. } => f.write_str(message),
        }
    }
}

/// Every field-level problem found in one submission, keyed and ordered by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    fn insert(&mut self, error: FieldError) {
        self.errors.insert(error.field(), error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    pub fn field_keys(&self) -> Vec<&'static str> {
        self.errors.keys().map(Field::key).collect()
    }

    /// Field key to display message, the shape a form renders next to its inputs.
    pub fn messages(&self) -> BTreeMap<&'static str, String> {
        self.iter()
            .map(|(field, error)| (field.key(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, error)| format!("{}: {}", field, error))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in self.iter() {
            map.serialize_entry(field.key(), &error.to_string())?;
        }
        map.end()
    }
}

pub type ValidationResult = std::result::Result<WeatherObservation, ValidationErrors>;

struct RangeRule {
    field: Field,
    min: Option<f64>,
    max: Option<f64>,
    message: &'static str,
}

const RANGE_RULES: [RangeRule; 2] = [
    RangeRule {
        field: Field::RelativeHumidity,
        min: Some(0.0),
        max: Some(100.0),
        message: "Relative Humidity must be between 0 and 100",
    },
    RangeRule {
        field: Field::Rainfall,
        min: Some(0.0),
        max: None,
        message: "Rainfall cannot be negative",
    },
];

fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Checks presence, numeric form and ranges of all nine fields in a single pass.
pub fn validate(raw: &RawObservation) -> ValidationResult {
    let mut errors = ValidationErrors::default();
    let mut values = [0.0_f64; FIELD_COUNT];

    for (index, field) in Field::ALL.into_iter().enumerate() {
        let text = match field.lookup(raw) {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                errors.insert(FieldError::MissingField { field });
                continue;
            }
        };

        let Some(value) = parse_number(text) else {
            errors.insert(FieldError::NotANumber {
                field,
                value: text.to_string(),
            });
            continue;
        };

        if let Some(rule) = RANGE_RULES.iter().find(|rule| rule.field == field) {
            let below = rule.min.is_some_and(|min| value < min);
            let above = rule.max.is_some_and(|max| value > max);
            if below || above {
                errors.insert(FieldError::OutOfRange {
                    field,
                    value,
                    message: rule.message,
                });
                continue;
            }
        }

        values[index] = value;
    }

    if !errors.is_empty() {
        tracing::debug!(fields = ?errors.field_keys(), "observation rejected");
        return Err(errors);
    }

    // Accepted as-is; only humidity and rainfall carry range rules.
    for (field, value) in Field::ALL.into_iter().zip(values) {
        if value < 0.0 && !matches!(field, Field::Temperature) {
            tracing::warn!(field = field.key(), value, "negative value accepted without range rule");
        }
    }

    let [temperature, relative_humidity, wind_speed, rainfall, ffmc, dmc, isi, fire_class, region_code] =
        values;

    Ok(WeatherObservation {
        temperature,
        relative_humidity,
        wind_speed,
        rainfall,
        ffmc,
        dmc,
        isi,
        fire_class,
        region_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawObservation {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn reference_raw() -> RawObservation {
        raw(&[
            ("temperature", "25"),
            ("relativeHumidity", "65"),
            ("windSpeed", "15"),
            ("rainfall", "0"),
            ("ffmc", "85"),
            ("dmc", "25"),
            ("isi", "5"),
            ("fireClass", "3"),
            ("regionCode", "1"),
        ])
    }

    #[test]
    fn test_valid_submission_is_coerced() {
        let obs = validate(&reference_raw()).unwrap();
        assert_eq!(obs.temperature, 25.0);
        assert_eq!(obs.relative_humidity, 65.0);
        assert_eq!(obs.region_code, 1.0);
    }

    #[test]
    fn test_collects_every_error_in_one_pass() {
        let mut input = reference_raw();
        input.remove("temperature");
        input.insert("relativeHumidity".to_string(), "-5".to_string());

        let errors = validate(&input).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Temperature).unwrap().kind(), "MissingField");
        assert_eq!(
            errors.get(Field::RelativeHumidity).unwrap().kind(),
            "OutOfRange"
        );
    }

    #[test]
    fn test_blank_is_missing_and_garbage_is_not_a_number() {
        let mut input = reference_raw();
        input.insert("windSpeed".to_string(), "   ".to_string());
        input.insert("dmc".to_string(), "twenty".to_string());

        let errors = validate(&input).unwrap_err();

        assert_eq!(
            errors.get(Field::WindSpeed).unwrap().to_string(),
            "Wind Speed (km/h) is required"
        );
        assert_eq!(
            errors.get(Field::Dmc).unwrap().to_string(),
            "Duff Moisture Code must be a valid number"
        );
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for text in ["NaN", "inf", "-infinity"] {
            let mut input = reference_raw();
            input.insert("isi".to_string(), text.to_string());
            let errors = validate(&input).unwrap_err();
            assert_eq!(errors.get(Field::Isi).unwrap().kind(), "NotANumber", "{}", text);
        }
    }

    #[test]
    fn test_range_checks() {
        let mut input = reference_raw();
        input.insert("relativeHumidity".to_string(), "150".to_string());
        input.insert("rainfall".to_string(), "-0.1".to_string());

        let errors = validate(&input).unwrap_err();

        assert_eq!(
            errors.get(Field::RelativeHumidity).unwrap().to_string(),
            "Relative Humidity must be between 0 and 100"
        );
        assert_eq!(
            errors.get(Field::Rainfall).unwrap().to_string(),
            "Rainfall cannot be negative"
        );
    }

    #[test]
    fn test_humidity_bounds_are_inclusive() {
        for text in ["0", "100"] {
            let mut input = reference_raw();
            input.insert("relativeHumidity".to_string(), text.to_string());
            assert!(validate(&input).is_ok());
        }
    }

    #[test]
    fn test_unconstrained_fields_accept_negative_values() {
        let mut input = reference_raw();
        input.insert("ffmc".to_string(), "-12.5".to_string());
        input.insert("regionCode".to_string(), "-1".to_string());

        let obs = validate(&input).unwrap();
        assert_eq!(obs.ffmc, -12.5);
    }

    #[test]
    fn test_legacy_aliases_and_whitespace() {
        let input = raw(&[
            ("Temperature", " 29 "),
            ("RH", "57"),
            ("Ws", "18"),
            ("Rain", "0"),
            ("FFMC", "65.7"),
            ("DMC", "3.4"),
            ("ISI", "1.3"),
            ("Classes", "0"),
            ("Region", "0"),
        ]);

        let obs = validate(&input).unwrap();
        assert_eq!(obs.temperature, 29.0);
        assert_eq!(obs.ffmc, 65.7);
    }

    #[test]
    fn test_errors_serialize_as_field_message_map() {
        let errors = validate(&RawObservation::new()).unwrap_err();
        assert_eq!(errors.len(), 9);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["regionCode"], "Region Code is required");
        assert_eq!(errors.field_keys()[0], "temperature");
    }
}

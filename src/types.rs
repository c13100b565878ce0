//! Shared types for the yield-prediction service.
//!
//! Weather readings, request/result envelopes and the domain error enum.
//! Kept free of I/O so that the data, engine and api modules can all
//! depend on them without circular references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Where a weather reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    Live,
    Mock,
}

impl fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherSource::Live => write!(f, "live"),
            WeatherSource::Mock => write!(f, "mock"),
        }
    }
}

/// Weather conditions as exposed to callers (no provenance tag).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// °C, one decimal
    pub temperature: f64,
    /// %, one decimal
    pub humidity: f64,
    /// Approximate monthly rainfall in mm, one decimal
    pub rainfall: f64,
    pub condition: String,
    pub description: String,
    /// m/s, one decimal
    pub wind_speed: f64,
    pub timestamp: Option<String>,
}

/// A normalized weather reading, tagged with its source.
///
/// Never mutated once produced; the cache hands out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    #[serde(flatten)]
    pub conditions: WeatherConditions,
    pub source: WeatherSource,
}

impl WeatherReading {
    pub fn temperature(&self) -> f64 {
        self.conditions.temperature
    }

    pub fn humidity(&self) -> f64 {
        self.conditions.humidity
    }

    pub fn rainfall(&self) -> f64 {
        self.conditions.rainfall
    }

    pub fn is_live(&self) -> bool {
        self.source == WeatherSource::Live
    }

    /// Split the provenance tag off the conditions.
    pub fn into_parts(self) -> (WeatherConditions, WeatherSource) {
        (self.conditions, self.source)
    }

    /// Reading with fixed conditions, for tests.
    #[cfg(test)]
    pub fn sample(temperature: f64, humidity: f64, rainfall: f64) -> Self {
        WeatherReading {
            conditions: WeatherConditions {
                temperature,
                humidity,
                rainfall,
                condition: "Clear".to_string(),
                description: "clear sky".to_string(),
                wind_speed: 3.2,
                timestamp: Some("2026-10-16 09:00:00 UTC".to_string()),
            },
            source: WeatherSource::Live,
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    round_decimal(value, 1)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    round_decimal(value, 2)
}

/// Rounds the exact binary value, exact ties to even: 24.25 -> 24.2,
/// 0.15 (stored just below) -> 0.1.
fn round_decimal(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

/// A validated yield prediction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPredictionRequest {
    pub crop: String,
    pub season: String,
    pub soil_type: String,
    /// Acres
    pub area_of_land: f64,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub location_details: Option<Value>,
}

/// Fields checked for presence, in this order.
const REQUIRED_FIELDS: &[&str] = &[
    "latitude",
    "longitude",
    "crop",
    "season",
    "area_of_land",
    "soil_type",
];

impl YieldPredictionRequest {
    /// Validate a raw JSON body into a request.
    ///
    /// Numeric fields accept JSON numbers or numeric strings. Categorical
    /// fields must be strings; unknown values are allowed here.
    pub fn from_json(body: &Value) -> Result<Self, YieldError> {
        let obj = match body.as_object() {
            Some(obj) if !obj.is_empty() => obj,
            _ => return Err(YieldError::Validation("No data provided".into())),
        };

        for field in REQUIRED_FIELDS {
            if !obj.contains_key(*field) {
                return Err(YieldError::Validation(format!(
                    "Missing required field: {field}"
                )));
            }
        }

        Ok(Self {
            crop: string_field(obj, "crop")?,
            season: string_field(obj, "season")?,
            soil_type: string_field(obj, "soil_type")?,
            area_of_land: numeric_field(obj, "area_of_land")?,
            latitude: numeric_field(obj, "latitude")?,
            longitude: numeric_field(obj, "longitude")?,
            location_details: obj.get("location_details").cloned(),
        })
    }

    /// A typical request, for tests.
    #[cfg(test)]
    pub fn sample() -> Self {
        YieldPredictionRequest {
            crop: "Rice".to_string(),
            season: "Kharif".to_string(),
            soil_type: "Loamy".to_string(),
            area_of_land: 5.0,
            latitude: 28.6139,
            longitude: 77.209,
            location_details: None,
        }
    }
}

fn string_field(obj: &Map<String, Value>, name: &str) -> Result<String, YieldError> {
    match obj.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(YieldError::Validation(format!(
            "Field '{name}' must be a string"
        ))),
    }
}

fn numeric_field(obj: &Map<String, Value>, name: &str) -> Result<f64, YieldError> {
    let parsed = match obj.get(name) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(YieldError::Validation(format!(
            "Field '{name}' must be numeric"
        ))),
    }
}

/// The result envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldPredictionResult {
    pub predicted_yield_kg: i64,
    /// At most 3 names, never the requested crop.
    pub suggested_crops: Vec<String>,
    /// 0.70–0.90 on the heuristic path, 0.80–0.95 with a trained model.
    pub confidence: f64,
    pub weather: WeatherConditions,
    /// True when no trained model is loaded.
    pub is_mock: bool,
    pub weather_source: String,
    pub location_details: Value,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum YieldError {
    #[error("{0}")]
    Validation(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Weather fetch error: {message}")]
    WeatherFetch { message: String },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl YieldError {
    pub fn is_validation(&self) -> bool {
        matches!(self, YieldError::Validation(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

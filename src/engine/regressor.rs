//! Trained-model path.
//!
//! A regressor is opaque: it maps a fixed-layout feature vector to a
//! yield in kg. The shipped implementation is a linear model stored as
//! JSON (`{"weights": [...], "intercept": f}`).

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::reference::{Crop, Season, SoilType};
use crate::types::{WeatherReading, YieldError};

/// Numeric features preceding the one-hot blocks.
const NUMERIC_FEATURES: usize = 4;

/// Length of the encoded feature vector (4 + 10 + 3 + 6).
pub const FEATURE_LEN: usize =
    NUMERIC_FEATURES + Crop::ALL.len() + Season::ALL.len() + SoilType::ALL.len();

/// A trained yield model.
pub trait YieldRegressor: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64>;

    /// Identifier for logs.
    fn name(&self) -> &str;
}

/// Encode a request into the model's feature layout.
///
/// `[area/10, temperature/50, humidity/100, rainfall/200]`, then one-hot
/// crop, season and soil type, each in table order. Unknown names encode
/// as an all-zero block.
pub fn encode_features(
    crop: &str,
    season: &str,
    soil_type: &str,
    area_acres: f64,
    weather: &WeatherReading,
) -> Vec<f64> {
    let one_hot = |hit: bool| if hit { 1.0 } else { 0.0 };

    let mut features = Vec::with_capacity(FEATURE_LEN);
    features.extend([
        area_acres / 10.0,
        weather.temperature() / 50.0,
        weather.humidity() / 100.0,
        weather.rainfall() / 200.0,
    ]);
    features.extend(Crop::ALL.iter().map(|c| one_hot(c.name() == crop)));
    features.extend(Season::ALL.iter().map(|s| one_hot(s.name() == season)));
    features.extend(SoilType::ALL.iter().map(|s| one_hot(s.name() == soil_type)));
    features
}

// ---------------------------------------------------------------------------
// Linear model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LinearRegressor {
    weights: Vec<f64>,
    #[serde(default)]
    intercept: f64,
    #[serde(skip)]
    label: String,
}

impl LinearRegressor {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Result<Self, YieldError> {
        let model = Self {
            weights,
            intercept,
            label: "linear".to_string(),
        };
        model.check()?;
        Ok(model)
    }

    /// Load a JSON artifact.
    pub fn from_file(path: &Path) -> Result<Self, YieldError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            YieldError::Model(format!("Failed to read {}: {e}", path.display()))
        })?;
        let mut model: LinearRegressor = serde_json::from_str(&contents).map_err(|e| {
            YieldError::Model(format!("Failed to parse {}: {e}", path.display()))
        })?;
        model.label = path.display().to_string();
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<(), YieldError> {
        if self.weights.len() != FEATURE_LEN {
            return Err(YieldError::Model(format!(
                "expected {FEATURE_LEN} weights, found {}",
                self.weights.len()
            )));
        }
        if !self.intercept.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(YieldError::Model("non-finite coefficient".into()));
        }
        Ok(())
    }
}

impl YieldRegressor for LinearRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            anyhow::bail!(
                "feature vector has {} entries, model expects {}",
                features.len(),
                self.weights.len()
            );
        }
        let dot: f64 = self.weights.iter().zip(features).map(|(w, x)| w * x).sum();
        Ok(dot + self.intercept)
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Load the first artifact found among `paths`.
///
/// Returns `None` (heuristic path) when no file exists or the first
/// existing file fails to load.
pub fn load_first(paths: &[PathBuf]) -> Option<Box<dyn YieldRegressor>> {
    let Some(path) = paths.iter().find(|p| p.is_file()) else {
        warn!("No pre-trained model found, using feature-based prediction");
        return None;
    };

    match LinearRegressor::from_file(path) {
        Ok(model) => {
            info!(path = %path.display(), "Loaded pre-trained model");
            Some(Box::new(model))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Error loading model, using feature-based prediction");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Yield prediction service.
//!
//! Orchestrates one prediction: validate → resolve weather → yield via the
//! trained model or the heuristic → confidence → suggestions → envelope.

use rand::Rng;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::estimator;
use super::ranker::{self, TOP_N};
use super::regressor::{encode_features, YieldRegressor};
use crate::data::weather::WeatherProvider;
use crate::reference::Crop;
use crate::types::{
    round2, WeatherReading, YieldError, YieldPredictionRequest, YieldPredictionResult,
};

pub struct YieldPredictionService {
    weather: WeatherProvider,
    regressor: Option<Box<dyn YieldRegressor>>,
}

impl YieldPredictionService {
    pub fn new(weather: WeatherProvider, regressor: Option<Box<dyn YieldRegressor>>) -> Self {
        match &regressor {
            Some(model) => info!(model = model.name(), "Yield service using trained model"),
            None => info!("Yield service using feature-based prediction"),
        }
        Self { weather, regressor }
    }

    /// True when no trained model is loaded.
    pub fn is_mock(&self) -> bool {
        self.regressor.is_none()
    }

    pub fn weather(&self) -> &WeatherProvider {
        &self.weather
    }

    /// Validate a raw JSON body, then predict.
    pub async fn predict_json(&self, body: &Value) -> Result<YieldPredictionResult, YieldError> {
        let request = YieldPredictionRequest::from_json(body)?;
        self.predict(&request).await
    }

    pub async fn predict(
        &self,
        request: &YieldPredictionRequest,
    ) -> Result<YieldPredictionResult, YieldError> {
        check_numeric(request)?;

        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            crop = %request.crop,
            season = %request.season,
            soil_type = %request.soil_type,
            area_of_land = request.area_of_land,
            "Received yield prediction request"
        );

        let weather = self
            .weather
            .fetch(request.latitude, request.longitude)
            .await;

        let (predicted_yield_kg, confidence) = self
            .compute_yield(request, &weather)
            .inspect_err(|e| error!(%request_id, error = %e, "Error in yield prediction"))?;

        let ranked = ranker::rank(&request.soil_type, &request.season, &weather);
        let suggested_crops = suggest_crops(&request.crop, &ranked);

        let (conditions, source) = weather.into_parts();
        let result = YieldPredictionResult {
            predicted_yield_kg,
            suggested_crops,
            confidence,
            weather: conditions,
            is_mock: self.is_mock(),
            weather_source: source.to_string(),
            location_details: request
                .location_details
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default())),
        };

        info!(
            %request_id,
            predicted_yield_kg = result.predicted_yield_kg,
            confidence = result.confidence,
            weather_source = %result.weather_source,
            suggested = ?result.suggested_crops,
            "Prediction result"
        );
        Ok(result)
    }

    /// Yield in kg and the confidence for the path taken.
    fn compute_yield(
        &self,
        request: &YieldPredictionRequest,
        weather: &WeatherReading,
    ) -> Result<(i64, f64), YieldError> {
        let mut rng = rand::thread_rng();

        match &self.regressor {
            None => {
                let kg = estimator::estimate(
                    &request.crop,
                    &request.season,
                    &request.soil_type,
                    request.area_of_land,
                    weather,
                    &mut rng,
                )?;
                Ok((kg, confidence(&mut rng, 0.7, 0.2)))
            }
            Some(model) => {
                let features = encode_features(
                    &request.crop,
                    &request.season,
                    &request.soil_type,
                    request.area_of_land,
                    weather,
                );
                let raw = model
                    .predict(&features)
                    .map_err(|e| YieldError::Prediction(format!("{e:#}")))?;
                if !raw.is_finite() || raw.abs() >= i64::MAX as f64 {
                    return Err(YieldError::Prediction(format!(
                        "model {} returned unusable value {raw}",
                        model.name()
                    )));
                }
                Ok((raw.trunc() as i64, confidence(&mut rng, 0.8, 0.15)))
            }
        }
    }
}

/// Uniform in [low, low + span], rounded to 2 decimals.
fn confidence<R: Rng + ?Sized>(rng: &mut R, low: f64, span: f64) -> f64 {
    round2(low + rng.gen::<f64>() * span)
}

fn check_numeric(request: &YieldPredictionRequest) -> Result<(), YieldError> {
    for (name, value) in [
        ("area_of_land", request.area_of_land),
        ("latitude", request.latitude),
        ("longitude", request.longitude),
    ] {
        if !value.is_finite() {
            return Err(YieldError::Validation(format!(
                "Field '{name}' must be numeric"
            )));
        }
    }
    Ok(())
}

/// Ranked crops minus the requested one, topped up from the table to three.
pub fn suggest_crops(requested: &str, ranked: &[Crop]) -> Vec<String> {
    let mut picks: Vec<&'static str> = ranked
        .iter()
        .map(|c| c.name())
        .filter(|name| *name != requested)
        .collect();

    for crop in Crop::ALL {
        if picks.len() >= TOP_N {
            break;
        }
        let name = crop.name();
        if name != requested && !picks.contains(&name) {
            picks.push(name);
        }
    }

    picks.truncate(TOP_N);
    picks.into_iter().map(String::from).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

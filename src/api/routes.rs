//! HTTP route handlers.
//!
//! All endpoints return JSON. The prediction service is shared via
//! `Arc<YieldPredictionService>`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

use crate::engine::service::YieldPredictionService;
use crate::types::{YieldError, YieldPredictionResult};

pub type AppState = Arc<YieldPredictionService>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Maps domain errors onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub YieldError);

impl From<YieldError> for ApiError {
    fn from(err: YieldError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            warn!(error = %self.0, "Rejected prediction request");
            StatusCode::BAD_REQUEST
        } else {
            error!(error = %self.0, "Error during prediction");
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub using_mock: bool,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /predict
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<YieldPredictionResult>, ApiError> {
    let Json(body) = body.map_err(|_| YieldError::Validation("No data provided".into()))?;
    let result = state.predict_json(&body).await?;
    Ok(Json(result))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        using_mock: state.is_mock(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::weather::WeatherProvider;

    fn test_state() -> AppState {
        Arc::new(YieldPredictionService::new(WeatherProvider::mock_only(), None))
    }

    #[test]
    fn test_health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy".into(),
            using_mock: true,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, json!({"status": "healthy", "using_mock": true}));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let resp = ApiError(YieldError::Validation("Missing required field: crop".into()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_prediction_error_maps_to_500() {
        let resp = ApiError(YieldError::Prediction("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health_handler_reports_mock() {
        let Json(resp) = health(State(test_state())).await;
        assert_eq!(resp.status, "healthy");
        assert!(resp.using_mock);
    }

    #[tokio::test]
    async fn test_predict_handler() {
        let body = json!({
            "crop": "Maize",
            "season": "Kharif",
            "soil_type": "Black",
            "area_of_land": 3,
            "latitude": 19.07,
            "longitude": 72.88
        });
        let Json(result) = predict(State(test_state()), Ok(Json(body))).await.unwrap();
        assert!(result.is_mock);
        assert_eq!(result.weather_source, "mock");
        assert!(!result.suggested_crops.contains(&"Maize".to_string()));
    }
}

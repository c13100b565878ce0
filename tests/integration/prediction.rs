//! Prediction flow through the public router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use yieldcast::api::build_router;
use yieldcast::data::cache::WeatherCache;
use yieldcast::data::weather::WeatherProvider;
use yieldcast::engine::service::YieldPredictionService;

use crate::stub_weather::StubWeather;

fn service(stub: &StubWeather) -> Arc<YieldPredictionService> {
    let provider = WeatherProvider::new(Some(Box::new(stub.clone())), WeatherCache::default());
    Arc::new(YieldPredictionService::new(provider, None))
}

fn rice_request(lat: f64, lon: f64) -> Request<Body> {
    let body = json!({
        "crop": "Rice",
        "season": "Kharif",
        "soil_type": "Loamy",
        "area_of_land": 5,
        "latitude": lat,
        "longitude": lon,
        "location_details": {"village": "Khanna"}
    });
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_live_weather_reproduces_reference_yield() {
    // 1.5mm over two reporting periods → 6mm/day → 180mm/month
    let stub = StubWeather::dry(25.0, 70.0, vec![Some(1.0), None, Some(0.5), None]);
    let app = build_router(service(&stub));

    let resp = app.oneshot(rice_request(30.7046, 76.2179)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;

    // Baseline 7413 kg, ±5% jitter
    let kg = json["predicted_yield_kg"].as_i64().unwrap();
    assert!((7042..=7784).contains(&kg), "yield {kg} outside jitter band");
    assert_eq!(json["weather_source"], "live");
    assert_eq!(json["weather"]["rainfall"], 180.0);
    assert_eq!(json["weather"]["timestamp"], "2025-10-16 09:00:00 UTC");
    assert_eq!(json["suggested_crops"], json!(["Maize", "Sugarcane", "Wheat"]));
    assert_eq!(json["location_details"], json!({"village": "Khanna"}));
    assert_eq!(stub.forecast_calls(), 1);
}

#[tokio::test]
async fn test_repeat_requests_hit_cache() {
    let stub = StubWeather::dry(22.0, 55.0, vec![]);
    let svc = service(&stub);

    for _ in 0..3 {
        let resp = build_router(svc.clone())
            .oneshot(rice_request(30.70461, 76.21789))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert_eq!(stub.current_calls(), 1);
}

#[tokio::test]
async fn test_unavailable_service_falls_back_to_mock() {
    let stub = StubWeather::failing();
    let app = build_router(service(&stub));

    let resp = app.oneshot(rice_request(10.0, 10.0)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = json_body(resp).await;
    assert_eq!(json["weather_source"], "mock");
    assert_eq!(json["weather"]["description"], "Simulated weather conditions");
    assert_eq!(stub.forecast_calls(), 0);
}

#[tokio::test]
async fn test_invalid_request_makes_no_weather_call() {
    let stub = StubWeather::dry(25.0, 70.0, vec![]);
    let app = build_router(service(&stub));

    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"crop":"Rice","season":"Kharif","soil_type":"Loamy","area_of_land":"lots","latitude":1,"longitude":2}"#,
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(stub.current_calls(), 0);
}

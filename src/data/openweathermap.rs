//! OpenWeatherMap client.
//!
//! Uses the current-weather and 5-day/3-hour forecast endpoints in metric
//! units. Requires an API key; the provider never constructs this client
//! without one.
//!
//! API: `https://api.openweathermap.org/data/2.5`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::{CurrentConditions, LiveWeather};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Forecast periods considered for rainfall (8 × 3h = 24h).
pub const FORECAST_PERIODS: usize = 8;

// ---------------------------------------------------------------------------
// OpenWeatherMap response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    wind: Option<OwmWind>,
    #[serde(default)]
    rain: Option<OwmRain>,
    #[serde(default)]
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    three_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    #[serde(default)]
    rain: Option<OwmRain>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct OpenWeatherMapClient {
    http: Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenWeatherMapClient {
    pub fn new(api_key: SecretString, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("yieldcast/0.1.0")
            .build()
            .context("Failed to build weather HTTP client")?;
        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str, lat: f64, lon: f64) -> String {
        format!(
            "{}/{endpoint}?lat={lat}&lon={lon}&appid={}&units=metric",
            self.base_url,
            self.api_key.expose_secret()
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("OpenWeatherMap {what} request failed"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("OpenWeatherMap {what} error: {status}");
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse OpenWeatherMap {what} response"))
    }

    fn convert_current(resp: OwmCurrentResponse) -> CurrentConditions {
        let first = resp.weather.into_iter().next();
        CurrentConditions {
            temperature: resp.main.temp,
            humidity: resp.main.humidity,
            rain_1h: resp.rain.as_ref().and_then(|r| r.one_hour),
            rain_3h: resp.rain.as_ref().and_then(|r| r.three_hour),
            condition: first.as_ref().map(|w| w.main.clone()),
            description: first.map(|w| w.description),
            wind_speed: resp.wind.and_then(|w| w.speed),
            observed_at: resp.dt,
        }
    }

    fn convert_forecast(resp: OwmForecastResponse) -> Vec<Option<f64>> {
        resp.list
            .into_iter()
            .take(FORECAST_PERIODS)
            .map(|item| item.rain.and_then(|r| r.three_hour))
            .collect()
    }
}

#[async_trait]
impl LiveWeather for OpenWeatherMapClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions> {
        info!(lat, lon, "Requesting current weather from OpenWeatherMap");
        let url = self.url("weather", lat, lon);
        let resp: OwmCurrentResponse = self.get_json(&url, "current weather").await?;
        Ok(Self::convert_current(resp))
    }

    async fn forecast_rain(&self, lat: f64, lon: f64) -> Result<Vec<Option<f64>>> {
        let url = self.url("forecast", lat, lon);
        let resp: OwmForecastResponse = self.get_json(&url, "forecast").await?;
        Ok(Self::convert_forecast(resp))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

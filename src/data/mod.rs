//! Weather data sources.
//!
//! Defines the `LiveWeather` trait over the external weather service,
//! the coordinate cache, and the provider that combines them with a
//! synthetic fallback.

pub mod cache;
pub mod openweathermap;
pub mod weather;

use anyhow::Result;
use async_trait::async_trait;

/// Current conditions as reported by the live service, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    /// Precipitation over the last hour, mm
    pub rain_1h: Option<f64>,
    /// Precipitation over the last 3 hours, mm
    pub rain_3h: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub wind_speed: Option<f64>,
    /// Observation time, unix seconds
    pub observed_at: Option<i64>,
}

/// Abstraction over the external weather service.
///
/// Implementors return raw figures; normalization, caching and the mock
/// fallback live in [`weather::WeatherProvider`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LiveWeather: Send + Sync {
    /// Current conditions at a coordinate.
    async fn current(&self, lat: f64, lon: f64) -> Result<CurrentConditions>;

    /// 3-hour precipitation for the next 8 forecast periods. `None` where a
    /// period reports no rain figure.
    async fn forecast_rain(&self, lat: f64, lon: f64) -> Result<Vec<Option<f64>>>;
}

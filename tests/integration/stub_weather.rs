//! Stub weather service for integration testing.
//!
//! Returns fixed conditions (or a forced error) and counts calls, all
//! in-memory with no network access.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use yieldcast::data::{CurrentConditions, LiveWeather};

#[derive(Clone)]
pub struct StubWeather {
    current: Option<CurrentConditions>,
    forecast: Vec<Option<f64>>,
    current_calls: Arc<AtomicUsize>,
    forecast_calls: Arc<AtomicUsize>,
}

impl StubWeather {
    /// Dry current conditions, with the given forecast buckets.
    pub fn dry(temperature: f64, humidity: f64, forecast: Vec<Option<f64>>) -> Self {
        Self {
            current: Some(CurrentConditions {
                temperature,
                humidity,
                condition: Some("Clear".into()),
                description: Some("clear sky".into()),
                wind_speed: Some(2.57),
                observed_at: Some(1_760_605_200),
                ..Default::default()
            }),
            forecast,
            current_calls: Arc::new(AtomicUsize::new(0)),
            forecast_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A service that is down.
    pub fn failing() -> Self {
        Self {
            current: None,
            forecast: Vec::new(),
            current_calls: Arc::new(AtomicUsize::new(0)),
            forecast_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn current_calls(&self) -> usize {
        self.current_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveWeather for StubWeather {
    async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentConditions> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        self.current
            .clone()
            .ok_or_else(|| anyhow!("weather service unavailable"))
    }

    async fn forecast_rain(&self, _lat: f64, _lon: f64) -> Result<Vec<Option<f64>>> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.forecast.clone())
    }
}

//! Weather provider.
//!
//! Resolves a reading for a coordinate: cache first, then the live
//! service when a key is configured, then a synthetic reading. The
//! fallback decision is made once per lookup and never surfaces an error.

use chrono::{DateTime, Local};
use rand::Rng;
use tracing::{info, warn};

use super::cache::WeatherCache;
use super::openweathermap::FORECAST_PERIODS;
use super::{CurrentConditions, LiveWeather};
use crate::types::{round1, WeatherConditions, WeatherReading, WeatherSource, YieldError};

/// Daily rainfall is scaled to an approximate monthly figure.
const DAYS_PER_MONTH: f64 = 30.0;

/// Floor for monthly rainfall, mm.
const MIN_MONTHLY_RAINFALL: f64 = 10.0;

const MOCK_CONDITIONS: &[&str] = &["Clear", "Clouds", "Rain", "Drizzle"];

pub struct WeatherProvider {
    live: Option<Box<dyn LiveWeather>>,
    cache: WeatherCache,
}

impl WeatherProvider {
    pub fn new(live: Option<Box<dyn LiveWeather>>, cache: WeatherCache) -> Self {
        Self { live, cache }
    }

    /// Provider that only ever produces synthetic weather.
    pub fn mock_only() -> Self {
        Self::new(None, WeatherCache::default())
    }

    pub fn has_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Weather for a coordinate. Always succeeds.
    pub async fn fetch(&self, lat: f64, lon: f64) -> WeatherReading {
        if let Some(hit) = self.cache.get(lat, lon) {
            return hit;
        }

        let live = match &self.live {
            Some(client) => match fetch_live(client.as_ref(), lat, lon).await {
                Ok(reading) => {
                    info!(
                        lat,
                        lon,
                        temperature = reading.temperature(),
                        rainfall = reading.rainfall(),
                        "Retrieved live weather data"
                    );
                    Some(reading)
                }
                Err(e) => {
                    warn!(lat, lon, error = %e, "Live weather unavailable, falling back to mock data");
                    None
                }
            },
            None => None,
        };

        let reading = match live {
            Some(reading) => reading,
            None => {
                let reading = mock_reading(&mut rand::thread_rng());
                info!(
                    lat,
                    lon,
                    temperature = reading.temperature(),
                    humidity = reading.humidity(),
                    rainfall = reading.rainfall(),
                    "Generated mock weather data"
                );
                reading
            }
        };

        self.cache.put(lat, lon, reading.clone());
        reading
    }
}

/// Live path: current conditions, with a forecast lookup when no rain is reported.
async fn fetch_live(
    client: &dyn LiveWeather,
    lat: f64,
    lon: f64,
) -> Result<WeatherReading, YieldError> {
    let current = client
        .current(lat, lon)
        .await
        .map_err(|e| YieldError::WeatherFetch { message: format!("{e:#}") })?;

    let mut rainfall = current.rain_1h.or(current.rain_3h).unwrap_or(0.0);

    if rainfall == 0.0 {
        match client.forecast_rain(lat, lon).await {
            Ok(periods) => {
                if let Some(daily) = forecast_daily_rain(&periods) {
                    rainfall = daily;
                }
            }
            Err(e) => warn!(lat, lon, error = %e, "Error fetching forecast data"),
        }
    }

    Ok(normalize_live(&current, rainfall))
}

/// Average 3-hour rain over the periods that report it, scaled to 24h.
pub fn forecast_daily_rain(periods: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = periods
        .iter()
        .take(FORECAST_PERIODS)
        .flatten()
        .fold((0.0, 0usize), |(sum, count), mm| (sum + mm, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum * FORECAST_PERIODS as f64 / count as f64)
    }
}

/// Build a live reading from raw current conditions and daily rainfall.
pub fn normalize_live(current: &CurrentConditions, daily_rainfall: f64) -> WeatherReading {
    let monthly = (daily_rainfall * DAYS_PER_MONTH).max(MIN_MONTHLY_RAINFALL);
    let timestamp = current
        .observed_at
        .and_then(|dt| DateTime::from_timestamp(dt, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    WeatherReading {
        conditions: WeatherConditions {
            temperature: round1(current.temperature),
            humidity: round1(current.humidity),
            rainfall: round1(monthly),
            condition: current.condition.clone().unwrap_or_else(|| "Unknown".into()),
            description: current.description.clone().unwrap_or_else(|| "Unknown".into()),
            wind_speed: round1(current.wind_speed.unwrap_or(0.0)),
            timestamp,
        },
        source: WeatherSource::Live,
    }
}

/// Synthetic reading within plausible bounds.
pub fn mock_reading<R: Rng + ?Sized>(rng: &mut R) -> WeatherReading {
    let condition = MOCK_CONDITIONS[rng.gen_range(0..MOCK_CONDITIONS.len())];
    WeatherReading {
        conditions: WeatherConditions {
            temperature: round1(20.0 + rng.gen::<f64>() * 15.0),
            humidity: round1(40.0 + rng.gen::<f64>() * 40.0),
            rainfall: round1(50.0 + rng.gen::<f64>() * 150.0),
            condition: condition.to_string(),
            description: "Simulated weather conditions".to_string(),
            wind_speed: round1(2.0 + rng.gen::<f64>() * 8.0),
            timestamp: Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        },
        source: WeatherSource::Mock,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

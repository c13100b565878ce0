//! Yieldcast: crop yield estimation service
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the weather provider and optional trained model into the
//! prediction service, and serves the HTTP API until Ctrl+C.

use anyhow::Result;
use chrono::Duration as ChronoDuration;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use yieldcast::api;
use yieldcast::config;
use yieldcast::data::cache::WeatherCache;
use yieldcast::data::openweathermap::OpenWeatherMapClient;
use yieldcast::data::weather::WeatherProvider;
use yieldcast::data::LiveWeather;
use yieldcast::engine::regressor;
use yieldcast::engine::service::YieldPredictionService;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path = std::env::var("YIELDCAST_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    info!(
        config = %config_path,
        port = cfg.server.port,
        cache_ttl_secs = cfg.weather.cache_ttl_secs,
        "Yieldcast starting up"
    );

    // -- Weather ---------------------------------------------------------

    let live: Option<Box<dyn LiveWeather>> = match cfg.weather_api_key() {
        Some(key) => {
            info!(base_url = %cfg.weather.base_url, "Live weather enabled");
            Some(Box::new(OpenWeatherMapClient::new(
                key,
                &cfg.weather.base_url,
                Duration::from_secs(cfg.weather.timeout_secs),
            )?))
        }
        None => {
            warn!(
                env = %cfg.weather.api_key_env,
                "No weather API key configured, using mock weather data"
            );
            None
        }
    };
    let cache = WeatherCache::new(ChronoDuration::seconds(cfg.weather.cache_ttl_secs));
    let weather = WeatherProvider::new(live, cache);

    // -- Model -----------------------------------------------------------

    info!("Initializing yield prediction model");
    let model = regressor::load_first(&cfg.model.search_paths);

    let service = Arc::new(YieldPredictionService::new(weather, model));

    api::serve(service, cfg.socket_addr()?).await?;

    info!("Yieldcast shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("yieldcast=info"));

    let json_logging = std::env::var("YIELDCAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}

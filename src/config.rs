//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The weather API key is referenced by env-var name in the config and
//! resolved at runtime.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::data::cache::DEFAULT_TTL_SECS;
use crate::data::openweathermap::DEFAULT_BASE_URL;
use crate::types::YieldError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5002,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key_env: String,
    /// Consulted when `api_key_env` is unset or empty.
    pub fallback_key_env: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: i64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENWEATHER_API_KEY".to_string(),
            fallback_key_env: Some("VITE_OPENWEATHER_API_KEY".to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            cache_ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// Candidate artifact files, first existing one wins.
    pub search_paths: Vec<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), YieldError> {
        if self.weather.timeout_secs == 0 {
            return Err(YieldError::Config("weather.timeout_secs must be positive".into()));
        }
        if self.weather.cache_ttl_secs <= 0 {
            return Err(YieldError::Config("weather.cache_ttl_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| {
                format!("Invalid server address {}:{}", self.server.host, self.server.port)
            })
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// The weather API key, if one is configured and non-empty.
    pub fn weather_api_key(&self) -> Option<SecretString> {
        let lookup = |name: &str| {
            Self::resolve_env(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
        };
        lookup(&self.weather.api_key_env)
            .or_else(|| self.weather.fallback_key_env.as_deref().and_then(lookup))
            .map(SecretString::new)
    }
}

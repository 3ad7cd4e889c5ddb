use common::errors::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use weather_gateway::TemperatureUnit;

/// Dashboard settings. Provider settings live in [`weather_gateway::Config`]
/// so favorites can be managed without an API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub refresh_interval_seconds: u64,
    pub favorites_path: PathBuf,
    pub temperature_unit: TemperatureUnit,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            refresh_interval_seconds: env::var("REFRESH_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(60),
            favorites_path: env::var("FAVORITES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("favorites.json")),
            temperature_unit: match env::var("TEMPERATURE_UNIT") {
                Ok(value) => value.parse()?,
                Err(_) => TemperatureUnit::default(),
            },
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

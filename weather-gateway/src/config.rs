use common::errors::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Which zone decides where one forecast day ends and the next begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayBoundary {
    /// The zone of the machine running the dashboard
    #[default]
    Local,
    /// The UTC offset the provider reports for the city
    City,
}

impl FromStr for DayBoundary {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "city" => Ok(Self::City),
            other => Err(AppError::config(format!(
                "Unknown day boundary '{}', expected local or city",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub cache_ttl_seconds: u64,
    pub http_timeout_seconds: u64,
    pub http_max_retries: u32,
    pub day_boundary: DayBoundary,
}

impl Config {
    /// Defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl_seconds: 60,
            http_timeout_seconds: 10,
            http_max_retries: 0,
            day_boundary: DayBoundary::Local,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("OPENWEATHER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config("OPENWEATHER_API_KEY must be set"))?;

        let defaults = Self::new(api_key);

        Ok(Self {
            base_url: env::var("OPENWEATHER_URL").unwrap_or(defaults.base_url),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cache_ttl_seconds),
            http_timeout_seconds: env::var("HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_timeout_seconds),
            http_max_retries: env::var("HTTP_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.http_max_retries),
            day_boundary: match env::var("FORECAST_DAY_BOUNDARY") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.day_boundary,
            },
            api_key: defaults.api_key,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.http_max_retries, 0);
        assert_eq!(config.day_boundary, DayBoundary::Local);
    }

    #[test]
    fn test_day_boundary_parsing() {
        assert_eq!("City".parse::<DayBoundary>().ok(), Some(DayBoundary::City));
        assert_eq!("local".parse::<DayBoundary>().ok(), Some(DayBoundary::Local));
        assert!("utc".parse::<DayBoundary>().is_err());
    }
}

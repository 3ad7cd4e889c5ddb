use crate::aggregator::aggregate;
use crate::cache::{CacheKey, ExpiringCache};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, DayBoundary};
use crate::provider::{CurrentResponse, FindResponse, ForecastResponse};
use chrono::{FixedOffset, Local, Offset, Utc};
use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::{CityMatch, ForecastBundle, WeatherSnapshot};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Queries shorter than this never reach the provider.
pub const MIN_QUERY_CHARS: usize = 2;

/// Upper bound on search matches.
pub const MAX_SEARCH_RESULTS: usize = 5;

/// Number of 3-hour samples requested: five days.
pub const FORECAST_SAMPLES: usize = 40;

/// Values the gateway keeps in its cache
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Current(WeatherSnapshot),
    Forecast(ForecastBundle),
}

pub type GatewayCache = ExpiringCache<CachedPayload>;

/// Result policy for interactive search: a failed lookup is logged and
/// reported as no matches.
trait EmptyOnFailure<T> {
    fn empty_on_failure(self, query: &str) -> Vec<T>;
}

impl<T> EmptyOnFailure<T> for Result<Vec<T>, AppError> {
    fn empty_on_failure(self, query: &str) -> Vec<T> {
        self.unwrap_or_else(|e| {
            warn!(query = %query, error = %e, "City search failed, returning no matches");
            Vec::new()
        })
    }
}

/// Client for the OpenWeatherMap API with an expiring result cache
pub struct WeatherGateway {
    http_client: HttpClient,
    cache: Arc<GatewayCache>,
    clock: Arc<dyn Clock>,
    base_url: String,
    api_key: String,
    day_boundary: DayBoundary,
}

impl WeatherGateway {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Gateway with its own cache driven by `clock`.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let cache = Arc::new(ExpiringCache::new(config.cache_ttl(), clock.clone()));
        Self::with_cache(config, cache, clock)
    }

    /// Gateway sharing an existing cache. Snapshot timestamps read `clock`.
    pub fn with_cache(
        config: &Config,
        cache: Arc<GatewayCache>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            http_client: HttpClient::new(config.http_timeout_seconds, config.http_max_retries)?,
            cache,
            clock,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            day_boundary: config.day_boundary,
        })
    }

    /// Looks up cities matching `query`.
    ///
    /// Never fails: queries under [`MIN_QUERY_CHARS`] return nothing without a
    /// request, and provider failures are logged and turned into an empty list
    /// so interactive search is not blocked by an outage. Use
    /// [`try_search_cities`](Self::try_search_cities) to see the error.
    pub async fn search_cities(&self, query: &str) -> Vec<CityMatch> {
        self.try_search_cities(query).await.empty_on_failure(query)
    }

    #[instrument(skip(self), fields(query = %query))]
    pub async fn try_search_cities(&self, query: &str) -> Result<Vec<CityMatch>, AppError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        info!(query = %query, "Searching cities");

        let url = format!("{}/find", self.base_url);
        let limit = MAX_SEARCH_RESULTS.to_string();
        let response: FindResponse = self
            .http_client
            .get_json(
                &url,
                &[
                    ("q", query),
                    ("appid", self.api_key.as_str()),
                    ("cnt", limit.as_str()),
                ],
            )
            .await?;

        Ok(response.into_matches(MAX_SEARCH_RESULTS))
    }

    /// Current conditions for `city`, served from cache while fresh.
    ///
    /// Errors propagate; a rejected key surfaces as
    /// [`AppError::InvalidApiKey`].
    #[instrument(skip(self), fields(city = %city))]
    pub async fn get_current_weather(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let key = CacheKey::Current(city).to_string();
        if let Some(CachedPayload::Current(cached)) = self.cache.get(&key).await {
            info!(city = %city, "Cache hit");
            return Ok(cached);
        }

        info!(city = %city, "Fetching current weather from API");

        let url = format!("{}/weather", self.base_url);
        let response: CurrentResponse = self
            .http_client
            .get_json(
                &url,
                &[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")],
            )
            .await?;

        let snapshot = response.into_snapshot(self.clock.now_millis())?;

        self.cache
            .set(key, CachedPayload::Current(snapshot.clone()))
            .await;

        Ok(snapshot)
    }

    /// Five-day summary and next-24-hour slice for `city`, served from cache
    /// while fresh.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn get_forecast(&self, city: &str) -> Result<ForecastBundle, AppError> {
        let key = CacheKey::Forecast(city).to_string();
        if let Some(CachedPayload::Forecast(cached)) = self.cache.get(&key).await {
            info!(city = %city, "Cache hit");
            return Ok(cached);
        }

        info!(city = %city, "Fetching forecast from API");

        let url = format!("{}/forecast", self.base_url);
        let count = FORECAST_SAMPLES.to_string();
        let response: ForecastResponse = self
            .http_client
            .get_json(
                &url,
                &[
                    ("q", city),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                    ("cnt", count.as_str()),
                ],
            )
            .await?;

        let offset_seconds = response.utc_offset_seconds();
        let samples = response.into_samples();
        let bundle = match self.day_boundary {
            DayBoundary::Local => aggregate(&samples, &Local),
            DayBoundary::City => {
                let offset = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| Utc.fix());
                aggregate(&samples, &offset)
            }
        };

        info!(
            city = %city,
            samples = samples.len(),
            days = bundle.forecast.len(),
            "Forecast aggregated"
        );

        self.cache
            .set(key, CachedPayload::Forecast(bundle.clone()))
            .await;

        Ok(bundle)
    }
}

//! OpenWeatherMap 2.5 response shapes and their mapping into the shared model.

use crate::aggregator::ForecastSample;
use crate::units::{ms_to_kmh, round_half_up};
use common::errors::AppError;
use common::models::{CityMatch, WeatherSnapshot};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Condition {
    main: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindResponse {
    #[serde(default)]
    list: Vec<FindItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindItem {
    name: String,
    sys: Sys,
    coord: Coord,
}

impl FindResponse {
    pub(crate) fn into_matches(self, limit: usize) -> Vec<CityMatch> {
        self.list
            .into_iter()
            .take(limit)
            .map(|city| CityMatch {
                name: city.name,
                country: city.sys.country,
                lat: city.coord.lat,
                lon: city.coord.lon,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrentResponse {
    id: i64,
    name: String,
    sys: Sys,
    main: CurrentMain,
    wind: Wind,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentResponse {
    /// Builds a snapshot stamped with `timestamp` (epoch ms).
    pub(crate) fn into_snapshot(self, timestamp: i64) -> Result<WeatherSnapshot, AppError> {
        let condition = self.weather.into_iter().next().ok_or_else(|| {
            AppError::invalid_response(format!("no weather condition for {}", self.name))
        })?;

        Ok(WeatherSnapshot {
            id: self.id.to_string(),
            name: self.name,
            country: self.sys.country,
            temp: round_half_up(self.main.temp),
            feels_like: round_half_up(self.main.feels_like),
            humidity: self.main.humidity,
            wind_speed: ms_to_kmh(self.wind.speed),
            condition: condition.main,
            icon: condition.icon,
            timestamp,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastItem>,
    #[serde(default)]
    city: Option<ForecastCity>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: ForecastMain,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastCity {
    /// Shift in seconds from UTC
    #[serde(default)]
    timezone: i32,
}

impl ForecastResponse {
    pub(crate) fn utc_offset_seconds(&self) -> i32 {
        self.city.as_ref().map_or(0, |c| c.timezone)
    }

    pub(crate) fn into_samples(self) -> Vec<ForecastSample> {
        self.list
            .into_iter()
            .map(|item| {
                let (condition, icon) = item
                    .weather
                    .into_iter()
                    .next()
                    .map(|c| (c.main, c.icon))
                    .unwrap_or_default();
                ForecastSample {
                    dt: item.dt,
                    temp: item.main.temp,
                    condition,
                    icon,
                    pop: item.pop,
                }
            })
            .collect()
    }
}

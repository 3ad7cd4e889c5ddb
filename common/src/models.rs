use serde::{Deserialize, Serialize};

/// A city returned by the provider's search endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CityMatch {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Point-in-time current conditions for a city.
///
/// Temperatures are whole degrees Celsius and wind speed is whole km/h.
/// A newer fetch replaces the snapshot rather than mutating it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub id: String,
    pub name: String,
    pub country: String,
    pub temp: i32,
    pub feels_like: i32,
    pub humidity: u8,
    pub wind_speed: i32,
    pub condition: String,
    pub icon: String,
    /// Capture time in epoch milliseconds
    pub timestamp: i64,
}

/// One calendar day summarised from 3-hour samples
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: String,
    pub max_temp: i32,
    pub min_temp: i32,
    pub condition: String,
    pub icon: String,
    pub precip_chance: u8,
}

/// One raw 3-hour sample projected for display
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyForecast {
    pub time: String,
    pub temp: i32,
    pub condition: String,
    pub icon: String,
    pub precip_chance: u8,
}

/// Daily summaries plus the next ~24 hours for a city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ForecastBundle {
    pub forecast: Vec<ForecastDay>,
    pub hourly: Vec<HourlyForecast>,
}

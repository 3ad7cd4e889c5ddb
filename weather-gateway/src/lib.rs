//! Weather gateway for the dashboard
//!
//! Fetches current conditions, city search results and 3-hour forecasts from
//! the OpenWeatherMap API, shapes them into the shared data model and keeps
//! short-lived results in an expiring cache.

pub mod aggregator;
pub mod api_client;
pub mod cache;
pub mod clock;
pub mod config;
pub mod provider;
pub mod units;

pub use api_client::WeatherGateway;
pub use cache::{CacheKey, ExpiringCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, DayBoundary};
pub use units::TemperatureUnit;

//! Terminal weather dashboard: favorites, periodically refreshed city cards
//! and their rendering.

pub mod cards;
pub mod config;
pub mod favorites;
pub mod render;
pub mod source;
pub mod store;

pub use cards::{CardSupervisor, CardUpdate, CardView, CityWeather, Dashboard, fetch_city};
pub use favorites::FavoritesList;
pub use source::WeatherSource;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

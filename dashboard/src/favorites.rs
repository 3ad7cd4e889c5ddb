use crate::store::KeyValueStore;
use common::errors::AppError;
use tracing::{info, warn};

/// Storage key holding the JSON-encoded city list.
pub const FAVORITES_KEY: &str = "weatherFavorites";

/// Seed used when nothing has been stored yet.
pub const DEFAULT_FAVORITES: [&str; 3] = ["London", "New York", "Tokyo"];

/// Ordered, duplicate-free list of favorite cities, written through to a
/// key-value store on every change.
#[derive(Debug)]
pub struct FavoritesList<K> {
    store: K,
    cities: Vec<String>,
}

impl<K: KeyValueStore> FavoritesList<K> {
    pub fn load(store: K) -> Result<Self, AppError> {
        let cities = match store.get(FAVORITES_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(stored) => dedup(stored),
                Err(e) => {
                    warn!(error = %e, "Stored favorites are unreadable, using defaults");
                    default_favorites()
                }
            },
            None => default_favorites(),
        };

        Ok(Self { store, cities })
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Appends `city` unless already present. Returns whether it was added.
    ///
    /// The in-memory list only changes once the store accepted the write.
    pub fn add(&mut self, city: &str) -> Result<bool, AppError> {
        if self.contains(city) {
            return Ok(false);
        }
        let mut cities = self.cities.clone();
        cities.push(city.to_string());
        self.commit(cities)?;
        info!(city = %city, "Favorite added");
        Ok(true)
    }

    /// Filters `city` out and persists the result. Returns whether it was
    /// present; the list is unchanged otherwise.
    pub fn remove(&mut self, city: &str) -> Result<bool, AppError> {
        let cities: Vec<String> = self.cities.iter().filter(|c| *c != city).cloned().collect();
        let removed = cities.len() != self.cities.len();
        self.commit(cities)?;
        if removed {
            info!(city = %city, "Favorite removed");
        }
        Ok(removed)
    }

    fn commit(&mut self, cities: Vec<String>) -> Result<(), AppError> {
        let encoded = serde_json::to_string(&cities)?;
        self.store.set(FAVORITES_KEY, &encoded)?;
        self.cities = cities;
        Ok(())
    }
}

fn default_favorites() -> Vec<String> {
    DEFAULT_FAVORITES.iter().map(|c| c.to_string()).collect()
}

fn dedup(cities: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(cities.len());
    for city in cities {
        if !unique.contains(&city) {
            unique.push(city);
        }
    }
    unique
}

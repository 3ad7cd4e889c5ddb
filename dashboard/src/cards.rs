//! Dashboard cards: one independently refreshing task per favorite city.

use crate::favorites::FavoritesList;
use crate::source::WeatherSource;
use crate::store::KeyValueStore;
use common::errors::AppError;
use common::models::{ForecastDay, HourlyForecast, WeatherSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Everything a card shows for one city
#[derive(Debug, Clone, PartialEq)]
pub struct CityWeather {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
    pub hourly: Vec<HourlyForecast>,
}

/// Failure as presented on a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardError {
    pub message: String,
    pub invalid_api_key: bool,
}

impl From<&AppError> for CardError {
    fn from(err: &AppError) -> Self {
        Self {
            message: err.user_message().to_string(),
            invalid_api_key: err.is_invalid_api_key(),
        }
    }
}

/// Result of one refresh of one card
#[derive(Debug, Clone)]
pub struct CardUpdate {
    pub city: String,
    /// Identifies the card run that produced the update
    pub card_id: u64,
    pub result: Result<CityWeather, CardError>,
}

/// Fetches current conditions and forecast concurrently; both must succeed.
pub async fn fetch_city<S: WeatherSource>(source: &S, city: &str) -> Result<CityWeather, AppError> {
    let (current, bundle) = tokio::join!(source.current(city), source.forecast(city));
    let current = current?;
    let bundle = bundle?;

    Ok(CityWeather {
        current,
        forecast: bundle.forecast,
        hourly: bundle.hourly,
    })
}

/// Owns the refresh task of every running card.
///
/// Each card has its own timer; cards are not coordinated with each other.
/// Stopping a card cancels its timer, and a fetch that was already in flight
/// is dropped when it completes.
pub struct CardSupervisor<S> {
    source: Arc<S>,
    interval: Duration,
    root: CancellationToken,
    cards: HashMap<String, RunningCard>,
    next_card_id: u64,
    updates: mpsc::Sender<CardUpdate>,
}

struct RunningCard {
    id: u64,
    token: CancellationToken,
}

impl<S: WeatherSource> CardSupervisor<S> {
    pub fn new(source: Arc<S>, interval: Duration) -> (Self, mpsc::Receiver<CardUpdate>) {
        let (updates, receiver) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let supervisor = Self {
            source,
            interval,
            root: CancellationToken::new(),
            cards: HashMap::new(),
            next_card_id: 0,
            updates,
        };
        (supervisor, receiver)
    }

    /// Starts refreshing `city` now and then every interval. Returns false if
    /// the card was already running.
    pub fn start(&mut self, city: &str) -> bool {
        if self.is_running(city) {
            return false;
        }

        let id = self.next_card_id;
        self.next_card_id += 1;
        let token = self.root.child_token();
        self.cards.insert(
            city.to_string(),
            RunningCard {
                id,
                token: token.clone(),
            },
        );

        let task = run_card(
            self.source.clone(),
            city.to_string(),
            id,
            self.interval,
            token,
            self.updates.clone(),
        );
        tokio::spawn(task.instrument(info_span!("card", city = %city)));

        info!(city = %city, interval_secs = self.interval.as_secs(), "Card started");
        true
    }

    /// Cancels the card for `city`. Returns false if none was running.
    pub fn stop(&mut self, city: &str) -> bool {
        match self.cards.remove(city) {
            Some(card) => {
                card.token.cancel();
                info!(city = %city, "Card stopped");
                true
            }
            None => false,
        }
    }

    /// A card that gave up on its own (closed update channel) counts as
    /// stopped and may be started again.
    pub fn is_running(&self, city: &str) -> bool {
        self.cards
            .get(city)
            .is_some_and(|card| !card.token.is_cancelled())
    }

    pub fn running(&self) -> impl Iterator<Item = &str> {
        self.cards
            .iter()
            .filter(|(_, card)| !card.token.is_cancelled())
            .map(|(city, _)| city.as_str())
    }

    /// Whether `update` came from the card currently running for its city.
    /// Updates left in the channel by a stopped card are stale even if the
    /// city has been started again since.
    pub fn is_current(&self, update: &CardUpdate) -> bool {
        self.cards
            .get(&update.city)
            .is_some_and(|card| card.id == update.card_id)
    }

    pub fn shutdown(&mut self) {
        self.root.cancel();
        self.cards.clear();
        info!("All cards stopped");
    }
}

impl<S> Drop for CardSupervisor<S> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

async fn run_card<S: WeatherSource>(
    source: Arc<S>,
    city: String,
    card_id: u64,
    interval: Duration,
    token: CancellationToken,
    updates: mpsc::Sender<CardUpdate>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = fetch_city(source.as_ref(), &city).await;

        if token.is_cancelled() {
            debug!(city = %city, "Card removed while fetching, discarding result");
            break;
        }

        let result = result.map_err(|e| {
            warn!(city = %city, error = %e, "Card refresh failed");
            CardError::from(&e)
        });

        let update = CardUpdate {
            city: city.clone(),
            card_id,
            result,
        };
        if updates.send(update).await.is_err() {
            debug!(city = %city, "Update receiver closed");
            token.cancel();
            break;
        }
    }
}

/// Last known state of a card
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardView {
    /// Most recent successful fetch; kept when a later refresh fails
    pub weather: Option<CityWeather>,
    pub error: Option<CardError>,
}

/// Favorites plus their running cards
pub struct Dashboard<S, K> {
    favorites: FavoritesList<K>,
    supervisor: CardSupervisor<S>,
    views: HashMap<String, CardView>,
}

impl<S: WeatherSource, K: KeyValueStore> Dashboard<S, K> {
    pub fn new(favorites: FavoritesList<K>, supervisor: CardSupervisor<S>) -> Self {
        Self {
            favorites,
            supervisor,
            views: HashMap::new(),
        }
    }

    /// Starts a card for every favorite.
    pub fn start(&mut self) {
        for city in self.favorites.cities() {
            self.supervisor.start(city);
        }
    }

    pub fn favorites(&self) -> &[String] {
        self.favorites.cities()
    }

    pub fn add_favorite(&mut self, city: &str) -> Result<bool, AppError> {
        let added = self.favorites.add(city)?;
        if added {
            self.supervisor.start(city);
        }
        Ok(added)
    }

    pub fn remove_favorite(&mut self, city: &str) -> Result<bool, AppError> {
        let removed = self.favorites.remove(city)?;
        self.supervisor.stop(city);
        self.views.remove(city);
        Ok(removed)
    }

    /// Records an update. Updates for cities no longer on the dashboard, or
    /// from a card run that has since been stopped, are ignored.
    pub fn apply(&mut self, update: CardUpdate) -> Option<&CardView> {
        if !self.favorites.contains(&update.city) || !self.supervisor.is_current(&update) {
            debug!(city = %update.city, card_id = update.card_id, "Ignoring stale update");
            return None;
        }

        let view = self.views.entry(update.city).or_default();
        match update.result {
            Ok(weather) => {
                view.weather = Some(weather);
                view.error = None;
            }
            Err(error) => view.error = Some(error),
        }
        Some(view)
    }

    pub fn view(&self, city: &str) -> Option<&CardView> {
        self.views.get(city)
    }

    pub fn is_running(&self, city: &str) -> bool {
        self.supervisor.is_running(city)
    }

    pub fn shutdown(&mut self) {
        self.supervisor.shutdown();
    }
}

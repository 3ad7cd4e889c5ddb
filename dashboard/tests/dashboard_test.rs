use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use weather_dashboard::favorites::FAVORITES_KEY;
use weather_dashboard::{
    CardSupervisor, Dashboard, FavoritesList, JsonFileStore, KeyValueStore, fetch_city,
};
use weather_gateway::{Config, DayBoundary, ManualClock, WeatherGateway};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const START_SECS: i64 = 1_705_276_800;

fn current_body(name: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "sys": { "country": "NO" },
        "main": { "temp": -3.5, "feels_like": -8.2, "humidity": 90 },
        "wind": { "speed": 2.5 },
        "weather": [{ "main": "Snow", "icon": "13d" }]
    })
}

fn forecast_body() -> Value {
    let list: Vec<Value> = (0..17)
        .map(|i| {
            json!({
                "dt": START_SECS + i * 3 * 3600,
                "main": { "temp": -5.0 + i as f64 },
                "weather": [{ "main": "Snow", "icon": "13d" }],
                "pop": 0.25
            })
        })
        .collect();
    json!({ "list": list, "city": { "timezone": 3600 } })
}

async fn mount_provider(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Oslo")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Oslo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Nowhere"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401 })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Nowhere"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401 })))
        .mount(server)
        .await;
}

fn gateway(server: &MockServer) -> Arc<WeatherGateway> {
    let config = Config::new("test-key")
        .with_base_url(server.uri())
        .with_day_boundary(DayBoundary::City);
    let clock = Arc::new(ManualClock::new(START_SECS * 1000));
    Arc::new(WeatherGateway::with_clock(&config, clock).expect("gateway"))
}

#[tokio::test]
async fn test_fetch_city_against_provider() {
    let mock_server = MockServer::start().await;
    mount_provider(&mock_server).await;

    let gateway = gateway(&mock_server);
    let weather = fetch_city(gateway.as_ref(), "Oslo").await.expect("fetch");

    assert_eq!(weather.current.temp, -3);
    assert_eq!(weather.current.feels_like, -8);
    assert_eq!(weather.current.wind_speed, 9);
    // 17 samples from midnight UTC at UTC+1 touch three local dates
    assert_eq!(weather.forecast.len(), 3);
    assert_eq!(weather.forecast[0].date, "1/15/2024");
    assert_eq!(weather.forecast[0].precip_chance, 25);
    assert_eq!(weather.hourly.len(), 8);
    assert_eq!(weather.hourly[0].time, "1 AM");
}

#[tokio::test]
async fn test_dashboard_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_provider(&mock_server).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let favorites_path = dir.path().join("favorites.json");
    let mut store = JsonFileStore::new(&favorites_path);
    store
        .set(FAVORITES_KEY, r#"["Oslo","Nowhere"]"#)
        .expect("seed favorites");

    let (supervisor, mut updates) =
        CardSupervisor::new(gateway(&mock_server), Duration::from_secs(60));
    let favorites = FavoritesList::load(JsonFileStore::new(&favorites_path)).expect("load");
    let mut dashboard = Dashboard::new(favorites, supervisor);
    dashboard.start();

    for _ in 0..2 {
        let update = tokio::time::timeout(Duration::from_secs(5), updates.recv())
            .await
            .expect("update in time")
            .expect("channel open");
        dashboard.apply(update);
    }

    let oslo = dashboard.view("Oslo").expect("Oslo card");
    assert_eq!(
        oslo.weather.as_ref().map(|w| w.current.condition.as_str()),
        Some("Snow")
    );
    assert!(oslo.error.is_none());

    let nowhere = dashboard.view("Nowhere").expect("Nowhere card");
    assert!(nowhere.weather.is_none());
    assert!(nowhere.error.as_ref().is_some_and(|e| e.invalid_api_key));

    assert!(dashboard.remove_favorite("Nowhere").expect("remove"));
    dashboard.shutdown();

    let reloaded = FavoritesList::load(JsonFileStore::new(&favorites_path)).expect("load");
    assert_eq!(reloaded.cities(), ["Oslo"]);
}

//! Plain-text rendering of cards for the terminal.

use crate::cards::CardView;
use common::models::{CityMatch, ForecastDay, HourlyForecast, WeatherSnapshot};
use std::fmt::Write;
use weather_gateway::TemperatureUnit;

pub fn city_match(city: &CityMatch) -> String {
    format!("{}, {} ({:.4}, {:.4})", city.name, city.country, city.lat, city.lon)
}

pub fn snapshot(current: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    format!(
        "{}, {}: {}{} (feels like {}{}), {}, humidity {}%, wind {} km/h",
        current.name,
        current.country,
        unit.convert(current.temp),
        unit.symbol(),
        unit.convert(current.feels_like),
        unit.symbol(),
        current.condition,
        current.humidity,
        current.wind_speed,
    )
}

pub fn forecast(days: &[ForecastDay], hourly: &[HourlyForecast], unit: TemperatureUnit) -> String {
    let mut out = String::new();
    for day in days {
        let _ = writeln!(
            out,
            "  {:<10} {:>4}{} / {:>4}{}  {:<12} {:>3}% precip",
            day.date,
            unit.convert(day.max_temp),
            unit.symbol(),
            unit.convert(day.min_temp),
            unit.symbol(),
            day.condition,
            day.precip_chance,
        );
    }
    if !hourly.is_empty() {
        out.push_str("  next 24h:");
        for hour in hourly {
            let _ = write!(
                out,
                " {} {}{} {}%;",
                hour.time,
                unit.convert(hour.temp),
                unit.symbol(),
                hour.precip_chance
            );
        }
        out.push('\n');
    }
    out
}

pub fn card(city: &str, view: &CardView, unit: TemperatureUnit) -> String {
    let mut out = String::new();
    match &view.weather {
        Some(weather) => {
            out.push_str(&snapshot(&weather.current, unit));
            out.push('\n');
            out.push_str(&forecast(&weather.forecast, &weather.hourly, unit));
        }
        None => {
            out.push_str(city);
            out.push('\n');
        }
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  error loading {}: {}", city, error.message);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardError;

    fn london() -> WeatherSnapshot {
        WeatherSnapshot {
            id: "2643743".to_string(),
            name: "London".to_string(),
            country: "GB".to_string(),
            temp: 20,
            feels_like: 18,
            humidity: 64,
            wind_speed: 36,
            condition: "Clouds".to_string(),
            icon: "04d".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_snapshot_in_fahrenheit() {
        let line = snapshot(&london(), TemperatureUnit::Fahrenheit);
        assert_eq!(
            line,
            "London, GB: 68°F (feels like 64°F), Clouds, humidity 64%, wind 36 km/h"
        );
    }

    #[test]
    fn test_forecast_lines() {
        let days = vec![ForecastDay {
            date: "1/15/2024".to_string(),
            max_temp: 18,
            min_temp: 10,
            condition: "Rain".to_string(),
            icon: "10d".to_string(),
            precip_chance: 50,
        }];
        let hourly = vec![HourlyForecast {
            time: "3 PM".to_string(),
            temp: 15,
            condition: "Rain".to_string(),
            icon: "10d".to_string(),
            precip_chance: 30,
        }];

        let text = forecast(&days, &hourly, TemperatureUnit::Celsius);
        assert!(text.contains("1/15/2024"));
        assert!(text.contains("18°C"));
        assert!(text.contains("50% precip"));
        assert!(text.contains("3 PM 15°C 30%;"));
    }

    #[test]
    fn test_card_without_data_shows_error() {
        let view = CardView {
            weather: None,
            error: Some(CardError {
                message: "Failed to fetch weather data".to_string(),
                invalid_api_key: false,
            }),
        };
        let text = card("Tokyo", &view, TemperatureUnit::Celsius);
        assert!(text.starts_with("Tokyo\n"));
        assert!(text.contains("error loading Tokyo: Failed to fetch weather data"));
    }

    #[test]
    fn test_city_match() {
        let city = CityMatch {
            name: "Paris".to_string(),
            country: "FR".to_string(),
            lat: 48.8534,
            lon: 2.3488,
        };
        assert_eq!(city_match(&city), "Paris, FR (48.8534, 2.3488)");
    }
}

use common::errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rounds half-way values toward positive infinity, so `2.5 -> 3` and
/// `-2.5 -> -2`.
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Converts m/s to whole km/h.
pub fn ms_to_kmh(speed: f64) -> i32 {
    round_half_up(speed * 3.6)
}

/// Converts a 0.0-1.0 probability to a whole percentage clamped to 0-100.
pub fn probability_percent(pop: f64) -> u8 {
    round_half_up(pop * 100.0).clamp(0, 100) as u8
}

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Converts a whole-degree Celsius value for display in this unit.
    pub fn convert(&self, celsius: i32) -> i32 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => round_half_up(f64::from(celsius) * 9.0 / 5.0 + 32.0),
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celsius" | "c" | "metric" => Ok(Self::Celsius),
            "fahrenheit" | "f" | "imperial" => Ok(Self::Fahrenheit),
            other => Err(AppError::config(format!(
                "Unknown temperature unit '{}', expected celsius or fahrenheit",
                other
            ))),
        }
    }
}

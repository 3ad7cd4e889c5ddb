use common::errors::AppError;
use common::models::{ForecastBundle, WeatherSnapshot};
use std::future::Future;
use weather_gateway::WeatherGateway;

/// Where dashboard cards get their data from
pub trait WeatherSource: Send + Sync + 'static {
    fn current(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherSnapshot, AppError>> + Send;

    fn forecast(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<ForecastBundle, AppError>> + Send;
}

impl WeatherSource for WeatherGateway {
    fn current(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<WeatherSnapshot, AppError>> + Send {
        self.get_current_weather(city)
    }

    fn forecast(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<ForecastBundle, AppError>> + Send {
        self.get_forecast(city)
    }
}

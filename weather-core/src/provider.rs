use crate::{
    Config, CurrentConditions, Forecast, LocationQuery, ValidationError, WeatherError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and the short-term forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Whether a usable API key is available. Checked before any request.
    fn has_credentials(&self) -> bool;

    async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    if !config.is_api_key_configured() {
        return Err(anyhow::anyhow!(
            "{}\nHint: run `weather configure` and enter your API key.",
            ValidationError::MissingApiKey
        ));
    }

    Ok(OpenWeatherProvider::new(config))
}

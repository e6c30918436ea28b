//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (current conditions + 3-hour forecast)
//! - Display formatting and rendering onto an abstract surface
//! - The search orchestrator that ties them together
//!
//! It is used by `weather-cli`, but any front end that implements
//! [`DisplaySurface`] can drive an [`Orchestrator`].

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod query;
pub mod render;

pub use config::{Config, Endpoints};
pub use error::{ValidationError, WeatherError};
pub use format::{ClockStyle, Formatting, Units};
pub use model::{
    Coordinates, CurrentConditions, DisplayState, FORECAST_LIMIT, Forecast, ForecastEntry,
    LocationQuery,
};
pub use orchestrator::{Orchestrator, SearchOutcome};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use query::{QueryKind, classify};
pub use render::{DisplaySurface, ForecastBlock, MemorySurface, StatusTone, SummaryView};

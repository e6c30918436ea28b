use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

use crate::{
    Config, CurrentConditions, Forecast, ForecastEntry, LocationQuery, QueryKind, Units,
    WeatherError,
    config::is_placeholder_key,
    error::Endpoint,
    model::Coordinates,
};

use super::WeatherProvider;

/// Client for the OpenWeather 2.5 current-weather and 5-day/3-hour forecast APIs.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    zip_country: String,
    current_url: String,
    forecast_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("units", &self.units)
            .field("zip_country", &self.zip_country)
            .field("current_url", &self.current_url)
            .field("forecast_url", &self.forecast_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherProvider {
    /// Build a client from config. A missing key is reported by
    /// [`WeatherProvider::has_credentials`], not here.
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key().unwrap_or_default().to_string(),
            units: config.units,
            zip_country: config.zip_country.clone(),
            current_url: config.endpoints.current_url.clone(),
            forecast_url: config.endpoints.forecast_url.clone(),
            http: Client::new(),
        }
    }

    /// One GET, one parse. No retries.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        debug!(%endpoint, url, "sending OpenWeather request");

        let res = self
            .http
            .get(url)
            .query(&[("appid", self.api_key.as_str()), ("units", self.units.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        if !status.is_success() {
            warn!(%endpoint, %status, "OpenWeather request failed");
            return Err(WeatherError::Request {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Parse { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    sys: Option<OwSys>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Option<Vec<OwWeather>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(parsed: OwCurrentResponse) -> Self {
        let weather = parsed.weather.into_iter().flatten().next();
        let (description, icon) = match weather {
            Some(w) => (w.description, non_empty(w.icon)),
            None => (None, None),
        };
        let main = parsed.main;

        CurrentConditions {
            name: parsed.name,
            country: non_empty(parsed.sys.and_then(|s| s.country)),
            description,
            icon,
            temp: main.as_ref().and_then(|m| m.temp),
            temp_min: main.as_ref().and_then(|m| m.temp_min),
            temp_max: main.as_ref().and_then(|m| m.temp_max),
            humidity: main.as_ref().and_then(|m| m.humidity),
            coord: Coordinates {
                lat: parsed.coord.lat,
                lon: parsed.coord.lon,
            },
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(entry: OwForecastEntry) -> Self {
        let weather = entry.weather.into_iter().flatten().next();
        let (label, icon) = match weather {
            Some(w) => (w.main, non_empty(w.icon)),
            None => (None, None),
        };

        ForecastEntry {
            timestamp: entry.dt_txt,
            temp: entry.main.temp,
            label,
            icon,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn has_credentials(&self) -> bool {
        !is_placeholder_key(&self.api_key)
    }

    #[instrument(skip_all, fields(query = %query))]
    async fn fetch_current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let zip;
        let params = match query.kind() {
            QueryKind::PostalCode => {
                zip = format!("{},{}", query.as_str(), self.zip_country);
                [("zip", zip.as_str())]
            }
            QueryKind::PlaceName => [("q", query.as_str())],
        };

        let parsed: OwCurrentResponse = self
            .get_json(Endpoint::Current, &self.current_url, &params)
            .await?;

        Ok(parsed.into())
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        let parsed: OwForecastResponse = self
            .get_json(
                Endpoint::Forecast,
                &self.forecast_url,
                &[("lat", lat.as_str()), ("lon", lon.as_str())],
            )
            .await?;

        debug!(entries = parsed.list.len(), "forecast received");

        Ok(Forecast::from_entries(parsed.list.into_iter().map(ForecastEntry::from)))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

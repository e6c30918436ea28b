use serde::{Deserialize, Serialize};

use crate::query::{QueryKind, classify};

/// Forecast entries kept from the provider's 3-hour list (~24 hours).
pub const FORECAST_LIMIT: usize = 8;

/// A user-supplied location, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    text: String,
    kind: QueryKind,
}

impl LocationQuery {
    /// Trim the raw input and reject it if nothing is left.
    pub fn parse(input: &str) -> Result<Self, crate::ValidationError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(crate::ValidationError::EmptyLocation);
        }

        Ok(Self {
            text: text.to_owned(),
            kind: classify(text),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions as reported by the provider.
///
/// Only `name` and `coord` are guaranteed; everything else is optional and
/// rendered as a placeholder when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    pub country: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub temp: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    /// Relative humidity in percent, as reported (may be fractional).
    pub humidity: Option<f64>,
    pub coord: Coordinates,
}

/// One 3-hour prediction point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Provider timestamp, `YYYY-MM-DD HH:MM:SS` in local time.
    pub timestamp: String,
    pub temp: f64,
    pub label: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// Keep the first [`FORECAST_LIMIT`] entries in their original order.
    pub fn from_entries(entries: impl IntoIterator<Item = ForecastEntry>) -> Self {
        Self {
            entries: entries.into_iter().take(FORECAST_LIMIT).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Shown,
    Error,
}

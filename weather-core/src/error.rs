use reqwest::StatusCode;
use thiserror::Error;

/// Problems caught before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("location is empty")]
    EmptyLocation,

    #[error("no OpenWeather API key configured")]
    MissingApiKey,
}

impl ValidationError {
    /// Guidance shown on the status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::EmptyLocation => "Enter a city or 5-digit zip code.",
            ValidationError::MissingApiKey => {
                "Add your OpenWeather API key before running (run `weather configure` or set OPENWEATHER_API_KEY)."
            }
        }
    }
}

/// Which provider endpoint an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Current,
    Forecast,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Endpoint::Current => "current weather",
            Endpoint::Forecast => "forecast",
        })
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider answered with a non-success status.
    #[error("{endpoint} request failed with status {status}: {body}")]
    Request {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    /// The body was not JSON or lacked a required field.
    #[error("failed to parse {endpoint} response: {source}")]
    Parse {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    /// Connection, TLS or body read failure.
    #[error("failed to reach {endpoint} endpoint: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl WeatherError {
    /// HTTP status for [`WeatherError::Request`], if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            WeatherError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            WeatherError::Request { endpoint, .. }
            | WeatherError::Parse { endpoint, .. }
            | WeatherError::Transport { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }
}

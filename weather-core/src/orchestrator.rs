//! The search flow: validate, fetch current conditions, fetch the forecast for
//! the returned coordinates, render.
//!
//! `submit` is the only entry point; whatever handles UI events calls it.
//! Every search that passes validation takes a new generation number, and a
//! search that finishes after a newer one started leaves the screen alone.
//! Rejected input only updates the status line and never cancels a search
//! already in flight.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    CurrentConditions, DisplayState, Forecast, LocationQuery, ValidationError, WeatherError,
    WeatherProvider,
    format::Formatting,
    render::{DisplaySurface, StatusTone, render_current, render_forecast},
};

pub const LOADING_MESSAGE: &str = "Loading weather...";
pub const FAILURE_MESSAGE: &str = "Could not load weather. Check the city/zip and your API key.";

/// How a call to [`Orchestrator::submit`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Both fetches succeeded and the results are on screen.
    Shown,
    /// Input or configuration was rejected before any request.
    Rejected(ValidationError),
    /// A fetch failed; the screen shows the generic failure message.
    Failed,
    /// A newer search started while this one was in flight; its result was dropped.
    Superseded,
}

#[derive(Debug)]
struct Screen<S> {
    surface: S,
    state: DisplayState,
}

#[derive(Debug)]
pub struct Orchestrator<P, S> {
    provider: Arc<P>,
    formatting: Formatting,
    screen: Mutex<Screen<S>>,
    generation: AtomicU64,
}

impl<P, S> Orchestrator<P, S>
where
    P: WeatherProvider + 'static,
    S: DisplaySurface,
{
    pub fn new(provider: P, surface: S, formatting: Formatting) -> Self {
        Self {
            provider: Arc::new(provider),
            formatting,
            screen: Mutex::new(Screen {
                surface,
                state: DisplayState::Idle,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn state(&self) -> DisplayState {
        self.screen.lock().await.state
    }

    /// Read the surface without taking it out.
    pub async fn inspect<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.screen.lock().await.surface)
    }

    pub fn into_surface(self) -> S {
        self.screen.into_inner().surface
    }

    /// Run one search for `input` and draw the result.
    pub async fn submit(&self, input: &str) -> SearchOutcome {
        let query = match self.validate(input) {
            Ok(query) => query,
            Err(err) => {
                info!(reason = %err, "search rejected");
                let mut screen = self.screen.lock().await;
                screen.surface.set_status(err.user_message(), StatusTone::Error);
                screen.state = DisplayState::Error;
                return SearchOutcome::Rejected(err);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut screen = self.screen.lock().await;
            screen.surface.set_status(LOADING_MESSAGE, StatusTone::Info);
            screen.surface.set_panel_visible(false);
            screen.state = DisplayState::Loading;
        }

        let result = self.fetch(query).await;

        let mut screen = self.screen.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding result of superseded search");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok((current, forecast)) => {
                render_current(&mut screen.surface, &current, &self.formatting);
                render_forecast(&mut screen.surface, &forecast, &self.formatting);
                screen.surface.set_status("", StatusTone::Info);
                screen.state = DisplayState::Shown;
                SearchOutcome::Shown
            }
            Err(err) => {
                error!(error = %err, status = ?err.status(), "weather search failed");
                screen.surface.set_status(FAILURE_MESSAGE, StatusTone::Error);
                screen.state = DisplayState::Error;
                SearchOutcome::Failed
            }
        }
    }

    fn validate(&self, input: &str) -> Result<LocationQuery, ValidationError> {
        let query = LocationQuery::parse(input)?;
        if !self.provider.has_credentials() {
            return Err(ValidationError::MissingApiKey);
        }
        Ok(query)
    }

    /// Current conditions first, then the forecast for the coordinates they carry.
    ///
    /// Runs as its own task so a panic inside the provider surfaces as
    /// [`WeatherError::Unexpected`] instead of unwinding through the caller.
    async fn fetch(&self, query: LocationQuery) -> Result<(CurrentConditions, Forecast), WeatherError> {
        let provider = Arc::clone(&self.provider);

        let task = tokio::spawn(async move {
            let current = provider.fetch_current(&query).await?;
            let forecast = provider
                .fetch_forecast(current.coord.lat, current.coord.lon)
                .await?;
            Ok::<_, WeatherError>((current, forecast))
        });

        match task.await {
            Ok(result) => result,
            Err(join_err) => Err(WeatherError::Unexpected(join_err.to_string())),
        }
    }
}

//! Projection of weather data onto a display surface.
//!
//! The renderer never fails: any optional field that is missing degrades to a
//! placeholder so a successful fetch always produces a complete screen.

use serde::Serialize;

use crate::{
    CurrentConditions, Forecast,
    format::Formatting,
    model::FORECAST_LIMIT,
};

/// Shown in place of a missing value.
pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Info,
    Error,
}

/// Text for the summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub place: String,
    pub description: String,
    pub icon_url: Option<String>,
    pub current: String,
    pub high: String,
    pub low: String,
    pub humidity: String,
}

/// One block of the forecast strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastBlock {
    pub time: String,
    pub icon_url: Option<String>,
    pub temp: String,
    pub label: String,
}

/// The UI-binding object: whatever actually draws the page.
pub trait DisplaySurface: Send {
    fn set_status(&mut self, message: &str, tone: StatusTone);

    fn set_panel_visible(&mut self, visible: bool);

    fn set_summary(&mut self, summary: &SummaryView);

    fn clear_forecast(&mut self);

    fn push_forecast(&mut self, block: &ForecastBlock);
}

pub fn summary_view(data: &CurrentConditions, fmt: &Formatting) -> SummaryView {
    let place = match &data.country {
        Some(country) => format!("{}, {country}", data.name),
        None => data.name.clone(),
    };

    let temp = |value: Option<f64>| value.map_or_else(|| PLACEHOLDER.to_owned(), |t| fmt.temp(t));

    SummaryView {
        place,
        description: data
            .description
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        icon_url: data.icon.as_deref().map(|code| fmt.icon(code)),
        current: temp(data.temp),
        high: temp(data.temp_max),
        low: temp(data.temp_min),
        humidity: data
            .humidity
            .map_or_else(|| PLACEHOLDER.to_owned(), |h| format!("{h}%")),
    }
}

pub fn forecast_blocks(data: &Forecast, fmt: &Formatting) -> Vec<ForecastBlock> {
    data.entries
        .iter()
        .take(FORECAST_LIMIT)
        .map(|entry| ForecastBlock {
            time: fmt.time(&entry.timestamp),
            icon_url: entry.icon.as_deref().map(|code| fmt.icon(code)),
            temp: fmt.temp(entry.temp),
            label: entry.label.clone().unwrap_or_default(),
        })
        .collect()
}

/// Fill the summary panel and make it visible.
pub fn render_current<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    data: &CurrentConditions,
    fmt: &Formatting,
) {
    surface.set_summary(&summary_view(data, fmt));
    surface.set_panel_visible(true);
}

/// Replace the forecast strip with up to [`FORECAST_LIMIT`] blocks.
pub fn render_forecast<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    data: &Forecast,
    fmt: &Formatting,
) {
    surface.clear_forecast();
    for block in forecast_blocks(data, fmt) {
        surface.push_forecast(&block);
    }
}

/// Headless surface that just keeps what was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySurface {
    pub status: String,
    pub tone: StatusTone,
    pub panel_visible: bool,
    pub summary: Option<SummaryView>,
    pub forecast: Vec<ForecastBlock>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            status: String::new(),
            tone: StatusTone::Info,
            panel_visible: false,
            summary: None,
            forecast: Vec::new(),
        }
    }
}

impl DisplaySurface for MemorySurface {
    fn set_status(&mut self, message: &str, tone: StatusTone) {
        self.status = message.to_owned();
        self.tone = tone;
    }

    fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
    }

    fn set_summary(&mut self, summary: &SummaryView) {
        self.summary = Some(summary.clone());
    }

    fn clear_forecast(&mut self) {
        self.forecast.clear();
    }

    fn push_forecast(&mut self, block: &ForecastBlock) {
        self.forecast.push(block.clone());
    }
}

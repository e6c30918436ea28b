//! Pure display helpers: temperatures, clock times and icon references.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Provider timestamp layout, e.g. `2026-01-06 12:00:00`.
const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Locales that write clock times on a 12-hour dial.
const TWELVE_HOUR_LOCALES: &[&str] = &[
    "en_US", "en_CA", "en_AU", "en_NZ", "en_IN", "en_PH", "es_MX", "es_US", "hi_IN", "ar_EG",
    "ko_KR",
];

/// Unit system requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fahrenheit.
    #[default]
    Imperial,
    /// Celsius.
    Metric,
    /// Kelvin, unconverted.
    Standard,
}

impl Units {
    /// Value of the provider's `units` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Imperial, Units::Metric, Units::Standard]
    }

    fn suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
            Units::Standard => "",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            "standard" | "k" | "kelvin" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: imperial, metric, standard."
            )),
        }
    }
}

/// Hour convention for forecast times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockStyle {
    /// Follow the viewer's locale.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl ClockStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockStyle::Auto => "auto",
            ClockStyle::TwelveHour => "12h",
            ClockStyle::TwentyFourHour => "24h",
        }
    }

    pub const fn all() -> &'static [ClockStyle] {
        &[ClockStyle::Auto, ClockStyle::TwelveHour, ClockStyle::TwentyFourHour]
    }

    /// Replace `Auto` with a concrete style taken from `LC_ALL`, `LC_TIME` or `LANG`.
    pub fn resolve(self) -> ClockStyle {
        match self {
            ClockStyle::Auto => {
                let locale = ["LC_ALL", "LC_TIME", "LANG"]
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|v| !v.is_empty());

                locale
                    .as_deref()
                    .map(ClockStyle::from_locale)
                    .unwrap_or(ClockStyle::TwentyFourHour)
            }
            style => style,
        }
    }

    /// Clock convention for a POSIX or BCP 47 locale tag such as `en_US.UTF-8` or `de-DE`.
    pub fn from_locale(locale: &str) -> ClockStyle {
        let tag = locale
            .split(['.', '@'])
            .next()
            .unwrap_or_default()
            .replace('-', "_");

        let twelve_hour = if tag.contains('_') {
            TWELVE_HOUR_LOCALES.iter().any(|l| l.eq_ignore_ascii_case(&tag))
        } else {
            tag.eq_ignore_ascii_case("en")
        };

        if twelve_hour {
            ClockStyle::TwelveHour
        } else {
            ClockStyle::TwentyFourHour
        }
    }
}

impl std::fmt::Display for ClockStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the renderer needs to turn values into strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatting {
    pub units: Units,
    pub clock: ClockStyle,
    pub icon_base_url: String,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            units: Units::default(),
            clock: ClockStyle::TwelveHour,
            icon_base_url: DEFAULT_ICON_BASE_URL.to_owned(),
        }
    }
}

impl Formatting {
    pub fn temp(&self, value: f64) -> String {
        format_temp(value, self.units)
    }

    /// Formatted clock time, or the raw timestamp when it cannot be parsed.
    pub fn time(&self, timestamp: &str) -> String {
        format_time(timestamp, self.clock).unwrap_or_else(|_| timestamp.to_owned())
    }

    pub fn icon(&self, code: &str) -> String {
        icon_url(&self.icon_base_url, code)
    }
}

/// Round half up and append the unit, e.g. `72°F`.
pub fn format_temp(value: f64, units: Units) -> String {
    let rounded = (value + 0.5).floor() as i64;
    format!("{rounded}°{}", units.suffix())
}

/// Render a provider timestamp as a wall-clock time, e.g. `12:00 PM` or `12:00`.
pub fn format_time(timestamp: &str, clock: ClockStyle) -> Result<String, chrono::ParseError> {
    let dt = NaiveDateTime::parse_from_str(timestamp.trim(), PROVIDER_TIME_FORMAT)?;

    let pattern = match clock.resolve() {
        ClockStyle::TwentyFourHour => "%H:%M",
        _ => "%-I:%M %p",
    };

    Ok(dt.format(pattern).to_string())
}

/// (K − 273.15) × 9/5 + 32
pub fn kelvin_to_f(kelvin: f64) -> f64 {
    (kelvin - 273.15) * (9.0 / 5.0) + 32.0
}

pub fn icon_url(base: &str, code: &str) -> String {
    format!("{}/{code}@2x.png", base.trim_end_matches('/'))
}

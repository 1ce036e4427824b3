//! View-model for the forecast client.
//!
//! Everything a front end needs to draw lives in [`ForecastView`]: the status
//! line, the last forecast, and whether the save action is available.

use crate::model::{ForecastDay, ForecastResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

/// Single-line feedback shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub date: String,
    pub description: String,
    pub temperature: String,
    pub extra: String,
}

impl ForecastCard {
    pub fn from_day(day: &ForecastDay) -> Self {
        Self {
            date: day.date.clone(),
            description: day.description.clone().unwrap_or_default(),
            temperature: format!(
                "{}°C (feels {}°C)",
                round_half_up(day.temp),
                round_half_up(day.feels_like)
            ),
            extra: format!("Humidity: {}%", day.humidity),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastView {
    pub status: Option<Status>,
    /// Most recent successful response. Overwritten only by the next success.
    pub last_forecast: Option<ForecastResponse>,
    pub last_city: Option<String>,
    pub section_visible: bool,
    pub save_enabled: bool,
    pub saving: bool,
}

impl ForecastView {
    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn show_forecast(&mut self, forecast: ForecastResponse) {
        self.last_city = Some(forecast.city.clone());
        self.last_forecast = Some(forecast);
        self.section_visible = true;
    }

    pub fn hide_forecast(&mut self) {
        self.section_visible = false;
    }

    /// The visible forecast, if the section is shown.
    pub fn visible_forecast(&self) -> Option<&ForecastResponse> {
        self.last_forecast.as_ref().filter(|_| self.section_visible)
    }

    pub fn heading(&self) -> Option<String> {
        self.visible_forecast().map(heading)
    }

    /// Cards for the visible forecast. Empty while the section is hidden.
    pub fn cards(&self) -> Vec<ForecastCard> {
        self.visible_forecast().map(render_cards).unwrap_or_default()
    }
}

/// "City, CC", or just the city when the country is unknown.
pub fn heading(forecast: &ForecastResponse) -> String {
    match forecast.country.as_deref().map(str::trim) {
        Some(country) if !country.is_empty() => format!("{}, {}", forecast.city, country),
        _ => forecast.city.trim().to_string(),
    }
}

pub fn render_cards(forecast: &ForecastResponse) -> Vec<ForecastCard> {
    forecast.forecast.iter().map(ForecastCard::from_day).collect()
}

/// Halves round toward positive infinity: 20.5 -> 21, -2.5 -> -2.
pub fn round_half_up(value: f64) -> i64 {
    let rounded = value.round();
    // `f64::round` sends negative halves away from zero.
    if value < 0.0 && value - rounded == 0.5 {
        (rounded + 1.0) as i64
    } else {
        rounded as i64
    }
}

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;

use crate::{
    config::ProviderConfig,
    error::RequestError,
    model::{ForecastDay, ForecastRequest, ForecastResponse},
    source::error_field,
};

use super::ForecastSource;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Days kept from the 5-day/3-hour feed.
const MAX_DAYS: usize = 5;

/// Reads OpenWeather's 5-day/3-hour forecast and keeps one entry per day.
#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        match &config.base_url {
            Some(url) => Self::with_base_url(config.api_key.clone(), url),
            None => Self::new(config.api_key.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl ForecastSource for OpenWeatherSource {
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, RequestError> {
        let url = format!("{}/data/2.5/forecast", self.base_url);

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", request.city()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = error_field(&body, "message")
                .or_else(|| error_field(&body, "error"))
                .unwrap_or_else(|| format!("Request failed with {}", status.as_u16()));

            return Err(RequestError::Status { status: status.as_u16(), message });
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))?;

        Ok(condense(parsed))
    }
}

/// Keep the first entry of each UTC day, up to `MAX_DAYS` days.
fn condense(parsed: OwForecastResponse) -> ForecastResponse {
    let mut forecast: Vec<ForecastDay> = Vec::with_capacity(MAX_DAYS);
    let mut seen: HashSet<NaiveDate> = HashSet::new();

    for entry in parsed.list {
        let Some(date) = DateTime::<Utc>::from_timestamp(entry.dt, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if !seen.insert(date) {
            continue;
        }

        forecast.push(ForecastDay {
            date: date.format("%Y-%m-%d").to_string(),
            description: entry.weather.into_iter().next().map(|w| w.description),
            temp: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity: entry.main.humidity,
        });

        if forecast.len() >= MAX_DAYS {
            break;
        }
    }

    ForecastResponse {
        city: parsed.city.name,
        country: parsed.city.country.filter(|c| !c.is_empty()),
        forecast,
    }
}

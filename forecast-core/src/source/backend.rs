use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;

use crate::{
    config::BackendConfig,
    error::{RequestError, truncate_body},
    model::{ForecastRequest, ForecastResponse, SaveReceipt, SaveRequest},
    source::error_field,
};

use super::{ForecastSource, ForecastStore};

/// HTTP client for the forecast backend's `/weather` and `/save` routes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    weather_url: String,
    save_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: &str, route_prefix: &str) -> Self {
        Self::with_http(base_url, route_prefix, Client::new())
    }

    pub fn from_config(config: &BackendConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client for the backend")?;

        Ok(Self::with_http(&config.base_url, &config.route_prefix, http))
    }

    fn with_http(base_url: &str, route_prefix: &str, http: Client) -> Self {
        let root = format!(
            "{}{}",
            base_url.trim_end_matches('/'),
            normalize_prefix(route_prefix)
        );

        Self { weather_url: format!("{root}/weather"), save_url: format!("{root}/save"), http }
    }

    pub fn weather_url(&self) -> &str {
        &self.weather_url
    }

    pub fn save_url(&self) -> &str {
        &self.save_url
    }
}

#[async_trait]
impl ForecastSource for BackendClient {
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, RequestError> {
        let res = self.http.get(&self.weather_url).query(&[("city", request.city())]).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = error_field(&body, "error")
                .unwrap_or_else(|| format!("Request failed with {}", status.as_u16()));

            return Err(RequestError::Status { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|e| RequestError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ForecastStore for BackendClient {
    async fn save_forecast(&self, request: &SaveRequest) -> Result<SaveReceipt, RequestError> {
        let res = self.http.post(&self.save_url).json(request).send().await?;

        let status = res.status();
        let body = res.text().await?;

        // Read the body as JSON whatever the status; raw text stands in for the error.
        let data = serde_json::from_str::<Value>(&body)
            .unwrap_or_else(|_| json!({ "error": truncate_body(&body) }));

        if !status.is_success() {
            return Err(save_failure(status, &data));
        }

        Ok(SaveReceipt(data))
    }
}

fn save_failure(status: StatusCode, data: &Value) -> RequestError {
    let message = data
        .get("error")
        .and_then(Value::as_str)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Save failed with {}", status.as_u16()));

    RequestError::Status { status: status.as_u16(), message }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

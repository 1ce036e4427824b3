use crate::{
    Config, ForecastRequest, ForecastResponse, SaveReceipt, SaveRequest,
    error::RequestError,
    source::{backend::BackendClient, openweather::OpenWeatherSource},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod backend;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    Backend,
    OpenWeather,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Backend => "backend",
            SourceId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::Backend, SourceId::OpenWeather]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SourceId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "backend" => Ok(SourceId::Backend),
            "openweather" => Ok(SourceId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown source '{value}'. Supported sources: backend, openweather."
            )),
        }
    }
}

/// Something that can produce a multi-day forecast for a city.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, RequestError>;
}

/// Something that can persist a named forecast request.
#[async_trait]
pub trait ForecastStore: Send + Sync + Debug {
    async fn save_forecast(&self, request: &SaveRequest) -> Result<SaveReceipt, RequestError>;
}

/// Construct a source from config and explicit SourceId.
pub fn source_from_config(id: SourceId, config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let boxed: Box<dyn ForecastSource> = match id {
        SourceId::Backend => Box::new(BackendClient::from_config(config.backend()?)?),
        SourceId::OpenWeather => {
            let provider = config.provider_config(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for source '{id}'.\n\
                     Hint: run `forecast configure` and enter your OpenWeather API key."
                )
            })?;
            Box::new(OpenWeatherSource::from_config(provider))
        }
    };

    Ok(boxed)
}

/// Construct the default source from config, using `default_source` field.
pub fn default_source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let id = config.default_source_id()?;
    source_from_config(id, config)
}

/// Saves always go through the backend.
pub fn store_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastStore>> {
    Ok(Box::new(BackendClient::from_config(config.backend()?)?))
}

/// Non-empty string under `field` of a JSON error body. Other fields are not looked at.
pub(crate) fn error_field(body: &str, field: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get(field)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn error_field_ignores_unrelated_fields() {
        let body = r#"{"error":"city not found","message":{"detail":"x"}}"#;
        assert_eq!(error_field(body, "error").as_deref(), Some("city not found"));
        assert_eq!(error_field(body, "message"), None);
        assert_eq!(error_field(r#"{"error":""}"#, "error"), None);
        assert_eq!(error_field("<html>", "error"), None);
    }

    #[test]
    fn source_id_as_str_roundtrip() {
        for id in SourceId::all() {
            let parsed = SourceId::try_from(id.as_str()).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn source_id_is_case_insensitive() {
        assert_eq!(SourceId::try_from("OpenWeather").unwrap(), SourceId::OpenWeather);
    }

    #[test]
    fn unknown_source_error() {
        let err = SourceId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown source"));
    }

    #[test]
    fn openweather_source_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = source_from_config(SourceId::OpenWeather, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for source"));
    }

    #[test]
    fn default_source_requires_backend_url() {
        let cfg = Config::default();
        let err = default_source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No backend base URL configured"));
    }

    #[test]
    fn default_source_works_when_backend_configured() {
        let mut cfg = Config::default();
        cfg.set_backend_url("http://localhost:7071/api".into());

        assert!(default_source_from_config(&cfg).is_ok());
        assert!(store_from_config(&cfg).is_ok());
    }

    #[test]
    fn openweather_source_works_when_key_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(SourceId::OpenWeather, "KEY".into());
        cfg.set_default_source(SourceId::OpenWeather);

        assert!(default_source_from_config(&cfg).is_ok());
    }
}

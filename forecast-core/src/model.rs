use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated forecast lookup. The city is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    city: String,
}

impl ForecastRequest {
    pub fn new(city: &str) -> Result<Self, ValidationError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(ValidationError::MissingCity);
        }

        Ok(Self { city: city.to_string() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

/// Body of a save call. Both fields are trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    name: String,
    city: String,
}

impl SaveRequest {
    pub fn new(name: &str, city: &str) -> Result<Self, ValidationError> {
        let (name, city) = (name.trim(), city.trim());
        if name.is_empty() || city.is_empty() {
            return Err(ValidationError::MissingNameOrCity);
        }

        Ok(Self { name: name.to_string(), city: city.to_string() })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Whatever JSON the save endpoint answered with on success.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SaveReceipt(pub serde_json::Value);

impl SaveReceipt {
    /// Record id assigned by the backend, if it returned one.
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(serde_json::Value::as_i64)
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(serde_json::Value::as_str)
    }
}

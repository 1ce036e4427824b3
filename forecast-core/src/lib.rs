//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Forecast sources (the forecast backend, OpenWeather) and the save endpoint
//! - Shared domain models (requests, responses)
//! - The view-model and the client that drives it
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod view;

pub use client::ForecastClient;
pub use config::{BackendConfig, Config, ProviderConfig};
pub use error::{ClientError, RequestError, ValidationError};
pub use model::{ForecastDay, ForecastRequest, ForecastResponse, SaveReceipt, SaveRequest};
pub use source::{ForecastSource, ForecastStore, SourceId};
pub use view::{ForecastCard, ForecastView, Status, StatusKind};

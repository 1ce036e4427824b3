use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::{
    error::{ClientError, RequestError},
    model::{ForecastRequest, ForecastResponse, SaveReceipt, SaveRequest},
    source::{ForecastSource, ForecastStore},
    view::{ForecastView, Status},
};

pub const LOADING_FORECAST: &str = "Loading forecast...";
pub const FORECAST_LOADED: &str = "Forecast loaded. You can save it now.";
pub const SAVING_FORECAST: &str = "Saving forecast...";
pub const FORECAST_SAVED: &str = "Forecast saved successfully!";

/// Fetches forecasts, saves named requests, and keeps the view-model current.
///
/// Both operations take `&self`, so a fetch and a save may be in flight at the
/// same time. The view lock is never held across an `.await`.
#[derive(Debug)]
pub struct ForecastClient {
    source: Box<dyn ForecastSource>,
    store: Option<Box<dyn ForecastStore>>,
    view: Mutex<ForecastView>,
}

impl ForecastClient {
    pub fn new(source: Box<dyn ForecastSource>) -> Self {
        Self { source, store: None, view: Mutex::new(ForecastView::default()) }
    }

    pub fn with_store(mut self, store: Box<dyn ForecastStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Snapshot of the current view-model.
    pub fn view(&self) -> ForecastView {
        self.update(|view| view.clone())
    }

    fn update<R>(&self, f: impl FnOnce(&mut ForecastView) -> R) -> R {
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut view)
    }

    pub async fn fetch_forecast(&self, city: &str) -> Result<ForecastResponse, ClientError> {
        let request = match ForecastRequest::new(city) {
            Ok(request) => request,
            Err(e) => {
                self.update(|view| view.set_status(Status::error(e.to_string())));
                return Err(e.into());
            }
        };

        self.update(|view| {
            view.set_status(Status::info(LOADING_FORECAST));
            view.save_enabled = false;
        });

        debug!(city = request.city(), "requesting forecast");

        match self.source.fetch_forecast(&request).await {
            Ok(forecast) => {
                debug!(city = %forecast.city, days = forecast.forecast.len(), "forecast received");

                self.update(|view| {
                    view.show_forecast(forecast.clone());
                    view.set_status(Status::success(FORECAST_LOADED));
                    view.save_enabled = true;
                });
                Ok(forecast)
            }
            Err(e) => {
                debug!(city = request.city(), status = e.status(), error = %e, "forecast request failed");

                self.update(|view| {
                    view.set_status(Status::error(format!("Failed to load forecast: {e}")));
                    view.hide_forecast();
                });
                Err(e.into())
            }
        }
    }

    pub async fn save_forecast(&self, name: &str, city: &str) -> Result<SaveReceipt, ClientError> {
        let request = match SaveRequest::new(name, city) {
            Ok(request) => request,
            Err(e) => {
                self.update(|view| view.set_status(Status::error(e.to_string())));
                return Err(e.into());
            }
        };

        self.update(|view| {
            view.set_status(Status::info(SAVING_FORECAST));
            view.save_enabled = false;
            view.saving = true;
        });

        debug!(name = request.name(), city = request.city(), "saving forecast");

        let result = match &self.store {
            Some(store) => store.save_forecast(&request).await,
            None => Err(RequestError::Unsupported("no save endpoint configured".to_string())),
        };

        self.update(|view| {
            match &result {
                Ok(_) => view.set_status(Status::success(FORECAST_SAVED)),
                Err(e) => view.set_status(Status::error(format!("Failed to save forecast: {e}"))),
            }
            view.saving = false;
            view.save_enabled = true;
        });

        match result {
            Ok(receipt) => {
                debug!(id = receipt.id(), "forecast saved");
                Ok(receipt)
            }
            Err(e) => {
                debug!(city = request.city(), status = e.status(), error = %e, "save request failed");
                Err(e.into())
            }
        }
    }
}

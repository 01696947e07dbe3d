//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::geocoding::{GeocodingClient, GeocodingError};
use crate::merchant_api::{MerchantApiClient, MerchantApiError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("merchant API client: {0}")]
    MerchantApi(#[from] MerchantApiError),
    #[error("geocoding client: {0}")]
    Geocoding(#[from] GeocodingError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    merchant_api: MerchantApiClient,
    geocoder: Option<GeocodingClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if either HTTP client fails to build.
    pub fn new(config: DashboardConfig) -> Result<Self, StateError> {
        let merchant_api = MerchantApiClient::new(&config.merchant_api)?;
        let geocoder = config
            .geocoding()
            .map(GeocodingClient::new)
            .transpose()?;

        if geocoder.is_none() {
            tracing::warn!("GEOCODING_API_KEY not set, location lookup disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                merchant_api,
                geocoder,
            }),
        })
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the merchant backend client.
    #[must_use]
    pub fn merchant_api(&self) -> &MerchantApiClient {
        &self.inner.merchant_api
    }

    /// Get the reverse geocoding client, if configured.
    #[must_use]
    pub fn geocoder(&self) -> Option<&GeocodingClient> {
        self.inner.geocoder.as_ref()
    }
}

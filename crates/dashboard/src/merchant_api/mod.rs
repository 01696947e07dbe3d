//! Merchant backend API client.
//!
//! The dashboard does not persist anything itself. Merchants and stores are
//! created by the onboarding backend, which this client talks to over HTTP:
//!
//! - `POST /v1/merchants` (JSON) creates a merchant
//! - `GET /v1/merchants/{id}` fetches one (cached for 5 minutes)
//! - `POST /v1/merchants/{id}/stores` (multipart) creates a store
//!
//! Every success body is wrapped in `{"data": ...}`. Requests are not
//! retried; a failure is reported to the operator, who can resubmit.

mod multipart;
mod types;

pub use multipart::into_form;
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use onboarding_core::{FormField, MerchantId};
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::MerchantApiConfig;

/// Errors that can occur when talking to the merchant backend.
#[derive(Debug, Error)]
pub enum MerchantApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse a response or build a request.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The backend rejected the dashboard's token.
    #[error("Unauthorized: invalid API token")]
    Unauthorized,
}

impl MerchantApiError {
    /// Message safe to show the operator.
    ///
    /// Validation messages from the backend are passed through so the
    /// operator can correct the form; everything else is generic.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { status, message } if (400..500).contains(status) => message.clone(),
            Self::RateLimited(secs) => {
                format!("The merchant service is busy. Please try again in {secs} seconds.")
            }
            Self::NotFound(_) => "The merchant could not be found.".to_string(),
            _ => "Could not reach the merchant service. Please try again.".to_string(),
        }
    }
}

/// Merchant backend client.
///
/// Cheap to clone; clones share the connection pool and merchant cache.
#[derive(Clone)]
pub struct MerchantApiClient {
    inner: Arc<MerchantApiClientInner>,
}

struct MerchantApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    merchants: Cache<MerchantId, Merchant>,
}

impl MerchantApiClient {
    /// Create a new merchant backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &MerchantApiConfig) -> Result<Self, MerchantApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let mut auth_value =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                    .map_err(|e| MerchantApiError::Parse(format!("Invalid API token format: {e}")))?;
            auth_value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let merchants = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(MerchantApiClientInner {
                client,
                base_url: config.base_url.clone(),
                merchants,
            }),
        })
    }

    /// Create a merchant.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the merchant.
    #[instrument(skip(self, merchant), fields(merchant.name = %merchant.name))]
    pub async fn create_merchant(&self, merchant: &NewMerchant) -> Result<Merchant, MerchantApiError> {
        let url = self.endpoint(&["v1", "merchants"])?;
        let response = self.inner.client.post(url).json(merchant).send().await?;
        let merchant: Merchant = self.handle_response(response).await?;

        self.inner
            .merchants
            .insert(merchant.id.clone(), merchant.clone())
            .await;

        Ok(merchant)
    }

    /// Fetch a merchant, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns `MerchantApiError::NotFound` for unknown merchants, or any
    /// transport or backend error.
    #[instrument(skip(self), fields(merchant.id = %id))]
    pub async fn get_merchant(&self, id: &MerchantId) -> Result<Merchant, MerchantApiError> {
        if let Some(merchant) = self.inner.merchants.get(id).await {
            tracing::debug!("Merchant cache hit");
            return Ok(merchant);
        }

        let url = self.endpoint(&["v1", "merchants", id.as_str()])?;
        let response = self.inner.client.get(url).send().await?;
        let merchant: Merchant = self.handle_response(response).await?;

        self.inner.merchants.insert(id.clone(), merchant.clone()).await;
        Ok(merchant)
    }

    /// Create a store for a merchant from flattened multipart fields.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the store.
    #[instrument(skip(self, form_fields), fields(merchant.id = %merchant_id, field_count = form_fields.len()))]
    pub async fn create_store(
        &self,
        merchant_id: &MerchantId,
        form_fields: Vec<FormField>,
    ) -> Result<Store, MerchantApiError> {
        let url = self.endpoint(&["v1", "merchants", merchant_id.as_str(), "stores"])?;
        let form = into_form(form_fields)?;
        let response = self.inner.client.post(url).multipart(form).send().await?;
        self.handle_response(response).await
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, MerchantApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MerchantApiError::Parse("Base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Handle API response and unwrap the `data` envelope.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, MerchantApiError> {
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<T> = response
                .json()
                .await
                .map_err(|e| MerchantApiError::Parse(format!("Failed to parse response: {e}")))?;
            return Ok(envelope.data);
        }

        Err(self.parse_error(response).await)
    }

    /// Parse error response from the backend.
    async fn parse_error(&self, response: reqwest::Response) -> MerchantApiError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return MerchantApiError::RateLimited(retry_after);
        }

        if status == 401 || status == 403 {
            return MerchantApiError::Unauthorized;
        }

        if status == 404 {
            return MerchantApiError::NotFound(response.url().path().to_string());
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(text);

        MerchantApiError::Api { status, message }
    }
}

impl std::fmt::Debug for MerchantApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

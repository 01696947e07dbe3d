//! Reverse geocoding.
//!
//! Turns the coordinates reported by the operator's browser into a postal
//! address so the address fields can be prefilled. Speaks the Google
//! Geocoding response format:
//!
//! ```text
//! GET {url}?latlng={lat},{lng}&key={api_key}
//! {"status": "OK", "results": [{"formatted_address": ..., "address_components": [...]}]}
//! ```

use std::sync::Arc;

use onboarding_core::{Coordinates, canonical_state};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::GeocodingConfig;

/// Errors that can occur during reverse geocoding.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// HTTP request failed. The request URL is stripped since it carries the
    /// API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("Geocoding service returned HTTP {0}")]
    Status(u16),

    /// The service answered with an error status in the body.
    #[error("Geocoding API error: {status} - {message}")]
    Api { status: String, message: String },

    /// No address exists at the given coordinates.
    #[error("No address found for location")]
    NoResults,

    /// Failed to parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

/// Address details resolved for a pair of coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResult {
    fn component(&self, kind: &str) -> Option<&str> {
        self.address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_name.as_str())
    }
}

/// Reverse geocoding client.
#[derive(Clone)]
pub struct GeocodingClient {
    inner: Arc<GeocodingClientInner>,
}

struct GeocodingClientInner {
    client: reqwest::Client,
    config: GeocodingConfig,
}

impl GeocodingClient {
    /// Create a new geocoding client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            inner: Arc::new(GeocodingClientInner {
                client,
                config: config.clone(),
            }),
        })
    }

    /// Resolve coordinates to an address using the first result.
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::NoResults` when nothing is found there, or
    /// any transport or service error.
    #[instrument(skip(self), fields(lat = coordinates.latitude(), lng = coordinates.longitude()))]
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Location, GeocodingError> {
        let latlng = format!(
            "{},{}",
            coordinates.latitude_fixed(),
            coordinates.longitude_fixed()
        );
        let response = self
            .inner
            .client
            .get(self.inner.config.url.clone())
            .query(&[
                ("latlng", latlng.as_str()),
                ("key", self.inner.config.api_key.expose_secret()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Status(status.as_u16()));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| {
                GeocodingError::Parse(format!("Failed to parse response: {}", e.without_url()))
            })?;

        location_from_response(coordinates, body)
    }
}

impl std::fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("url", &self.inner.config.url.as_str())
            .finish_non_exhaustive()
    }
}

fn location_from_response(
    coordinates: Coordinates,
    response: GeocodeResponse,
) -> Result<Location, GeocodingError> {
    match response.status.as_deref() {
        None | Some("OK" | "ZERO_RESULTS") => {}
        Some(status) => {
            return Err(GeocodingError::Api {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or(GeocodingError::NoResults)?;

    // Prefer the canonical spelling so it matches the state dropdown.
    let state = first
        .component("administrative_area_level_1")
        .map(|name| canonical_state(name).unwrap_or(name).to_string());
    let city = first
        .component("locality")
        .or_else(|| first.component("administrative_area_level_2"))
        .map(str::to_string);
    let pincode = first.component("postal_code").map(str::to_string);

    Ok(Location {
        latitude: coordinates.latitude_fixed(),
        longitude: coordinates.longitude_fixed(),
        address: first.formatted_address,
        city,
        state,
        pincode,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use axum::Json;
    use axum::Router;
    use axum::extract::Query;
    use axum::routing::get;
    use secrecy::SecretString;
    use serde_json::{Value, json};
    use std::collections::HashMap;

    use super::*;
    use crate::test_support::spawn_backend;

    fn bengaluru() -> Coordinates {
        Coordinates::new(12.971_599, 77.594_566).unwrap()
    }

    fn parse(value: Value) -> GeocodeResponse {
        serde_json::from_value(value).unwrap()
    }

    fn sample_response() -> Value {
        json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "12, MG Road, Bengaluru, Karnataka 560001, India",
                    "address_components": [
                        {"long_name": "560001", "types": ["postal_code"]},
                        {"long_name": "Bengaluru", "types": ["locality", "political"]},
                        {"long_name": "karnataka", "types": ["administrative_area_level_1", "political"]},
                        {"long_name": "India", "types": ["country", "political"]}
                    ]
                },
                {"formatted_address": "Bengaluru, Karnataka, India", "address_components": []}
            ]
        })
    }

    #[test]
    fn test_uses_first_result() {
        let location = location_from_response(bengaluru(), parse(sample_response())).unwrap();
        assert_eq!(
            location.address,
            "12, MG Road, Bengaluru, Karnataka 560001, India"
        );
        assert_eq!(location.city.as_deref(), Some("Bengaluru"));
        assert_eq!(location.state.as_deref(), Some("Karnataka"));
        assert_eq!(location.pincode.as_deref(), Some("560001"));
        assert_eq!(location.latitude, "12.971599");
        assert_eq!(location.longitude, "77.594566");
    }

    #[test]
    fn test_zero_results() {
        let err = location_from_response(
            bengaluru(),
            parse(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .unwrap_err();
        assert!(matches!(err, GeocodingError::NoResults));
        assert_eq!(err.to_string(), "No address found for location");
    }

    #[test]
    fn test_error_status() {
        let err = location_from_response(
            bengaluru(),
            parse(json!({"status": "REQUEST_DENIED", "error_message": "bad key"})),
        )
        .unwrap_err();
        assert!(
            matches!(err, GeocodingError::Api { ref status, ref message } if status == "REQUEST_DENIED" && message == "bad key")
        );
    }

    #[test]
    fn test_unknown_state_is_kept() {
        let response = parse(json!({
            "results": [{
                "formatted_address": "Somewhere",
                "address_components": [
                    {"long_name": "Ontario", "types": ["administrative_area_level_1"]},
                    {"long_name": "Peel", "types": ["administrative_area_level_2"]}
                ]
            }]
        }));
        let location = location_from_response(bengaluru(), response).unwrap();
        assert_eq!(location.state.as_deref(), Some("Ontario"));
        assert_eq!(location.city.as_deref(), Some("Peel"));
        assert_eq!(location.pincode, None);
    }

    #[tokio::test]
    async fn test_reverse_sends_latlng_and_key() {
        let seen: Arc<Mutex<HashMap<String, String>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let service = Router::new().route(
            "/geocode/json",
            get(move |Query(params): Query<HashMap<String, String>>| async move {
                *recorder.lock().unwrap() = params;
                Json(sample_response())
            }),
        );
        let base = spawn_backend(service).await;
        let client = GeocodingClient::new(&GeocodingConfig {
            url: base.join("geocode/json").unwrap(),
            api_key: SecretString::from("AIzaTestKey".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let location = client.reverse(bengaluru()).await.unwrap();
        assert_eq!(location.city.as_deref(), Some("Bengaluru"));

        let params = seen.lock().unwrap();
        assert_eq!(params.get("latlng").map(String::as_str), Some("12.971599,77.594566"));
        assert_eq!(params.get("key").map(String::as_str), Some("AIzaTestKey"));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let client = GeocodingClient::new(&GeocodingConfig {
            url: url::Url::parse("http://127.0.0.1:9/geocode/json").unwrap(),
            api_key: SecretString::from("AIzaSuperSecretKey".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let err = client.reverse(bengaluru()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::Http(_)));
        assert!(!err.to_string().contains("AIzaSuperSecretKey"));
        assert!(!format!("{err:?}").contains("AIzaSuperSecretKey"));
    }

    #[tokio::test]
    async fn test_malformed_body_hides_api_key() {
        let service = Router::new().route("/geocode/json", get(|| async { "not json" }));
        let base = spawn_backend(service).await;
        let client = GeocodingClient::new(&GeocodingConfig {
            url: base.join("geocode/json").unwrap(),
            api_key: SecretString::from("AIzaSuperSecretKey".to_string()),
            timeout: Duration::from_secs(5),
        })
        .unwrap();

        let err = client.reverse(bengaluru()).await.unwrap_err();
        assert!(matches!(err, GeocodingError::Parse(_)));
        assert!(!err.to_string().contains("AIzaSuperSecretKey"));
    }
}

//! End-to-end harness for the onboarding dashboard.
//!
//! Each test starts two servers on ephemeral loopback ports: a fake merchant
//! backend that records what it receives, and the real dashboard router
//! pointed at it. Tests drive the dashboard with a cookie-keeping
//! `reqwest` client, so flash notifications survive redirects.
//!
//! ```bash
//! cargo test -p onboarding-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use onboarding_dashboard::config::{DashboardConfig, GeocodingConfig, MerchantApiConfig};
use onboarding_dashboard::routes;
use onboarding_dashboard::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;

/// Bearer token the dashboard is configured with.
pub const BACKEND_TOKEN: &str = "integration-test-token";

/// One part of a multipart request received by the fake backend.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub text: Option<String>,
}

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
pub enum Received {
    CreateMerchant {
        authorization: Option<String>,
        body: Value,
    },
    GetMerchant {
        id: String,
    },
    CreateStore {
        merchant_id: String,
        parts: Vec<ReceivedPart>,
    },
}

/// How the fake backend answers create requests.
#[derive(Debug, Clone)]
pub enum BackendMode {
    Accept,
    Reject { status: StatusCode, message: String },
}

/// How the fake geocoding service answers.
#[derive(Debug, Clone, Copy)]
pub enum GeocoderMode {
    /// Resolves every coordinate to an address in Bengaluru.
    Resolve,
    /// Answers every lookup with HTTP 500.
    Fail,
}

/// Knobs for a [`TestContext`].
#[derive(Debug, Clone)]
pub struct TestOptions {
    pub backend: BackendMode,
    /// `None` leaves reverse geocoding unconfigured.
    pub geocoder: Option<GeocoderMode>,
    pub max_upload_bytes: usize,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            backend: BackendMode::Accept,
            geocoder: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Clone)]
struct Backend {
    mode: BackendMode,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Backend {
    fn record(&self, request: Received) {
        self.received.lock().unwrap().push(request);
    }

    fn rejection(&self) -> Option<Response> {
        match &self.mode {
            BackendMode::Accept => None,
            BackendMode::Reject { status, message } => {
                Some((*status, Json(json!({ "message": message }))).into_response())
            }
        }
    }
}

async fn create_merchant(State(backend): State<Backend>, headers: HeaderMap, body: Bytes) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body: Value = serde_json::from_slice(&body).unwrap();
    backend.record(Received::CreateMerchant { authorization, body: body.clone() });

    if let Some(rejection) = backend.rejection() {
        return rejection;
    }
    Json(json!({ "data": { "id": 42, "name": body["name"] } })).into_response()
}

async fn get_merchant(State(backend): State<Backend>, Path(id): Path<String>) -> Response {
    backend.record(Received::GetMerchant { id: id.clone() });
    Json(json!({ "data": { "id": id, "name": "Chai Point" } })).into_response()
}

async fn create_store(
    State(backend): State<Backend>,
    Path(merchant_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let text = if file_name.is_some() {
            field.bytes().await.unwrap();
            None
        } else {
            Some(field.text().await.unwrap())
        };
        parts.push(ReceivedPart { name, file_name, text });
    }
    backend.record(Received::CreateStore { merchant_id, parts });

    if let Some(rejection) = backend.rejection() {
        return rejection;
    }
    (StatusCode::CREATED, Json(json!({ "data": { "id": 7, "name": "Chai Point Indiranagar" } })))
        .into_response()
}

async fn geocode(State(mode): State<GeocoderMode>) -> Response {
    match mode {
        GeocoderMode::Resolve => Json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "12, MG Road, Bengaluru, Karnataka 560001, India",
                "address_components": [
                    {"long_name": "560001", "types": ["postal_code"]},
                    {"long_name": "Bengaluru", "types": ["locality", "political"]},
                    {"long_name": "Karnataka", "types": ["administrative_area_level_1", "political"]}
                ]
            }]
        }))
        .into_response(),
        GeocoderMode::Fail => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// A running dashboard wired to a fake backend.
pub struct TestContext {
    pub client: reqwest::Client,
    pub dashboard_url: Url,
    received: Arc<Mutex<Vec<Received>>>,
}

impl TestContext {
    /// Start both servers with a backend that accepts every request.
    pub async fn new() -> Self {
        Self::with_mode(BackendMode::Accept).await
    }

    /// Start both servers with the given backend behavior.
    pub async fn with_mode(mode: BackendMode) -> Self {
        Self::with_options(TestOptions {
            backend: mode,
            ..TestOptions::default()
        })
        .await
    }

    /// Start the servers described by `options`.
    pub async fn with_options(options: TestOptions) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let backend = Backend {
            mode: options.backend,
            received: Arc::clone(&received),
        };
        let backend_url = serve(
            Router::new()
                .route("/v1/merchants", post(create_merchant))
                .route("/v1/merchants/{id}", get(get_merchant))
                .route("/v1/merchants/{id}/stores", post(create_store))
                .with_state(backend),
        )
        .await;

        let mut config = test_config(backend_url);
        config.max_upload_bytes = options.max_upload_bytes;
        if let Some(mode) = options.geocoder {
            let geocoder_url = serve(
                Router::new()
                    .route("/geocode/json", get(geocode))
                    .with_state(mode),
            )
            .await;
            config.geocoding = Some(GeocodingConfig {
                url: geocoder_url.join("geocode/json").unwrap(),
                api_key: SecretString::from("integration-geocoding-key".to_string()),
                timeout: Duration::from_secs(5),
            });
        }

        let state = AppState::new(config).unwrap();
        let dashboard_url = serve(routes::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { client, dashboard_url, received }
    }

    /// Absolute dashboard URL for `path`.
    pub fn url(&self, path: &str) -> Url {
        self.dashboard_url.join(path).unwrap()
    }

    /// Every request the backend has received so far.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Merchant creation bodies the backend has received.
    pub fn created_merchants(&self) -> Vec<Value> {
        self.received()
            .into_iter()
            .filter_map(|request| match request {
                Received::CreateMerchant { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    /// Store creation requests the backend has received.
    pub fn created_stores(&self) -> Vec<(String, Vec<ReceivedPart>)> {
        self.received()
            .into_iter()
            .filter_map(|request| match request {
                Received::CreateStore { merchant_id, parts } => Some((merchant_id, parts)),
                _ => None,
            })
            .collect()
    }
}

fn test_config(backend_url: Url) -> DashboardConfig {
    DashboardConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        merchant_api: MerchantApiConfig {
            base_url: backend_url,
            token: Some(SecretString::from(BACKEND_TOKEN.to_string())),
            timeout: Duration::from_secs(5),
        },
        geocoding: None,
        max_upload_bytes: 10 * 1024 * 1024,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Find the text value of a received multipart part.
pub fn part_text<'a>(parts: &'a [ReceivedPart], name: &str) -> Option<&'a str> {
    parts
        .iter()
        .find(|part| part.name == name)
        .and_then(|part| part.text.as_deref())
}

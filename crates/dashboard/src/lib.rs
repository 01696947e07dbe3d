//! Merchant onboarding dashboard library.
//!
//! Server-rendered forms an operator uses to register a merchant and then
//! create its stores. Nothing is stored locally: submissions are validated
//! here and forwarded to the merchant backend.
//!
//! The binary in `main.rs` wires this up with Sentry and tracing; tests
//! drive [`routes::app`] directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod geocoding;
pub mod merchant_api;
pub mod middleware;
pub mod notifications;
pub mod routes;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use url::Url;

    /// Serve `router` on an ephemeral loopback port and return its base URL.
    #[allow(clippy::unwrap_used)]
    pub async fn spawn_backend(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Url::parse(&format!("http://{addr}")).unwrap()
    }
}

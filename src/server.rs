//! Axum server setup, shared application state, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared state holding the config store,
//! HTTP client, counters, and uptime), [`build_router`] for the route
//! table and middleware layers, [`build_http_client`] for the
//! connection-pooled outbound client, and [`shutdown_signal`] for
//! SIGTERM / Ctrl+C handling.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::routing::{get, post};
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::limit::{RequestBodyLimitLayer, ResponseBody};
use tower_http::trace::TraceLayer;

use crate::config::store::ConfigStore;
use crate::health::health_handler;
use crate::relay;

#[derive(Debug, Default)]
pub struct Stats {
    /// Destination answered 200.
    pub forwarded: AtomicU64,
    /// Destination answered with another status.
    pub warnings: AtomicU64,
    /// Incomplete config or destination unreachable.
    pub failed: AtomicU64,
    /// Undecodable body or unknown service.
    pub rejected: AtomicU64,
}

impl Stats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forwarded: AtomicU64::new(0),
            warnings: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub store: ConfigStore,
    pub http_client: HttpClient,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(store: ConfigStore) -> Self {
        Self {
            store,
            http_client: build_http_client(),
            start_time: Instant::now(),
            stats: Stats::new(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // Both ring and aws-lc-rs can end up compiled in through transitive
    // features, in which case rustls cannot pick one on its own.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    let routes = Router::new()
        .route("/health", get(health_handler))
        .route("/services/{service_id}", post(relay::service_handler))
        .fallback(relay::not_found_handler);
    with_layers(routes, max_body).with_state(state)
}

fn with_layers<S>(router: Router<S>, max_body: usize) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(relay::panic_response))
            .layer(axum::middleware::map_response(
                relay::json_payload_too_large::<ResponseBody<Body>>,
            ))
            .layer(RequestBodyLimitLayer::new(max_body)),
    )
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}

//! Webhook relay request handling.
//!
//! [`service_handler`] serves `POST /services/{service_id}`: it decodes the
//! body ([`decode`]), resolves the service from the config snapshot, and
//! hands off to the forwarder ([`forward`]), which extracts the message
//! ([`extract`]), normalizes its markup ([`markup`]) and delivers it
//! ([`delivery`]). The [`Outcome`](outcome::Outcome) it returns becomes the
//! JSON response.

pub mod decode;
pub mod delivery;
pub mod extract;
pub mod forward;
pub mod markup;
pub mod outcome;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::{Body, Bytes, HttpBody};
use axum::extract::{ConnectInfo, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};

use crate::server::AppState;
use outcome::{Outcome, OutcomeStatus};

pub const PAYLOAD_TOO_LARGE: &str = "Request body too large";

pub async fn service_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(service_id): Path<String>,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let correlation_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);
    let content_type = req_headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());

    tracing::info!(
        correlation_id = %correlation_id,
        service = %service_id,
        client_ip = %addr.ip(),
        content_type = content_type.unwrap_or("-"),
        bytes = body.len(),
        "webhook received"
    );

    let payload = match decode::decode(content_type, &body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                service = %service_id,
                error = %e,
                "rejected webhook body"
            );
            state.stats.rejected.fetch_add(1, Ordering::Relaxed);
            return respond(StatusCode::BAD_REQUEST, &Outcome::error(e.to_string()), &correlation_id);
        }
    };

    let Some(resolved) = state.store.resolve(&service_id).await else {
        tracing::warn!(
            correlation_id = %correlation_id,
            service = %service_id,
            "no configuration for service"
        );
        state.stats.rejected.fetch_add(1, Ordering::Relaxed);
        let outcome = Outcome::error(format!("No configuration found for service ID: {service_id}"));
        return respond(StatusCode::BAD_REQUEST, &outcome, &correlation_id);
    };

    let ctx = forward::ForwardContext {
        client: &state.http_client,
        timeout: resolved.timeout,
        service_id: &service_id,
        correlation_id: &correlation_id,
    };
    let outcome = forward::forward(&ctx, &resolved.service, &payload).await;

    let counter = match outcome.status {
        OutcomeStatus::Success => &state.stats.forwarded,
        OutcomeStatus::Warning => &state.stats.warnings,
        OutcomeStatus::Error => &state.stats.failed,
    };
    counter.fetch_add(1, Ordering::Relaxed);

    respond(outcome.status.http_status(), &outcome, &correlation_id)
}

pub async fn not_found_handler() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(Outcome::error("Endpoint not found")),
    )
        .into_response()
}

/// Replaces the plain-text 413 of the body limit with the relay's JSON error body.
pub async fn json_payload_too_large<B>(response: Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    if response.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(Outcome::error(PAYLOAD_TOO_LARGE)),
        )
            .into_response();
    }
    response.into_response()
}

/// Response for a handler that panicked; installed as the `CatchPanicLayer` callback.
#[allow(clippy::needless_pass_by_value)]
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Outcome::error("Internal server error")),
    )
        .into_response()
}

fn respond(status: StatusCode, outcome: &Outcome, correlation_id: &str) -> Response {
    let mut response = (status, Json(outcome)).into_response();
    if let Ok(value) = HeaderValue::from_str(correlation_id) {
        response.headers_mut().insert("x-correlation-id", value);
    }
    response
}

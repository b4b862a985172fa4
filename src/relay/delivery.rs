//! Single-attempt JSON POST to a downstream webhook.
//!
//! One request, one timeout covering connect, send and reading the
//! response body. No retries. Failures come back as a typed
//! [`DeliveryError`] so callers decide what is logged and what the
//! sender gets to see.

use std::time::{Duration, Instant};

use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};

use crate::server::HttpClient;

const RELAY_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build request: {0}")]
    Build(#[from] http::Error),

    #[error("transport error: {0}")]
    Transport(#[source] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] hyper::Error),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    /// Response body as text, cut to `max` characters for logging.
    #[must_use]
    pub fn body_excerpt(&self, max: usize) -> String {
        String::from_utf8_lossy(&self.body).chars().take(max).collect()
    }
}

#[derive(Debug)]
pub struct Delivery {
    pub url: String,
    pub latency_ms: u64,
    pub result: Result<Reply, DeliveryError>,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn post_json(
    client: &HttpClient,
    url: &str,
    body: Bytes,
    timeout: Duration,
    correlation_id: &str,
) -> Delivery {
    let start = Instant::now();
    let result = send(client, url, body, timeout, correlation_id).await;
    Delivery {
        url: url.to_string(),
        latency_ms: start.elapsed().as_millis() as u64,
        result,
    }
}

async fn send(
    client: &HttpClient,
    url: &str,
    body: Bytes,
    timeout: Duration,
    correlation_id: &str,
) -> Result<Reply, DeliveryError> {
    let parsed = url::Url::parse(url).map_err(|e| DeliveryError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DeliveryError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    let request = hyper::Request::builder()
        .method(Method::POST)
        .uri(parsed.as_str())
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, RELAY_USER_AGENT)
        .header("x-correlation-id", correlation_id)
        .body(Full::new(body))?;

    let exchange = async {
        let response = client
            .request(request)
            .await
            .map_err(DeliveryError::Transport)?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(DeliveryError::Body)?
            .to_bytes();
        Ok::<_, DeliveryError>(Reply { status, body })
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| DeliveryError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_http_client;

    #[tokio::test]
    async fn rejects_unparsable_url_without_connecting() {
        let client = build_http_client();
        let delivery = post_json(
            &client,
            "not a url",
            Bytes::from_static(b"{}"),
            Duration::from_secs(1),
            "cid",
        )
        .await;
        assert!(matches!(delivery.result, Err(DeliveryError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let client = build_http_client();
        let delivery = post_json(
            &client,
            "ftp://files.example.com/drop",
            Bytes::from_static(b"{}"),
            Duration::from_secs(1),
            "cid",
        )
        .await;
        let err = delivery.result.unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn body_excerpt_truncates_on_char_boundary() {
        let reply = Reply {
            status: StatusCode::BAD_GATEWAY,
            body: Bytes::from("héllo wörld"),
        };
        assert_eq!(reply.body_excerpt(4), "héll");
    }
}

//! Primary forwarding and best-effort mirroring.
//!
//! [`forward`] turns an inbound payload into the destination's
//! [`ForwardRequest`] envelope, delivers it once, and classifies the
//! result into an [`Outcome`]. When the service has a mirror, the raw
//! inbound payload is posted there afterwards. The mirror call is awaited
//! but its result only reaches the logs, never the returned outcome.

use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode::InboundPayload;
use super::delivery::{self, Delivery};
use super::extract::{extract, ExtractedMessage};
use super::markup::normalize;
use super::outcome::Outcome;
use crate::config::model::ServiceConfig;
use crate::server::HttpClient;

pub const INCOMPLETE_CONFIGURATION: &str =
    "Incomplete service configuration (missing webhook_url or target)";

/// Transport details are logged, not returned.
pub const FORWARD_FAILED: &str = "Error forwarding webhook to target server";

const LOGGED_BODY_CHARS: usize = 200;

/// Body posted to the destination webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub text: String,
    pub target: String,
    /// Starts a new thread with this subject. Omitted, not null, when empty.
    #[serde(
        rename = "threadSubject",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_subject: Option<String>,
}

impl ForwardRequest {
    #[must_use]
    pub fn new(text: String, target: &str, subject: String) -> Self {
        Self {
            text,
            target: target.to_string(),
            thread_subject: (!subject.is_empty()).then_some(subject),
        }
    }

    /// Extract, then normalize the body, then wrap it for `target`.
    #[must_use]
    pub fn from_payload(payload: &Value, target: &str) -> Self {
        let ExtractedMessage { subject, body } = extract(payload);
        Self::new(normalize(&body), target, subject)
    }
}

pub struct ForwardContext<'a> {
    pub client: &'a HttpClient,
    pub timeout: Duration,
    pub service_id: &'a str,
    pub correlation_id: &'a str,
}

pub async fn forward(
    ctx: &ForwardContext<'_>,
    service: &ServiceConfig,
    payload: &InboundPayload,
) -> Outcome {
    let Some(destination) = service.destination() else {
        tracing::error!(
            correlation_id = %ctx.correlation_id,
            service = %ctx.service_id,
            "incomplete service configuration"
        );
        return Outcome::error(INCOMPLETE_CONFIGURATION);
    };

    let request = ForwardRequest::from_payload(&payload.value, destination.target);
    if let Some(subject) = &request.thread_subject {
        tracing::info!(
            correlation_id = %ctx.correlation_id,
            service = %ctx.service_id,
            subject = %subject,
            "creating thread"
        );
    }

    let outcome = match serde_json::to_vec(&request) {
        Ok(body) => {
            tracing::info!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                target = %destination.webhook_url,
                "forwarding webhook"
            );
            let delivery = delivery::post_json(
                ctx.client,
                destination.webhook_url,
                Bytes::from(body),
                ctx.timeout,
                ctx.correlation_id,
            )
            .await;
            classify(ctx, &delivery)
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                error = %e,
                "failed to serialize forward request"
            );
            Outcome::error(FORWARD_FAILED)
        }
    };

    if let Some(mirror_url) = service.mirror() {
        mirror(ctx, mirror_url, payload.raw.clone()).await;
    }

    outcome
}

fn classify(ctx: &ForwardContext<'_>, delivery: &Delivery) -> Outcome {
    match &delivery.result {
        Ok(reply) if reply.status == StatusCode::OK => {
            tracing::info!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                target = %delivery.url,
                latency_ms = delivery.latency_ms,
                "webhook forwarded"
            );
            Outcome::success(reply.status.as_u16())
        }
        Ok(reply) => {
            tracing::warn!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                target = %delivery.url,
                status = reply.status.as_u16(),
                latency_ms = delivery.latency_ms,
                body = %reply.body_excerpt(LOGGED_BODY_CHARS),
                "target server returned non-200 status"
            );
            Outcome::upstream_status(reply.status.as_u16())
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                target = %delivery.url,
                latency_ms = delivery.latency_ms,
                error = %e,
                "forwarding failed"
            );
            Outcome::error(FORWARD_FAILED)
        }
    }
}

async fn mirror(ctx: &ForwardContext<'_>, url: &str, raw: Bytes) {
    let delivery =
        delivery::post_json(ctx.client, url, raw, ctx.timeout, ctx.correlation_id).await;

    match &delivery.result {
        Ok(reply) if reply.status == StatusCode::OK => {
            tracing::info!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                mirror = %delivery.url,
                latency_ms = delivery.latency_ms,
                "mirror responded"
            );
        }
        Ok(reply) => {
            tracing::warn!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                mirror = %delivery.url,
                status = reply.status.as_u16(),
                latency_ms = delivery.latency_ms,
                body = %reply.body_excerpt(LOGGED_BODY_CHARS),
                "mirror returned non-200 status"
            );
        }
        Err(e) => {
            tracing::warn!(
                correlation_id = %ctx.correlation_id,
                service = %ctx.service_id,
                mirror = %delivery.url,
                latency_ms = delivery.latency_ms,
                error = %e,
                "mirror failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::outcome::OutcomeStatus;
    use crate::server::build_http_client;
    use serde_json::json;

    #[test]
    fn envelope_with_subject() {
        let payload = json!({"text": "# Hello", "attachments": [{"text": "World"}]});
        let request = ForwardRequest::from_payload(&payload, "grp_1");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "World", "target": "grp_1", "threadSubject": "Hello"})
        );
    }

    #[test]
    fn envelope_without_subject_omits_field() {
        let payload = json!({"text": "single line"});
        let value = serde_json::to_value(ForwardRequest::from_payload(&payload, "thr_9")).unwrap();
        assert_eq!(value, json!({"text": "single line", "target": "thr_9"}));
    }

    #[test]
    fn envelope_body_is_normalized() {
        let payload = json!({
            "text": "Deploy",
            "attachments": [{"text": "See <https://ci.io/42|build 42> or <https://ci.io>"}]
        });
        let request = ForwardRequest::from_payload(&payload, "grp_1");
        assert_eq!(request.text, "See [build 42](https://ci.io/42) or https://ci.io");
        assert_eq!(request.thread_subject.as_deref(), Some("Deploy"));
    }

    #[tokio::test]
    async fn incomplete_service_fails_without_network() {
        let client = build_http_client();
        let ctx = ForwardContext {
            client: &client,
            timeout: Duration::from_secs(1),
            service_id: "alerts",
            correlation_id: "cid",
        };
        let service = ServiceConfig {
            webhook_url: Some("http://127.0.0.1:9/never".into()),
            mirror_url: Some("http://127.0.0.1:9/mirror".into()),
            ..ServiceConfig::default()
        };
        let payload = InboundPayload {
            value: json!({"text": "hi"}),
            raw: Bytes::from_static(br#"{"text":"hi"}"#),
        };

        let outcome = forward(&ctx, &service, &payload).await;
        assert_eq!(outcome.status, OutcomeStatus::Error);
        assert_eq!(outcome.message, INCOMPLETE_CONFIGURATION);
        assert_eq!(outcome.response_code, None);
    }
}

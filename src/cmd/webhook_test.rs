//! `webhook-relay test`: send a test message to every configured webhook.
//!
//! For each service, posts a thread-starting test envelope to the
//! destination and a plain `{"text": ...}` message to the mirror (when
//! configured), prints one line per webhook and a summary, and fails
//! unless at least one webhook succeeded and none failed.

use bytes::Bytes;
use http::StatusCode;

use crate::cli::TestArgs;
use crate::config::model::ServiceConfig;
use crate::config::sources;
use crate::error::RelayError;
use crate::relay::delivery::{self, Delivery};
use crate::relay::forward::ForwardRequest;
use crate::server::{self, HttpClient};

const EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Destination,
    Mirror,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Destination => "destination",
            Self::Mirror => "mirror",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success(u16),
    Failed(u16),
    Error(String),
    Skipped(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResult {
    pub service: String,
    pub endpoint: Endpoint,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: usize,
    pub skipped: usize,
}

impl Summary {
    #[must_use]
    pub fn of(results: &[WebhookResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.verdict {
                Verdict::Success(_) => acc.succeeded += 1,
                Verdict::Failed(_) => acc.failed += 1,
                Verdict::Error(_) => acc.errors += 1,
                Verdict::Skipped(_) => acc.skipped += 1,
            }
            acc
        })
    }

    /// Passes only when something succeeded and nothing failed or errored.
    pub fn into_result(self) -> Result<(), RelayError> {
        if self.failed > 0 || self.errors > 0 || self.succeeded == 0 {
            Err(RelayError::WebhookTestFailed {
                succeeded: self.succeeded,
                failed: self.failed,
                errors: self.errors,
            })
        } else {
            Ok(())
        }
    }
}

pub async fn execute(args: &TestArgs) -> Result<(), RelayError> {
    println!("\n=== Webhook Test Mode ===\n");

    let (config, _) = sources::open_file_source(&args.config)?.load().await?;
    if config.services.is_empty() {
        println!("\u{2717} No services configured in {}", args.config.display());
        return Summary::default().into_result();
    }
    println!("Found {} service(s) to test\n", config.services.len());

    let client = server::build_http_client();
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut results = Vec::new();

    for (id, service) in &config.services {
        println!("Testing service: {id}");
        println!(
            "  Description: {}",
            service.description.as_deref().unwrap_or("No description")
        );
        let timeout = config.timeout_for(service);
        results.extend(test_service(&client, id, service, timeout, &stamp).await);
        println!();
    }

    let summary = Summary::of(&results);
    println!("=== Test Summary ===");
    println!("Total webhooks tested: {}", results.len());
    println!("  \u{2713} Success: {}", summary.succeeded);
    println!("  \u{2717} Failed:  {}", summary.failed);
    println!("  \u{2717} Errors:  {}", summary.errors);
    println!("  \u{2298} Skipped: {}", summary.skipped);
    println!();

    summary.into_result()
}

pub async fn test_service(
    client: &HttpClient,
    id: &str,
    service: &ServiceConfig,
    timeout: std::time::Duration,
    stamp: &str,
) -> Vec<WebhookResult> {
    let text = format!(
        "Test message from {}\nTimestamp: {stamp}",
        env!("CARGO_PKG_NAME")
    );
    let correlation_id = format!("test-{}", uuid::Uuid::new_v4());
    let mut results = Vec::with_capacity(2);

    let destination = match service.destination() {
        Some(d) => {
            let envelope = ForwardRequest::new(text.clone(), d.target, format!("Test Message - {stamp}"));
            println!("  \u{2192} Sending to destination: {}", d.webhook_url);
            match serde_json::to_vec(&envelope) {
                Ok(body) => {
                    let delivery = delivery::post_json(
                        client,
                        d.webhook_url,
                        Bytes::from(body),
                        timeout,
                        &correlation_id,
                    )
                    .await;
                    judge(&delivery)
                }
                Err(e) => Verdict::Error(e.to_string()),
            }
        }
        None => Verdict::Skipped("missing webhook_url or target"),
    };
    print_verdict(Endpoint::Destination, &destination);
    results.push(WebhookResult {
        service: id.to_string(),
        endpoint: Endpoint::Destination,
        verdict: destination,
    });

    let mirror = match service.mirror() {
        Some(url) => {
            println!("  \u{2192} Sending to mirror: {url}");
            let body = serde_json::json!({ "text": text }).to_string();
            let delivery =
                delivery::post_json(client, url, Bytes::from(body), timeout, &correlation_id).await;
            judge(&delivery)
        }
        None => Verdict::Skipped("not configured"),
    };
    print_verdict(Endpoint::Mirror, &mirror);
    results.push(WebhookResult {
        service: id.to_string(),
        endpoint: Endpoint::Mirror,
        verdict: mirror,
    });

    results
}

fn judge(delivery: &Delivery) -> Verdict {
    match &delivery.result {
        Ok(reply) if reply.status == StatusCode::OK => Verdict::Success(reply.status.as_u16()),
        Ok(reply) => {
            println!("    Response: {}", reply.body_excerpt(EXCERPT_CHARS));
            Verdict::Failed(reply.status.as_u16())
        }
        Err(e) => Verdict::Error(e.to_string()),
    }
}

fn print_verdict(endpoint: Endpoint, verdict: &Verdict) {
    match verdict {
        Verdict::Success(code) => println!("  \u{2713} {endpoint}: SUCCESS (status {code})"),
        Verdict::Failed(code) => println!("  \u{2717} {endpoint}: FAILED (status {code})"),
        Verdict::Error(e) => println!("  \u{2717} {endpoint}: ERROR - {e}"),
        Verdict::Skipped(why) => println!("  \u{2298} {endpoint}: SKIPPED ({why})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn result(verdict: Verdict) -> WebhookResult {
        WebhookResult {
            service: "svc".into(),
            endpoint: Endpoint::Destination,
            verdict,
        }
    }

    #[test]
    fn summary_passes_with_successes_and_skips() {
        let summary = Summary::of(&[
            result(Verdict::Success(200)),
            result(Verdict::Skipped("not configured")),
        ]);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.into_result().is_ok());
    }

    #[test]
    fn summary_fails_on_any_failure() {
        let summary = Summary::of(&[result(Verdict::Success(200)), result(Verdict::Failed(404))]);
        assert!(summary.into_result().is_err());

        let summary = Summary::of(&[result(Verdict::Error("refused".into()))]);
        assert!(summary.into_result().is_err());
    }

    #[test]
    fn summary_fails_when_nothing_succeeded() {
        let summary = Summary::of(&[result(Verdict::Skipped("missing webhook_url or target"))]);
        assert!(matches!(
            summary.into_result(),
            Err(RelayError::WebhookTestFailed { succeeded: 0, .. })
        ));
    }

    #[tokio::test]
    async fn tests_destination_and_mirror() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/dest"))
            .and(body_json(serde_json::json!({
                "text": "Test message from webhook-relay\nTimestamp: 2026-01-01 00:00:00",
                "target": "grp_1",
                "threadSubject": "Test Message - 2026-01-01 00:00:00"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/mirror"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let service = ServiceConfig {
            webhook_url: Some(format!("{}/dest", server.uri())),
            target: Some("grp_1".into()),
            mirror_url: Some(format!("{}/mirror", server.uri())),
            ..ServiceConfig::default()
        };
        let client = server::build_http_client();
        let results = test_service(
            &client,
            "alerts",
            &service,
            Duration::from_secs(5),
            "2026-01-01 00:00:00",
        )
        .await;

        assert_eq!(results[0].verdict, Verdict::Success(200));
        assert_eq!(results[1].endpoint, Endpoint::Mirror);
        assert_eq!(results[1].verdict, Verdict::Failed(500));
    }

    #[tokio::test]
    async fn incomplete_service_is_skipped() {
        let client = server::build_http_client();
        let results = test_service(
            &client,
            "alerts",
            &ServiceConfig::default(),
            Duration::from_secs(1),
            "now",
        )
        .await;
        assert!(results
            .iter()
            .all(|r| matches!(r.verdict, Verdict::Skipped(_))));
    }
}

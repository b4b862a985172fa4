//! Unified error types for the relay.
//!
//! Defines [`RelayError`] (process-level failures surfaced by the CLI) and
//! [`ValidationError`] for config validation failures. Request-path errors
//! live next to the code that produces them:
//! [`DecodeError`](crate::relay::decode::DecodeError) for inbound bodies and
//! [`DeliveryError`](crate::relay::delivery::DeliveryError) for outbound calls.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub service: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "  service {}: {}: {}",
            self.service, self.field, self.message
        )?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Config file not found: {}\n\n  Pass --config <file> or set CONFIG_FILE.", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),

    #[error("Webhook test failed: {failed} failed, {errors} errors, {succeeded} succeeded")]
    WebhookTestFailed {
        succeeded: usize,
        failed: usize,
        errors: usize,
    },
}

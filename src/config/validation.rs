//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for structural
//! errors: malformed or non-HTTP URLs, zero timeouts, and service
//! identifiers that cannot appear as a path segment. Entries that are
//! merely *incomplete* (no `webhook_url` or no `target`) pass validation;
//! they are reported as warnings by [`format_validation_report`] and
//! rejected per request.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate a single webhook URL. Returns `Ok(())` or a human-readable error.
pub fn validate_webhook_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme == "http" || scheme == "https" {
                Ok(())
            } else {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

/// Validate a service identifier. It is matched as one `/services/{id}` segment.
pub fn validate_service_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("service identifier cannot be empty".into());
    }
    if id.contains('/') {
        return Err(format!("'{id}' contains '/' and can never match a request"));
    }
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.global.timeout_seconds == 0 {
        errors.push(ValidationError {
            service: "(global)".into(),
            field: "timeout_seconds".into(),
            message: "must be greater than zero".into(),
            suggestion: Some("omit it to use the 30s default".into()),
        });
    }

    for (id, service) in &config.services {
        if let Err(msg) = validate_service_id(id) {
            errors.push(ValidationError {
                service: format!("'{id}'"),
                field: "(key)".into(),
                message: msg,
                suggestion: None,
            });
        }

        let urls = [
            ("webhook_url", service.webhook_url.as_deref()),
            ("mirror_url", service.mirror_url.as_deref()),
        ];
        for (field, url) in urls {
            let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
                continue;
            };
            if let Err(msg) = validate_webhook_url(url) {
                errors.push(ValidationError {
                    service: id.clone(),
                    field: field.into(),
                    suggestion: (!url.contains("://")).then(|| format!("did you mean 'https://{url}'?")),
                    message: msg,
                });
            }
        }

        if service.timeout_seconds == Some(0) {
            errors.push(ValidationError {
                service: id.clone(),
                field: "timeout_seconds".into(),
                message: "must be greater than zero".into(),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let mut lines = vec![format!(
        "  {} services, default timeout {}s\n",
        config.services.len(),
        config.global.timeout_seconds
    )];

    for (id, service) in &config.services {
        let destination = service
            .destination()
            .map_or("INCOMPLETE", |d| d.webhook_url);
        lines.push(format!("  {id}  -> {destination}"));
        if let Some(description) = &service.description {
            lines.push(format!("    description: {description}"));
        }
        if let Some(d) = service.destination() {
            lines.push(format!("    target:  {}", d.target));
        }
        if let Some(mirror) = service.mirror() {
            lines.push(format!("    mirror:  {mirror}"));
        }
        lines.push(format!("    timeout: {}s", config.timeout_for(service).as_secs()));
    }

    let incomplete = config.incomplete_services();
    if !incomplete.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "  warning: {} incomplete (missing webhook_url or target): {}",
            incomplete.len(),
            incomplete.join(", ")
        ));
    }
    if config.services.is_empty() {
        lines.push("  warning: no services configured, every request will be rejected".into());
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

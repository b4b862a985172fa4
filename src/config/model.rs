//! Serde data structures for the relay configuration file.
//!
//! Contains [`Config`] (the root), [`Global`] settings, and one
//! [`ServiceConfig`] per inbound service identifier. All types derive
//! `Serialize` and `Deserialize` with `deny_unknown_fields` for strict
//! parsing. Service entries are deliberately lenient about *missing*
//! fields: an entry without a destination still loads and is only
//! rejected when a request for it arrives.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn is_default_global(v: &Global) -> bool {
    v.timeout_seconds == DEFAULT_TIMEOUT_SECONDS
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_global")]
    pub global: Global,

    #[serde(default)]
    pub services: BTreeMap<String, ServiceConfig>,
}

impl Config {
    /// Per-call timeout for `service`: its own override, else the global one.
    #[must_use]
    pub fn timeout_for(&self, service: &ServiceConfig) -> Duration {
        Duration::from_secs(
            service
                .timeout_seconds
                .unwrap_or(self.global.timeout_seconds),
        )
    }

    /// Identifiers of services that cannot be forwarded to as configured.
    #[must_use]
    pub fn incomplete_services(&self) -> Vec<&str> {
        self.services
            .iter()
            .filter(|(_, s)| s.destination().is_none())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Global {
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for Global {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(
        default,
        alias = "slack_webhook",
        skip_serializing_if = "Option::is_none"
    )]
    pub mirror_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

/// The two fields a service needs before anything can be forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination<'a> {
    pub webhook_url: &'a str,
    pub target: &'a str,
}

impl ServiceConfig {
    /// `None` when either the webhook URL or the routing target is missing or blank.
    #[must_use]
    pub fn destination(&self) -> Option<Destination<'_>> {
        let webhook_url = non_blank(self.webhook_url.as_deref())?;
        let target = non_blank(self.target.as_deref())?;
        Some(Destination {
            webhook_url,
            target,
        })
    }

    #[must_use]
    pub fn mirror(&self) -> Option<&str> {
        non_blank(self.mirror_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

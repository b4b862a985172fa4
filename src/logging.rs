//! Structured logging setup using the `tracing` ecosystem.
//!
//! JSON lines for production, pretty output for a TTY or local
//! development; auto-detected, or forced with `--json` / `--pretty`.
//! Connection-pool chatter from the outbound client is held at `warn`
//! unless the relay itself runs at `trace`.

use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[must_use]
pub fn resolve_format(pretty: bool, json: bool) -> LogFormat {
    if json {
        LogFormat::Json
    } else if pretty || std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[must_use]
pub fn filter_for(level: &LogLevel) -> Targets {
    let level = level.to_tracing_level();
    let client_level = if level == Level::TRACE {
        Level::TRACE
    } else {
        Level::WARN
    };
    Targets::new()
        .with_default(level)
        .with_target("hyper_util", client_level)
        .with_target("rustls", client_level)
}

pub fn init(level: &LogLevel, format: LogFormat) {
    let filter = filter_for(level);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(false))
            .init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }
}

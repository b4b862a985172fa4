//! webhook-relay receives chat-style webhooks and relays them to a
//! downstream messaging API.
//!
//! Each inbound `POST /services/{id}` is mapped to a configured service,
//! its payload reshaped into the destination's `{text, target,
//! threadSubject}` envelope and forwarded once. The original payload can
//! additionally be mirrored to a secondary webhook on a best-effort basis.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, test, health).
//! - [`config`] -- Configuration model, validation, file sources and the
//!   reloadable [`ConfigStore`](config::store::ConfigStore) snapshot.
//! - [`error`] -- Process-level error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`relay`] -- The request path: body decoding, message extraction,
//!   markup normalization, forwarding and mirroring.
//! - [`server`] -- Axum router, shared application state, HTTP client, and
//!   graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file formats |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod relay;
pub mod server;

//! Live configuration snapshot shared by all request handlers.
//!
//! [`ConfigStore`] keeps the current [`Config`] as an `Arc` behind a
//! `RwLock`. Readers clone the `Arc` and drop the guard immediately, so a
//! reload swaps the whole snapshot and no request ever observes a
//! half-updated map. With `reload_on_read` (development mode) the source is
//! re-checked before every lookup; a reload that fails keeps serving the
//! previous snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::model::{Config, ServiceConfig};
use super::{ConfigSource, ConfigVersion};
use crate::error::RelayError;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Arc<Config>,
    pub version: ConfigVersion,
    pub loaded_at: Instant,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Re-read the source before every lookup.
    pub reload_on_read: bool,
    /// Replaces `global.timeout_seconds` on every load.
    pub timeout_override: Option<u64>,
}

/// Point-in-time view of the store for `/health`.
#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub source: &'static str,
    pub version: String,
    pub loaded_ago_seconds: u64,
    pub services: usize,
    pub reloads: u64,
}

/// A service taken from one snapshot, with the timeout in force for it.
#[derive(Debug, Clone)]
pub struct ResolvedService {
    pub service: ServiceConfig,
    pub timeout: Duration,
}

pub struct ConfigStore {
    source: Box<dyn ConfigSource>,
    current: RwLock<LoadedConfig>,
    options: StoreOptions,
    reloads: AtomicU64,
}

impl ConfigStore {
    /// Load the initial snapshot. Any failure here is fatal for the caller.
    pub async fn open(
        source: Box<dyn ConfigSource>,
        options: StoreOptions,
    ) -> Result<Self, RelayError> {
        let (mut config, version) = source.load().await?;
        apply_overrides(&mut config, &options);

        tracing::info!(
            source = source.name(),
            version = version.short(),
            services = config.services.len(),
            reload_on_read = options.reload_on_read,
            "configuration loaded"
        );

        Ok(Self {
            source,
            current: RwLock::new(LoadedConfig {
                config: Arc::new(config),
                version,
                loaded_at: Instant::now(),
            }),
            options,
            reloads: AtomicU64::new(0),
        })
    }

    /// Current snapshot, refreshed first when `reload_on_read` is set.
    pub async fn snapshot(&self) -> Arc<Config> {
        if self.options.reload_on_read {
            self.refresh().await;
        }
        Arc::clone(&self.current.read().await.config)
    }

    /// Exact-key lookup of a service in the current snapshot.
    pub async fn resolve(&self, service_id: &str) -> Option<ResolvedService> {
        let config = self.snapshot().await;
        config.services.get(service_id).map(|service| ResolvedService {
            timeout: config.timeout_for(service),
            service: service.clone(),
        })
    }

    /// Reload from the source if it changed. Returns `true` when a new snapshot was installed.
    pub async fn refresh(&self) -> bool {
        let current_version = self.current.read().await.version.clone();

        match self.source.has_changed(&current_version).await {
            Ok(false) => false,
            Ok(true) => match self.source.load().await {
                Ok((mut config, version)) => {
                    apply_overrides(&mut config, &self.options);
                    let services = config.services.len();
                    let short = version.short().to_string();
                    {
                        let mut loaded = self.current.write().await;
                        loaded.config = Arc::new(config);
                        loaded.version = version;
                        loaded.loaded_at = Instant::now();
                    }
                    self.reloads.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(services, version = %short, "configuration reloaded");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "config reload failed, keeping current config");
                    false
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "config change check failed");
                false
            }
        }
    }

    pub async fn status(&self) -> StoreStatus {
        let loaded = self.current.read().await;
        StoreStatus {
            source: self.source.name(),
            version: loaded.version.short().to_string(),
            loaded_ago_seconds: loaded.loaded_at.elapsed().as_secs(),
            services: loaded.config.services.len(),
            reloads: self.reloads.load(Ordering::Relaxed),
        }
    }
}

fn apply_overrides(config: &mut Config, options: &StoreOptions) {
    if let Some(timeout) = options.timeout_override {
        config.global.timeout_seconds = timeout;
    }
}

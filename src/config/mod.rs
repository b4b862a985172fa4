//! Configuration loading, validation, and reload-on-read.
//!
//! Defines the [`ConfigSource`] trait for pluggable config backends and the
//! [`ConfigVersion`] enum for change detection. [`store::ConfigStore`] owns
//! the live snapshot the request path reads from. Submodules provide the
//! data model, validation logic, and concrete file sources.

pub mod model;
pub mod sources;
pub mod store;
pub mod validation;

use async_trait::async_trait;

use crate::error::RelayError;
use model::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigVersion {
    Hash(String),
}

impl ConfigVersion {
    /// First eight characters, for logs and the health endpoint.
    #[must_use]
    pub fn short(&self) -> &str {
        match self {
            Self::Hash(h) => h.get(..8).unwrap_or(h),
        }
    }
}

// async_trait is required here because ConfigSource is used as Box<dyn ConfigSource>
// and native async fn in traits does not support dyn dispatch.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<(Config, ConfigVersion), RelayError>;
    async fn has_changed(&self, current: &ConfigVersion) -> Result<bool, RelayError>;
}

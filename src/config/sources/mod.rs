//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! Provides file-based sources (YAML, JSON, TOML) gated by feature flags,
//! [`open_file_source`] to pick one from a path's extension, and the
//! [`parse_config_str`] helper used by `validate`.

pub mod file_source;

use std::path::Path;

use sha2::{Digest, Sha256};

use self::file_source::FileSource;
use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::RelayError;

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, RelayError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| RelayError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(RelayError::UnsupportedFormat(other.to_string())),
    }
}

/// Build the file source matching `path`'s extension.
pub fn open_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, RelayError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(FileSource::yaml(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(FileSource::json(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(FileSource::toml(path.to_path_buf()))),

        other => Err(RelayError::UnsupportedFormat(other.to_string())),
    }
}

/// Compute a lowercase hex-encoded SHA-256 digest.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

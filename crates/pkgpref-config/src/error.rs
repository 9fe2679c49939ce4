//! Error types for pkgpref-config

use std::path::PathBuf;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading packages configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scope file exists but could not be read
    #[error("failed to read configuration scope at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A YAML scope did not match the packages schema
    #[error("invalid packages configuration in scope '{scope}': {source}")]
    Yaml {
        scope: String,
        source: serde_yaml::Error,
    },

    /// A TOML scope did not match the packages schema
    #[error("invalid packages configuration in scope '{scope}': {source}")]
    Toml {
        scope: String,
        source: toml::de::Error,
    },
}

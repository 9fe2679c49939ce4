//! Error types for pkgpref-spec

/// Result type for spec parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing spec-language strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A version, version range, or version list could not be parsed
    #[error("invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// A compiler identifier could not be parsed
    #[error("invalid compiler '{input}': {reason}")]
    InvalidCompiler { input: String, reason: String },

    /// An architecture triple could not be parsed
    #[error("invalid architecture '{input}': {reason}")]
    InvalidArchitecture { input: String, reason: String },

    /// A spec string could not be parsed
    #[error("invalid spec '{input}': {reason}")]
    InvalidSpec { input: String, reason: String },
}

impl Error {
    pub(crate) fn version(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidVersion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn spec(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSpec {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

//! Error types for pkgpref-core

use std::fmt;

use crate::category::Category;

/// Result type for preference queries
pub type Result<T> = std::result::Result<T, Error>;

/// A packages configuration key that names a virtual package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    pub name: String,
    /// Scope the entry was defined in, when known.
    pub scope: Option<String>,
}

impl fmt::Display for VirtualEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "{scope}: {}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn list_entries(entries: &[VirtualEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("  {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors that can occur while ranking or comparing candidates
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The packages configuration has top-level entries for virtual packages
    #[error("packages configuration entries cannot be virtual packages:\n{}", list_entries(.entries))]
    VirtualPackageInConfig { entries: Vec<VirtualEntry> },

    /// A configured preference entry is not a valid constraint
    #[error("invalid {category} preference '{entry}' for package '{package}': {source}")]
    InvalidPreference {
        package: String,
        category: Category,
        entry: String,
        source: pkgpref_spec::Error,
    },

    /// A configured external installation has an invalid spec
    #[error("invalid external spec '{entry}' for package '{package}': {source}")]
    InvalidExternal {
        package: String,
        entry: String,
        source: pkgpref_spec::Error,
    },

    /// The package registry does not know the package
    #[error("unknown package '{name}'")]
    UnknownPackage { name: String },

    /// A preference category name was not recognised
    #[error("unknown preference category '{name}'")]
    UnknownCategory { name: String },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] pkgpref_config::Error),

    /// A spec string could not be parsed
    #[error(transparent)]
    Spec(#[from] pkgpref_spec::Error),
}

//! Scope-based loading of the packages configuration.
//!
//! Configuration is read from a list of scopes in increasing priority.
//! Each scope is a single file; `.toml` files are parsed as TOML and
//! everything else as YAML. Later scopes are merged on top of earlier ones
//! with [`PackagesConfig::merge`]. Missing scope files are skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::error::Error;
use crate::schema::PackagesConfig;

/// Directory name under the platform config dir.
const CONFIG_DIR_NAME: &str = "pkgpref";

/// File name of a packages scope.
pub const PACKAGES_FILE: &str = "packages.yaml";

/// A source of packages configuration.
///
/// Implementations hand out a fresh [`PackagesConfig`] on every call;
/// callers that need a stable snapshot cache the result themselves.
pub trait ConfigProvider: Send + Sync {
    fn load(&self) -> Result<PackagesConfig>;
}

/// An in-memory configuration is its own provider.
impl ConfigProvider for PackagesConfig {
    fn load(&self) -> Result<PackagesConfig> {
        Ok(self.clone())
    }
}

/// A named configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigScope {
    /// Name shown in diagnostics, e.g. `user` or `site`.
    pub name: String,
    pub path: PathBuf,
}

impl ConfigScope {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// The per-user scope, `<config_dir>/pkgpref/packages.yaml`.
    ///
    /// - Linux: `~/.config/pkgpref/packages.yaml`
    /// - macOS: `~/Library/Application Support/pkgpref/packages.yaml`
    /// - Windows: `%APPDATA%\pkgpref\packages.yaml`
    pub fn user() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new("user", dir.join(CONFIG_DIR_NAME).join(PACKAGES_FILE)))
    }

    fn is_toml(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "toml")
    }

    /// Read and parse this scope. Returns `None` if the file does not exist.
    pub fn read(&self) -> Result<Option<PackagesConfig>> {
        if !self.path.is_file() {
            tracing::debug!(scope = %self.name, path = ?self.path, "No packages config found, skipping scope");
            return Ok(None);
        }

        tracing::debug!(scope = %self.name, path = ?self.path, "Loading packages config scope");
        let content = fs::read_to_string(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;

        let config = if self.is_toml() {
            PackagesConfig::from_toml_str(&content, &self.name)?
        } else {
            PackagesConfig::from_yaml_str(&content, &self.name)?
        };
        Ok(Some(config))
    }
}

/// Loads and merges packages configuration from a list of scopes.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Scopes in increasing priority.
    scopes: Vec<ConfigScope>,
}

impl ConfigLoader {
    /// A loader with no scopes; it loads an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader reading the per-user scope, if the platform has a config
    /// directory.
    pub fn with_default_scopes() -> Self {
        let mut loader = Self::new();
        if let Some(user) = ConfigScope::user() {
            loader.push_scope(user);
        }
        loader
    }

    /// Add a scope with higher priority than every scope added before it.
    pub fn push_scope(&mut self, scope: ConfigScope) {
        self.scopes.push(scope);
    }

    /// Builder form of [`ConfigLoader::push_scope`].
    pub fn with_scope(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.push_scope(ConfigScope::new(name, path.as_ref()));
        self
    }

    pub fn scopes(&self) -> &[ConfigScope] {
        &self.scopes
    }

    /// Read every scope and merge them in priority order.
    pub fn load(&self) -> Result<PackagesConfig> {
        let mut config = PackagesConfig::new();
        for scope in &self.scopes {
            if let Some(layer) = scope.read()? {
                config.merge(&layer);
            }
        }
        tracing::debug!(packages = config.len(), scopes = self.scopes.len(), "Packages config loaded");
        Ok(config)
    }
}

impl ConfigProvider for ConfigLoader {
    fn load(&self) -> Result<PackagesConfig> {
        ConfigLoader::load(self)
    }
}

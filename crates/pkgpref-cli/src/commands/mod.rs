//! Command implementations for pkgpref-cli

pub mod check;
pub mod externals;
pub mod order;
pub mod sort;

pub use check::run_check;
pub use externals::{run_buildable, run_externals};
pub use order::{run_order, run_rank};
pub use sort::run_sort;

use std::path::PathBuf;

use pkgpref_config::ConfigLoader;
use pkgpref_core::{InMemoryRepository, PreferenceContext};

/// Where configuration comes from and which names are virtual.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config_files: Vec<PathBuf>,
    pub virtuals: Vec<String>,
}

impl Session {
    /// The scopes to load: the given files in priority order, or the user
    /// scope when none were given. Each file scope is named by its path.
    pub fn loader(&self) -> ConfigLoader {
        if self.config_files.is_empty() {
            return ConfigLoader::with_default_scopes();
        }
        self.config_files
            .iter()
            .fold(ConfigLoader::new(), |loader, path| {
                loader.with_scope(path.display().to_string(), path)
            })
    }

    pub fn context(&self) -> PreferenceContext {
        let repository = self
            .virtuals
            .iter()
            .fold(InMemoryRepository::new(), |repo, name| repo.with_virtual(name.as_str()));
        PreferenceContext::new(self.loader()).with_repository(repository)
    }
}

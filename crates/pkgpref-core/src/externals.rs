//! External installations and the buildable flag.

use std::path::PathBuf;

use pkgpref_spec::{ExternalLocation, Satisfies, Spec};

use crate::Result;
use crate::context::PreferenceContext;
use crate::error::Error;

impl PreferenceContext {
    /// Configured external installations of `target`'s package that
    /// satisfy `target`.
    ///
    /// Entries come from the package's `paths` and then its `modules`;
    /// entries with an empty location are skipped. Module entries carry the
    /// prefix reported by the module resolver, or no path if it cannot
    /// resolve the module. The returned specs are owned values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExternal`] if a considered entry's spec does
    /// not parse.
    pub fn external_candidates(&self, target: &Spec) -> Result<Vec<Spec>> {
        let Some(package) = target.name() else {
            return Ok(Vec::new());
        };
        let config = self.packages_config()?;
        let Some(entry) = config.get(package) else {
            return Ok(Vec::new());
        };

        let mut candidates = Vec::new();

        for (entry_spec, path) in &entry.paths {
            if path.is_empty() {
                continue;
            }
            let spec = external_spec(package, entry_spec)?;
            if spec.satisfies(target) {
                candidates.push(spec.with_external(ExternalLocation::Path(PathBuf::from(path))));
            }
        }

        for (entry_spec, module) in &entry.modules {
            if module.is_empty() {
                continue;
            }
            let spec = external_spec(package, entry_spec)?;
            if !spec.satisfies(target) {
                continue;
            }
            let path = self.modules.path_from_module(module);
            if path.is_none() {
                tracing::warn!(package, module = %module, "Could not resolve external module to a prefix");
            }
            candidates.push(spec.with_external(ExternalLocation::Module {
                module: module.clone(),
                path,
            }));
        }

        tracing::debug!(package, target = %target, found = candidates.len(), "External candidates");
        Ok(candidates)
    }

    /// Whether `target`'s package may be built from source.
    ///
    /// Only the package's own entry is consulted; anything but an explicit
    /// `buildable: false` means yes.
    pub fn is_buildable(&self, target: &Spec) -> Result<bool> {
        let Some(package) = target.name() else {
            return Ok(true);
        };
        let config = self.packages_config()?;
        Ok(config
            .get(package)
            .and_then(|entry| entry.buildable)
            .unwrap_or(true))
    }
}

/// Parse an external entry's spec, naming it after the package when the
/// entry leaves the name out.
fn external_spec(package: &str, entry: &str) -> Result<Spec> {
    let mut spec = Spec::parse(entry).map_err(|source| Error::InvalidExternal {
        package: package.to_string(),
        entry: entry.to_string(),
        source,
    })?;
    if spec.name.is_none() {
        spec.name = Some(package.to_string());
    }
    Ok(spec)
}

//! Preference list lookup with the `all` fallback.

use pkgpref_config::{ALL_PACKAGES, PackagesConfig};

use crate::category::Category;

/// Find the configured preference list for `package` and `category`.
///
/// The package's own entry is consulted first, then the `all` entry when
/// `include_wildcard` is set. The first non-empty list wins; lists are
/// never merged across the two. Provider lists are keyed by `sub_key`,
/// which every other category ignores. Entries come back trimmed.
pub fn lookup(
    config: &PackagesConfig,
    package: &str,
    category: Category,
    sub_key: Option<&str>,
    include_wildcard: bool,
) -> Vec<String> {
    let wildcard = include_wildcard.then_some(ALL_PACKAGES);

    for name in std::iter::once(package).chain(wildcard) {
        let Some(entry) = config.get(name) else {
            continue;
        };

        let order = match category {
            Category::Version => entry.version.clone(),
            Category::Compiler => entry.compiler.clone(),
            Category::Architecture => entry.architecture.clone(),
            Category::Variants => entry
                .variants
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| v.entries())
                .unwrap_or_default(),
            Category::Providers => sub_key
                .and_then(|vpkg| entry.providers.get(vpkg))
                .cloned()
                .unwrap_or_default(),
        };

        let order: Vec<String> = order.iter().map(|s| s.trim().to_string()).collect();
        if !order.is_empty() {
            tracing::trace!(package, %category, from = name, len = order.len(), "Preference list found");
            return order;
        }
    }

    Vec::new()
}

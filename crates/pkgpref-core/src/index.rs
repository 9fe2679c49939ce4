//! Preference ranks and the per-list rank index.

use std::fmt;
use std::sync::Arc;

use pkgpref_config::ALL_PACKAGES;
use pkgpref_spec::{Spec, VariantMap};

use crate::Result;
use crate::category::Category;
use crate::constraint::{Candidate, Constraint};
use crate::context::PreferenceContext;
use crate::error::Error;

/// Position in a preference list. Lower is more preferred; a candidate that
/// matches no entry ranks one past the last entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(usize);

impl Rank {
    pub fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ranks candidates against one compiled preference list.
///
/// Obtained from [`PreferenceContext::index`]. The index shares the
/// compiled list with the context cache, so it is cheap to create and
/// remains valid after the context is reset.
#[derive(Debug, Clone)]
pub struct PreferenceIndex {
    package: String,
    category: Category,
    sub_key: Option<String>,
    order: Arc<[Constraint]>,
}

impl PreferenceIndex {
    pub(crate) fn new(
        package: &str,
        category: Category,
        sub_key: Option<&str>,
        order: Arc<[Constraint]>,
    ) -> Self {
        Self {
            package: package.to_string(),
            category,
            sub_key: sub_key.map(str::to_string),
            order,
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn sub_key(&self) -> Option<&str> {
        self.sub_key.as_deref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The rank given to candidates that match nothing.
    pub fn unranked(&self) -> Rank {
        Rank(self.order.len())
    }

    /// Index of the first constraint the candidate satisfies.
    pub fn rank<C: Candidate>(&self, candidate: &C) -> Rank {
        let rank = self
            .order
            .iter()
            .position(|constraint| candidate.satisfies_constraint(constraint))
            .unwrap_or(self.order.len());
        tracing::trace!(package = %self.package, category = %self.category, rank, "Ranked candidate");
        Rank(rank)
    }

    /// Sort candidates by rank. Equal ranks keep their input order.
    pub fn sort<C: Candidate>(&self, candidates: &mut [C]) {
        candidates.sort_by_cached_key(|candidate| self.rank(candidate));
    }
}

/// Index of the first constraint compatible with the candidate in either
/// direction.
pub(crate) fn match_position<C: Candidate>(order: &[Constraint], candidate: &C) -> Option<usize> {
    order
        .iter()
        .position(|constraint| candidate.compatible_with(constraint))
}

impl PreferenceContext {
    /// Whether `package` itself lists preferred providers for `vpkg`.
    ///
    /// The `all` entry is not consulted.
    pub fn has_preferred_providers(&self, package: &str, vpkg: &str) -> Result<bool> {
        let order = self.order_for(package, Category::Providers, Some(vpkg), false)?;
        Ok(!order.is_empty())
    }

    /// The configured variant values for `package`, limited to variants the
    /// package declares.
    ///
    /// The first non-empty `variants` setting of the package or of `all` is
    /// parsed as part of a spec for the package. Undeclared variants are
    /// dropped silently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPackage`] if the package registry does not
    /// know `package`, and [`Error::InvalidPreference`] if the setting does
    /// not parse.
    pub fn preferred_variants(&self, package: &str) -> Result<VariantMap> {
        let info = self
            .packages
            .get(package)
            .ok_or_else(|| Error::UnknownPackage {
                name: package.to_string(),
            })?;

        let config = self.packages_config()?;
        let setting = [package, ALL_PACKAGES]
            .into_iter()
            .filter_map(|name| config.get(name)?.variants.as_ref())
            .find(|setting| !setting.is_empty());
        let Some(setting) = setting else {
            return Ok(VariantMap::new());
        };

        let joined = setting.joined();
        let spec = Spec::parse(&format!("{package} {joined}")).map_err(|source| {
            Error::InvalidPreference {
                package: package.to_string(),
                category: Category::Variants,
                entry: joined.clone(),
                source,
            }
        })?;

        let mut variants = spec.variants;
        variants.retain(|name| info.declares_variant(name));
        Ok(variants)
    }
}

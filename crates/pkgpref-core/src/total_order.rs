//! A total order over specs for choosing a canonical best candidate.

use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pkgpref_spec::Spec;

use crate::Result;
use crate::category::Category;
use crate::compare::{AbsentPolicy, Comparator};

/// Sort with a fallible comparison. The first error stops further
/// comparisons and is returned once the sort finishes; the slice is then
/// left in an unspecified order.
fn try_sort_by<T, E>(
    items: &mut [T],
    mut compare: impl FnMut(&T, &T) -> std::result::Result<Ordering, E>,
) -> std::result::Result<(), E> {
    let failure = Cell::new(None);
    items.sort_by(|a, b| {
        if let Some(err) = failure.take() {
            failure.set(Some(err));
            return Ordering::Equal;
        }
        compare(a, b).unwrap_or_else(|err| {
            failure.set(Some(err));
            Ordering::Equal
        })
    });
    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn hash_of(spec: &Spec) -> u64 {
    let mut hasher = DefaultHasher::new();
    spec.hash(&mut hasher);
    hasher.finish()
}

impl Comparator<'_> {
    /// Compare two specs field by field: name (alphabetical), version,
    /// compiler, variants, architecture, then a hash of the whole spec.
    ///
    /// `Less` means `lhs` is preferred. Over concrete specs this is a
    /// strict total order: distinct specs never compare `Equal`.
    pub fn compare_specs(&self, lhs: &Spec, rhs: &Spec) -> Result<Ordering> {
        self.compare_specs_with_policy(lhs, rhs, AbsentPolicy::default())
    }

    /// [`Comparator::compare_specs`] with the given policy for abstract
    /// versions and compilers.
    pub fn compare_specs_with_policy(&self, lhs: &Spec, rhs: &Spec, policy: AbsentPolicy) -> Result<Ordering> {
        if lhs.name != rhs.name {
            return Ok(lhs.name.cmp(&rhs.name));
        }
        let package = lhs.name().unwrap_or_default();

        if lhs.versions != rhs.versions {
            let ord = self.version_compare_with_policy(package, Some(&lhs.versions), Some(&rhs.versions), policy)?;
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }

        if lhs.compiler != rhs.compiler {
            let ord = self.compiler_compare_with_policy(package, lhs.compiler.as_ref(), rhs.compiler.as_ref(), policy)?;
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }

        if lhs.variants != rhs.variants {
            let ord = self.variant_compare(package, &lhs.variants, &rhs.variants)?;
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }

        if lhs.architecture != rhs.architecture {
            let ord = self.architecture_compare(package, lhs.architecture.as_ref(), rhs.architecture.as_ref())?;
            if ord != Ordering::Equal {
                return Ok(ord);
            }
        }

        let (lhash, rhash) = (hash_of(lhs), hash_of(rhs));
        if lhash != rhash {
            return Ok(lhash.cmp(&rhash));
        }
        Ok(lhs.cmp(rhs))
    }

    /// Sort specs from most to least preferred.
    ///
    /// Every preference list the sort needs is compiled first, so a bad
    /// entry is reported before any element moves. Abstract versions and
    /// compilers are ordered with [`AbsentPolicy::Minimal`], which agrees
    /// with [`Comparator::compare_specs`] except between two abstract
    /// values, where it stays consistent.
    pub fn sort_specs(&self, specs: &mut [Spec]) -> Result<()> {
        let context = self.context();
        let packages: BTreeSet<&str> = specs.iter().map(|s| s.name().unwrap_or_default()).collect();
        for package in packages {
            context.compiled_order(package, Category::Version, None)?;
            context.compiled_order(package, Category::Compiler, None)?;
            context.cached_order(package, Category::Variants, None)?;
            context.cached_order(package, Category::Architecture, None)?;
        }
        tracing::debug!(count = specs.len(), "Sorting specs");

        try_sort_by(specs, |a, b| self.compare_specs_with_policy(a, b, AbsentPolicy::Minimal))
    }
}

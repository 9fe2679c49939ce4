//! Package preference ranking and comparison.
//!
//! Given a packages configuration, this crate answers which candidate a
//! dependency resolver should prefer: which version, compiler, variant
//! setting, architecture, or provider of a virtual package.
//!
//! - [`PreferenceContext`] owns the configuration snapshot and a single
//!   cache of preference lists, resolved per package with an `all`
//!   fallback and compiled into [`Constraint`]s on first use
//! - [`PreferenceIndex`] ranks candidates by the first preference they
//!   satisfy
//! - [`Comparator`] provides three-way comparisons per [`Category`] and a
//!   total order over whole specs
//! - external installations and the buildable flag are queried through
//!   [`PreferenceContext::external_candidates`] and
//!   [`PreferenceContext::is_buildable`]
//!
//! # Example
//!
//! ```
//! use std::cmp::Ordering;
//!
//! use pkgpref_config::PackagesConfig;
//! use pkgpref_core::PreferenceContext;
//! use pkgpref_spec::Spec;
//!
//! let yaml = r#"
//! packages:
//!   scorep:
//!     providers:
//!       mpi: [mvapich, openmpi]
//! "#;
//! let context = PreferenceContext::new(PackagesConfig::from_yaml_str(yaml, "site")?);
//!
//! let mvapich = Spec::parse("mvapich")?;
//! let openmpi = Spec::parse("openmpi")?;
//! let ord = context.comparator().provider_compare("scorep", "mpi", &mvapich, &openmpi)?;
//! assert_eq!(ord, Ordering::Less);
//! # Ok::<(), pkgpref_core::Error>(())
//! ```

pub mod category;
pub mod compare;
pub mod constraint;
pub mod context;
pub mod error;
mod externals;
pub mod index;
pub mod order;
pub mod registry;
mod total_order;

pub use category::Category;
pub use compare::{AbsentPolicy, Comparator};
pub use constraint::{Candidate, Constraint};
pub use context::PreferenceContext;
pub use error::{Error, Result, VirtualEntry};
pub use index::{PreferenceIndex, Rank};
pub use registry::{InMemoryRepository, ModuleResolver, PackageInfo, PackageRegistry, VirtualRegistry};

//! Spec and constraint language for package preference resolution.
//!
//! This crate provides the value types that preferences are expressed in
//! and ranked against:
//!
//! - [`Version`], [`VersionRange`] and [`VersionList`] for version constraints
//! - [`CompilerSpec`] for compiler identifiers (`gcc@4.9:`)
//! - [`Architecture`] for `platform-os-target` triples
//! - [`VariantMap`] for build variants (`+debug ~shared mode=fast`)
//! - [`Spec`], which combines all of the above for one package
//!
//! Every type parses from a string, has a natural ordering consistent with
//! equality, hashes, and implements the directional [`Satisfies`] predicate.
//!
//! # Example
//!
//! ```
//! use pkgpref_spec::{Satisfies, Spec};
//!
//! let candidate = Spec::parse("zlib@1.2.8 %gcc@5.4 +shared").unwrap();
//! let constraint = Spec::parse("zlib@1.2: %gcc").unwrap();
//! assert!(candidate.satisfies(&constraint));
//! assert!(!constraint.satisfies(&candidate));
//! ```

pub mod arch;
pub mod compiler;
pub mod error;
pub mod spec;
pub mod variant;
pub mod version;

pub use arch::Architecture;
pub use compiler::CompilerSpec;
pub use error::{Error, Result};
pub use spec::{ExternalLocation, Spec};
pub use variant::{VariantMap, VariantValue};
pub use version::{Version, VersionItem, VersionList, VersionRange};

/// Directional compatibility between a candidate and a constraint.
///
/// `candidate.satisfies(&constraint)` holds when everything the candidate
/// describes is also allowed by the constraint. It is not symmetric:
/// `zlib@1.2.8` satisfies `zlib@1.2:` but not the other way around.
pub trait Satisfies<C: ?Sized = Self> {
    fn satisfies(&self, constraint: &C) -> bool;
}

/// Names of packages, compilers, and variants.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert!(is_identifier("zlib"));
        assert!(is_identifier("py-numpy"));
        assert!(is_identifier("x86_64"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("-debug"));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn error_display_names_input() {
        let err = Spec::parse("zlib@@").unwrap_err();
        let display = err.to_string();
        assert!(
            display.contains("zlib@@"),
            "Error display should contain the input, got: {}",
            display
        );
    }
}

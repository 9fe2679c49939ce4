//! Compiled preference constraints and the candidates ranked against them.

use std::fmt;

use pkgpref_spec::{CompilerSpec, Satisfies, Spec, VersionList};

use crate::category::Category;

/// One compiled entry of a preference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    Version(VersionList),
    Compiler(CompilerSpec),
    Spec(Spec),
}

impl Constraint {
    /// Compile a configured entry into the constraint type of `category`.
    pub fn compile(category: Category, entry: &str) -> pkgpref_spec::Result<Self> {
        match category {
            Category::Version => VersionList::parse(entry).map(Self::Version),
            Category::Compiler => CompilerSpec::parse(entry).map(Self::Compiler),
            Category::Variants | Category::Architecture | Category::Providers => {
                Spec::parse(entry).map(Self::Spec)
            }
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(v) => write!(f, "{v}"),
            Self::Compiler(c) => write!(f, "{c}"),
            Self::Spec(s) => write!(f, "{s}"),
        }
    }
}

/// A value that can be ranked by a preference list.
///
/// A candidate never matches a constraint of a kind it cannot be compared
/// with; a [`Spec`] is matched against version and compiler constraints
/// through its own versions and compiler.
pub trait Candidate: Ord {
    /// The candidate lies inside the constraint.
    fn satisfies_constraint(&self, constraint: &Constraint) -> bool;

    /// The constraint lies inside the candidate.
    fn admits_constraint(&self, constraint: &Constraint) -> bool;

    fn is_concrete(&self) -> bool;

    /// Compatible in either direction.
    fn compatible_with(&self, constraint: &Constraint) -> bool {
        self.satisfies_constraint(constraint) || self.admits_constraint(constraint)
    }
}

impl Candidate for VersionList {
    fn satisfies_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint, Constraint::Version(c) if self.satisfies(c))
    }

    fn admits_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint, Constraint::Version(c) if c.satisfies(self))
    }

    fn is_concrete(&self) -> bool {
        VersionList::is_concrete(self)
    }
}

impl Candidate for CompilerSpec {
    fn satisfies_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint, Constraint::Compiler(c) if self.satisfies(c))
    }

    fn admits_constraint(&self, constraint: &Constraint) -> bool {
        matches!(constraint, Constraint::Compiler(c) if c.satisfies(self))
    }

    fn is_concrete(&self) -> bool {
        CompilerSpec::is_concrete(self)
    }
}

impl Candidate for Spec {
    fn satisfies_constraint(&self, constraint: &Constraint) -> bool {
        match constraint {
            Constraint::Version(c) => self.versions.satisfies(c),
            Constraint::Compiler(c) => self.compiler.as_ref().is_some_and(|have| have.satisfies(c)),
            Constraint::Spec(c) => self.satisfies(c),
        }
    }

    fn admits_constraint(&self, constraint: &Constraint) -> bool {
        match constraint {
            Constraint::Version(c) => c.satisfies(&self.versions),
            // No compiler on the candidate means any compiler fits.
            Constraint::Compiler(c) => self.compiler.as_ref().is_none_or(|have| c.satisfies(have)),
            Constraint::Spec(c) => c.satisfies(self),
        }
    }

    fn is_concrete(&self) -> bool {
        Spec::is_concrete(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_by_category() {
        assert!(matches!(
            Constraint::compile(Category::Version, "1.2:").unwrap(),
            Constraint::Version(_)
        ));
        assert!(matches!(
            Constraint::compile(Category::Compiler, "gcc@4.9").unwrap(),
            Constraint::Compiler(_)
        ));
        for category in [Category::Variants, Category::Architecture, Category::Providers] {
            assert!(matches!(
                Constraint::compile(category, "mpich").unwrap(),
                Constraint::Spec(_)
            ));
        }
    }

    #[test]
    fn test_compile_rejects_malformed() {
        assert!(Constraint::compile(Category::Version, "1.2:abc:").is_err());
        assert!(Constraint::compile(Category::Compiler, "@4.9").is_err());
        assert!(Constraint::compile(Category::Providers, "mpich@@").is_err());
    }

    #[test]
    fn test_kind_mismatch_never_matches() {
        let version = VersionList::parse("1.2.8").unwrap();
        let compiler = Constraint::compile(Category::Compiler, "gcc").unwrap();
        assert!(!version.compatible_with(&compiler));
    }

    #[test]
    fn test_spec_matches_through_its_parts() {
        let spec = Spec::parse("zlib@1.2.8 %gcc@5.4").unwrap();
        assert!(spec.satisfies_constraint(&Constraint::compile(Category::Version, "1.2:").unwrap()));
        assert!(spec.satisfies_constraint(&Constraint::compile(Category::Compiler, "gcc").unwrap()));
        assert!(!spec.satisfies_constraint(&Constraint::compile(Category::Compiler, "clang").unwrap()));
        assert!(spec.satisfies_constraint(&Constraint::compile(Category::Providers, "zlib").unwrap()));
    }

    #[test]
    fn test_admits_is_the_reverse_direction() {
        let abstract_version = VersionList::parse("1.2:").unwrap();
        let preferred = Constraint::compile(Category::Version, "1.2.8").unwrap();
        assert!(!abstract_version.satisfies_constraint(&preferred));
        assert!(abstract_version.admits_constraint(&preferred));
        assert!(abstract_version.compatible_with(&preferred));
    }
}

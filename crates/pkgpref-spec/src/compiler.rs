//! Compiler identifiers such as `gcc@4.9:` or `clang`.

use std::fmt;
use std::str::FromStr;

use crate::Satisfies;
use crate::error::{Error, Result};
use crate::version::VersionList;

/// A compiler name with an optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompilerSpec {
    name: String,
    versions: VersionList,
}

impl CompilerSpec {
    pub fn new(name: impl Into<String>, versions: VersionList) -> Self {
        Self {
            name: name.into(),
            versions,
        }
    }

    /// Parse `name` or `name@versions`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (name, versions) = match trimmed.split_once('@') {
            Some((name, versions)) => (name, versions),
            None => (trimmed, ""),
        };

        if !crate::is_identifier(name) {
            return Err(Error::InvalidCompiler {
                input: input.to_string(),
                reason: format!("'{name}' is not a valid compiler name"),
            });
        }

        let versions = VersionList::parse(versions).map_err(|e| Error::InvalidCompiler {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::new(name, versions))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn versions(&self) -> &VersionList {
        &self.versions
    }

    /// A compiler is concrete when it names exactly one version.
    pub fn is_concrete(&self) -> bool {
        self.versions.is_concrete()
    }
}

impl Satisfies for CompilerSpec {
    fn satisfies(&self, constraint: &CompilerSpec) -> bool {
        self.name == constraint.name && self.versions.satisfies(&constraint.versions)
    }
}

impl fmt::Display for CompilerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.versions.is_any() {
            write!(f, "@{}", self.versions)?;
        }
        Ok(())
    }
}

impl FromStr for CompilerSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

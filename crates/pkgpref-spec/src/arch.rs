//! Target architectures written as `platform-os-target`.

use std::fmt;
use std::str::FromStr;

use crate::Satisfies;
use crate::error::{Error, Result};

/// A (possibly partial) architecture triple.
///
/// Constraints may leave fields unset: `linux` matches any Linux
/// architecture, `linux-rhel7` any target on RHEL 7.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Architecture {
    pub platform: Option<String>,
    pub os: Option<String>,
    pub target: Option<String>,
}

impl Architecture {
    /// Parse `platform[-os[-target]]`. Empty fields are left unset.
    ///
    /// The target is everything after the second dash, so targets such as
    /// `x86_64` keep their underscores.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let mut parts = trimmed.splitn(3, '-');
        let mut field = || -> Result<Option<String>> {
            match parts.next().map(str::trim) {
                None | Some("") => Ok(None),
                Some(part) if crate::is_identifier(part) => Ok(Some(part.to_string())),
                Some(part) => Err(Error::InvalidArchitecture {
                    input: input.to_string(),
                    reason: format!("invalid field '{part}'"),
                }),
            }
        };

        let arch = Self {
            platform: field()?,
            os: field()?,
            target: field()?,
        };

        if arch.platform.is_none() && arch.os.is_none() && arch.target.is_none() {
            return Err(Error::InvalidArchitecture {
                input: input.to_string(),
                reason: "no fields given".to_string(),
            });
        }

        Ok(arch)
    }

    /// All three fields are known.
    pub fn is_concrete(&self) -> bool {
        self.platform.is_some() && self.os.is_some() && self.target.is_some()
    }
}

impl Satisfies for Architecture {
    fn satisfies(&self, constraint: &Architecture) -> bool {
        fn field(have: &Option<String>, want: &Option<String>) -> bool {
            want.is_none() || have == want
        }
        field(&self.platform, &constraint.platform)
            && field(&self.os, &constraint.os)
            && field(&self.target, &constraint.target)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        let joined = format!(
            "{}-{}-{}",
            field(&self.platform),
            field(&self.os),
            field(&self.target)
        );
        f.write_str(joined.trim_end_matches('-'))
    }
}

impl FromStr for Architecture {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_triple() {
        let arch = Architecture::parse("linux-rhel7-x86_64").unwrap();
        assert_eq!(
            arch,
            Architecture {
                platform: Some("linux".into()),
                os: Some("rhel7".into()),
                target: Some("x86_64".into()),
            }
        );
        assert!(arch.is_concrete());
        assert_eq!(arch.to_string(), "linux-rhel7-x86_64");
    }

    #[test]
    fn test_parse_partial() {
        let arch = Architecture::parse("linux").unwrap();
        assert_eq!(arch.platform.as_deref(), Some("linux"));
        assert!(arch.os.is_none());
        assert!(!arch.is_concrete());
        assert_eq!(arch.to_string(), "linux");

        let arch = Architecture::parse("linux--ppc64le").unwrap();
        assert!(arch.os.is_none());
        assert_eq!(arch.to_string(), "linux--ppc64le");
    }

    #[test]
    fn test_parse_rejects() {
        assert!(Architecture::parse("").is_err());
        assert!(Architecture::parse("--").is_err());
        assert!(Architecture::parse("linux-rh el7").is_err());
    }

    #[test]
    fn test_satisfies_partial_constraint() {
        let full = Architecture::parse("linux-rhel7-x86_64").unwrap();
        assert!(full.satisfies(&Architecture::parse("linux").unwrap()));
        assert!(full.satisfies(&Architecture::parse("linux-rhel7").unwrap()));
        assert!(!full.satisfies(&Architecture::parse("darwin").unwrap()));
        assert!(!Architecture::parse("linux").unwrap().satisfies(&full));
    }
}

//! Preference categories.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// What a preference list ranks.
///
/// Each category reads its own key of a package entry and compiles its
/// entries into one kind of [`Constraint`](crate::Constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Version,
    Compiler,
    Variants,
    Architecture,
    /// Provider preferences, looked up per virtual package.
    Providers,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Version,
        Category::Compiler,
        Category::Variants,
        Category::Architecture,
        Category::Providers,
    ];

    /// The key of this category in a package entry.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Compiler => "compiler",
            Self::Variants => "variants",
            Self::Architecture => "architecture",
            Self::Providers => "providers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.config_key() == s)
            .ok_or_else(|| Error::UnknownCategory { name: s.to_string() })
    }
}

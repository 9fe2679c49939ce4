//! Package specs and their parser.
//!
//! A spec describes a build target:
//!
//! ```text
//! mpich@3.2 %gcc@5.4 +debug ~shared arch=linux-rhel7-x86_64
//! ```
//!
//! Every part is optional. Parts may be separated by whitespace or written
//! back to back (`zlib@1.2%gcc+shared`). A spec without a name is
//! anonymous and is mostly useful as a constraint (`%gcc`, `+debug`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::Satisfies;
use crate::arch::Architecture;
use crate::compiler::CompilerSpec;
use crate::error::{Error, Result};
use crate::variant::{VariantMap, VariantValue};
use crate::version::VersionList;

/// Where a pre-built external installation of a spec lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExternalLocation {
    /// An installation prefix on the filesystem.
    Path(PathBuf),
    /// An environment module, with the prefix it resolved to if known.
    Module { module: String, path: Option<PathBuf> },
}

impl ExternalLocation {
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Path(path) => Some(path),
            Self::Module { path, .. } => path.as_ref(),
        }
    }

    pub fn module(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Module { module, .. } => Some(module),
        }
    }
}

impl fmt::Display for ExternalLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Module { module, path: Some(path) } => {
                write!(f, "module {module} ({})", path.display())
            }
            Self::Module { module, path: None } => write!(f, "module {module}"),
        }
    }
}

/// A package spec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Spec {
    /// Package name, `None` for anonymous specs.
    pub name: Option<String>,
    pub versions: VersionList,
    pub compiler: Option<CompilerSpec>,
    pub variants: VariantMap,
    pub architecture: Option<Architecture>,
    /// Set on specs describing an existing installation. Ignored by
    /// [`Satisfies`].
    pub external: Option<ExternalLocation>,
}

impl Spec {
    /// An unconstrained spec for the named package.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Parse a spec string.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    /// Attach an external installation location.
    pub fn with_external(mut self, location: ExternalLocation) -> Self {
        self.external = Some(location);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }

    /// A spec is concrete once name, version, compiler, and architecture
    /// are all pinned down.
    pub fn is_concrete(&self) -> bool {
        self.name.is_some()
            && self.versions.is_concrete()
            && self.compiler.as_ref().is_some_and(CompilerSpec::is_concrete)
            && self.architecture.as_ref().is_some_and(Architecture::is_concrete)
    }
}

impl Satisfies for Spec {
    fn satisfies(&self, constraint: &Spec) -> bool {
        let name_ok = constraint.name.is_none() || self.name == constraint.name;
        let compiler_ok = match &constraint.compiler {
            None => true,
            Some(want) => self.compiler.as_ref().is_some_and(|have| have.satisfies(want)),
        };
        let arch_ok = match &constraint.architecture {
            None => true,
            Some(want) => self
                .architecture
                .as_ref()
                .is_some_and(|have| have.satisfies(want)),
        };

        name_ok
            && self.versions.satisfies(&constraint.versions)
            && compiler_ok
            && self.variants.satisfies(&constraint.variants)
            && arch_ok
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        let mut head = self.name.clone().unwrap_or_default();
        if !self.versions.is_any() {
            head.push('@');
            head.push_str(&self.versions.to_string());
        }
        if !head.is_empty() {
            parts.push(head);
        }
        if let Some(compiler) = &self.compiler {
            parts.push(format!("%{compiler}"));
        }
        if !self.variants.is_empty() {
            parts.push(self.variants.to_string());
        }
        if let Some(arch) = &self.architecture {
            parts.push(format!("arch={arch}"));
        }

        f.write_str(&parts.join(" "))
    }
}

impl FromStr for Spec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | ',')
}

fn is_value_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ',')
}

/// Single-pass scanner over a spec string.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    spec: Spec,
    seen_versions: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            spec: Spec::default(),
            seen_versions: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    /// Whether the scanner sits at the start of a whitespace-separated word.
    fn at_word_start(&self) -> bool {
        self.input[..self.pos]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::spec(self.input, reason)
    }

    fn parse(mut self) -> Result<Spec> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => self.bump(),
                '@' => {
                    self.bump();
                    self.parse_versions()?;
                }
                '%' => {
                    self.bump();
                    self.parse_compiler()?;
                }
                '+' => {
                    self.bump();
                    self.parse_flag(true)?;
                }
                '~' => {
                    self.bump();
                    self.parse_flag(false)?;
                }
                '-' if self.at_word_start() => {
                    self.bump();
                    self.parse_flag(false)?;
                }
                c if is_ident_char(c) => self.parse_word()?,
                c => return Err(self.error(format!("unexpected character '{c}'"))),
            }
        }
        Ok(self.spec)
    }

    fn parse_versions(&mut self) -> Result<()> {
        if self.seen_versions {
            return Err(self.error("versions given more than once"));
        }
        let raw = self.take_while(is_version_char);
        if raw.is_empty() {
            return Err(self.error("expected a version after '@'"));
        }
        self.spec.versions =
            VersionList::parse(raw).map_err(|e| self.error(e.to_string()))?;
        self.seen_versions = true;
        Ok(())
    }

    fn parse_compiler(&mut self) -> Result<()> {
        if self.spec.compiler.is_some() {
            return Err(self.error("compiler given more than once"));
        }
        let name = self.take_while(is_ident_char);
        if name.is_empty() {
            return Err(self.error("expected a compiler name after '%'"));
        }
        let mut versions = VersionList::any();
        if self.peek() == Some('@') {
            self.bump();
            let raw = self.take_while(is_version_char);
            if raw.is_empty() {
                return Err(self.error("expected a compiler version after '@'"));
            }
            versions = VersionList::parse(raw).map_err(|e| self.error(e.to_string()))?;
        }
        self.spec.compiler = Some(CompilerSpec::new(name, versions));
        Ok(())
    }

    fn parse_flag(&mut self, enabled: bool) -> Result<()> {
        let name = self.take_while(is_ident_char);
        if name.is_empty() {
            return Err(self.error("expected a variant name"));
        }
        self.set_variant(name, VariantValue::Bool(enabled))
    }

    fn set_variant(&mut self, name: &str, value: VariantValue) -> Result<()> {
        if self.spec.variants.insert(name, value).is_some() {
            return Err(self.error(format!("variant '{name}' given more than once")));
        }
        Ok(())
    }

    /// A bare word is the package name; `key=value` sets an architecture
    /// field or a variant.
    fn parse_word(&mut self) -> Result<()> {
        let word = self.take_while(is_ident_char);

        if self.peek() != Some('=') {
            if self.spec.name.is_some() {
                return Err(self.error(format!("unexpected second package name '{word}'")));
            }
            if !crate::is_identifier(word) {
                return Err(self.error(format!("invalid package name '{word}'")));
            }
            self.spec.name = Some(word.to_string());
            return Ok(());
        }

        self.bump();
        let value = self.take_while(is_value_char);
        if value.is_empty() {
            return Err(self.error(format!("expected a value for '{word}'")));
        }

        match word {
            "arch" | "architecture" => {
                if self.spec.architecture.is_some() {
                    return Err(self.error("architecture given more than once"));
                }
                let arch = Architecture::parse(value).map_err(|e| self.error(e.to_string()))?;
                self.spec.architecture = Some(arch);
                Ok(())
            }
            "platform" | "os" | "target" => {
                let arch = self.spec.architecture.get_or_insert_with(Architecture::default);
                let field = match word {
                    "platform" => &mut arch.platform,
                    "os" => &mut arch.os,
                    _ => &mut arch.target,
                };
                if field.replace(value.to_string()).is_some() {
                    return Err(self.error(format!("'{word}' given more than once")));
                }
                Ok(())
            }
            name => {
                let parsed = VariantValue::from_assignment(value)
                    .ok_or_else(|| self.error(format!("empty element in value of '{name}'")))?;
                self.set_variant(name, parsed)
            }
        }
    }
}

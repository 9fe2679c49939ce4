//! Collaborator registries consulted by the preference engine.
//!
//! The engine needs three facts it cannot derive from configuration: which
//! names are virtual packages, which variants a package declares, and
//! where an environment module installs to. Each is a small trait so a
//! host tool can plug in its own package repository. [`InMemoryRepository`]
//! implements all three from tables.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

/// Answers whether a name is a virtual package.
pub trait VirtualRegistry: Send + Sync {
    fn is_virtual(&self, name: &str) -> bool;
}

/// Looks up package declarations.
pub trait PackageRegistry: Send + Sync {
    fn get(&self, name: &str) -> Option<PackageInfo>;
}

/// Resolves an environment module to its installation prefix.
pub trait ModuleResolver: Send + Sync {
    fn path_from_module(&self, module: &str) -> Option<PathBuf>;
}

/// What the engine needs to know about a declared package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    /// Names of the variants the package declares.
    pub variants: BTreeSet<String>,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: BTreeSet::new(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variants.insert(variant.into());
        self
    }

    pub fn declares_variant(&self, variant: &str) -> bool {
        self.variants.contains(variant)
    }
}

/// Table-backed implementation of every collaborator trait.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    virtuals: HashSet<String>,
    packages: HashMap<String, PackageInfo>,
    modules: HashMap<String, PathBuf>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a virtual package name.
    pub fn add_virtual(&mut self, name: impl Into<String>) {
        self.virtuals.insert(name.into());
    }

    /// Register a package, replacing any earlier declaration of the same name.
    pub fn add_package(&mut self, package: PackageInfo) {
        self.packages.insert(package.name.clone(), package);
    }

    /// Register the prefix an environment module loads.
    pub fn add_module(&mut self, module: impl Into<String>, path: impl Into<PathBuf>) {
        self.modules.insert(module.into(), path.into());
    }

    pub fn with_virtual(mut self, name: impl Into<String>) -> Self {
        self.add_virtual(name);
        self
    }

    pub fn with_package(mut self, package: PackageInfo) -> Self {
        self.add_package(package);
        self
    }

    pub fn with_module(mut self, module: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.add_module(module, path);
        self
    }

    /// Registered virtual names, sorted.
    pub fn virtual_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.virtuals.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl VirtualRegistry for InMemoryRepository {
    fn is_virtual(&self, name: &str) -> bool {
        self.virtuals.contains(name)
    }
}

impl PackageRegistry for InMemoryRepository {
    fn get(&self, name: &str) -> Option<PackageInfo> {
        self.packages.get(name).cloned()
    }
}

impl ModuleResolver for InMemoryRepository {
    fn path_from_module(&self, module: &str) -> Option<PathBuf> {
        self.modules.get(module).cloned()
    }
}

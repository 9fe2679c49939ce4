//! The `packages` configuration schema.
//!
//! A scope file looks like this:
//!
//! ```yaml
//! packages:
//!   all:
//!     compiler: [gcc@5.4, clang]
//!     providers:
//!       mpi: [openmpi, mpich]
//!   zlib:
//!     version: [1.2.11, 1.2.8]
//!     variants: +shared
//!     paths:
//!       zlib@1.2.8 arch=linux-rhel7-x86_64: /usr
//!     buildable: false
//! ```
//!
//! Preference lists are ordered from most to least preferred. Scalar list
//! items that YAML reads as numbers or booleans are kept in their string
//! form.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::Result;
use crate::error::Error;

/// The key holding defaults for every package.
pub const ALL_PACKAGES: &str = "all";

/// A `variants` setting, written either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantsSetting {
    One(String),
    Many(Vec<String>),
}

impl VariantsSetting {
    /// The setting as a list of entries; a single string is one entry.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(items) => items.clone(),
        }
    }

    /// All entries joined into one variant string.
    pub fn joined(&self) -> String {
        match self {
            Self::One(s) => s.clone(),
            Self::Many(items) => items.join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(s) => s.trim().is_empty(),
            Self::Many(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }
}

/// Preferences and installation settings for one package (or `all`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageEntry {
    /// Preferred versions or version ranges.
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Vec::is_empty")]
    pub version: Vec<String>,

    /// Preferred compilers.
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Vec::is_empty")]
    pub compiler: Vec<String>,

    /// Preferred target architectures.
    #[serde(default, deserialize_with = "scalar_list", skip_serializing_if = "Vec::is_empty")]
    pub architecture: Vec<String>,

    /// Preferred variant settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<VariantsSetting>,

    /// Preferred providers, keyed by virtual package name.
    #[serde(default, deserialize_with = "provider_map", skip_serializing_if = "IndexMap::is_empty")]
    pub providers: IndexMap<String, Vec<String>>,

    /// External installations: spec string to installation prefix.
    #[serde(default, deserialize_with = "location_map", skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, String>,

    /// External installations: spec string to environment module name.
    #[serde(default, deserialize_with = "location_map", skip_serializing_if = "IndexMap::is_empty")]
    pub modules: IndexMap<String, String>,

    /// Whether the package may be built from source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable: Option<bool>,
}

impl PackageEntry {
    /// Merge a higher-priority entry into this one.
    ///
    /// Lists take the higher-priority items first, followed by the items
    /// of `self` not already present. Maps merge per key. Scalars are
    /// replaced when `higher` sets them.
    pub fn merge(&mut self, higher: &PackageEntry) {
        merge_list(&mut self.version, &higher.version);
        merge_list(&mut self.compiler, &higher.compiler);
        merge_list(&mut self.architecture, &higher.architecture);

        if let Some(variants) = &higher.variants {
            self.variants = Some(variants.clone());
        }

        for (vpkg, providers) in &higher.providers {
            merge_list(self.providers.entry(vpkg.clone()).or_default(), providers);
        }
        for (spec, path) in &higher.paths {
            self.paths.insert(spec.clone(), path.clone());
        }
        for (spec, module) in &higher.modules {
            self.modules.insert(spec.clone(), module.clone());
        }

        if higher.buildable.is_some() {
            self.buildable = higher.buildable;
        }
    }
}

fn merge_list(base: &mut Vec<String>, higher: &[String]) {
    if higher.is_empty() {
        return;
    }
    let mut merged = higher.to_vec();
    merged.extend(base.drain(..).filter(|item| !higher.contains(item)));
    *base = merged;
}

/// The full packages configuration: entries keyed by package name or
/// [`ALL_PACKAGES`], each remembering the scope that last defined it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackagesConfig {
    packages: IndexMap<String, PackageEntry>,
    #[serde(skip)]
    origins: IndexMap<String, String>,
}

/// On-disk layout of a single scope file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScopeFile {
    #[serde(default)]
    packages: Option<IndexMap<String, Option<PackageEntry>>>,
}

impl ScopeFile {
    fn into_config(self, scope: &str) -> PackagesConfig {
        let mut config = PackagesConfig::new();
        for (name, entry) in self.packages.unwrap_or_default() {
            config.insert_from_scope(name, entry.unwrap_or_default(), scope);
        }
        config
    }
}

impl PackagesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML scope.
    ///
    /// # Example
    ///
    /// ```
    /// use pkgpref_config::PackagesConfig;
    ///
    /// let config = PackagesConfig::from_yaml_str(r#"
    /// packages:
    ///   zlib:
    ///     version: [1.2.11, "1.2.8"]
    /// "#, "site").unwrap();
    ///
    /// assert_eq!(config.get("zlib").unwrap().version, vec!["1.2.11", "1.2.8"]);
    /// assert_eq!(config.origin("zlib"), Some("site"));
    /// ```
    pub fn from_yaml_str(content: &str, scope: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        // A document holding only comments deserializes as null.
        let file: Option<ScopeFile> =
            serde_yaml::from_str(content).map_err(|source| Error::Yaml {
                scope: scope.to_string(),
                source,
            })?;
        Ok(file.unwrap_or_default().into_config(scope))
    }

    /// Parse a TOML scope (`[packages.zlib]` tables).
    pub fn from_toml_str(content: &str, scope: &str) -> Result<Self> {
        let file: ScopeFile = toml::from_str(content).map_err(|source| Error::Toml {
            scope: scope.to_string(),
            source,
        })?;
        Ok(file.into_config(scope))
    }

    /// Add or replace an entry without scope information.
    pub fn insert(&mut self, name: impl Into<String>, entry: PackageEntry) {
        let name = name.into();
        self.origins.shift_remove(&name);
        self.packages.insert(name, entry);
    }

    /// Builder form of [`PackagesConfig::insert`].
    pub fn with_package(mut self, name: impl Into<String>, entry: PackageEntry) -> Self {
        self.insert(name, entry);
        self
    }

    fn insert_from_scope(&mut self, name: String, entry: PackageEntry, scope: &str) {
        self.origins.insert(name.clone(), scope.to_string());
        self.packages.insert(name, entry);
    }

    pub fn get(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Top-level keys in definition order.
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageEntry)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The scope that last defined `name`, if it came from a scope.
    pub fn origin(&self, name: &str) -> Option<&str> {
        self.origins.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Merge a higher-priority configuration into this one.
    pub fn merge(&mut self, higher: &PackagesConfig) {
        for (name, entry) in &higher.packages {
            match self.packages.get_mut(name) {
                Some(base) => base.merge(entry),
                None => {
                    self.packages.insert(name.clone(), entry.clone());
                }
            }
            match higher.origins.get(name) {
                Some(scope) => {
                    self.origins.insert(name.clone(), scope.clone());
                }
                None => {
                    self.origins.shift_remove(name);
                }
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            // `{:?}` keeps the fractional part: `3.0` stays "3.0", not "3".
            Self::Float(f) => format!("{f:?}"),
            Self::Str(s) => s.trim().to_string(),
        }
    }
}

fn scalar_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    let items: Option<Vec<Scalar>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Scalar::into_string)
        .collect())
}

fn provider_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, Vec<String>>, D::Error> {
    let map: Option<IndexMap<String, Option<Vec<Scalar>>>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(vpkg, items)| {
            let items = items
                .unwrap_or_default()
                .into_iter()
                .map(Scalar::into_string)
                .collect();
            (vpkg, items)
        })
        .collect())
}

/// `paths`/`modules` values may be left empty (`zlib@1.2.8:`), which reads
/// as an empty location.
fn location_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, String>, D::Error> {
    let map: Option<IndexMap<String, Option<String>>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .map(|(spec, location)| (spec, location.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_entry() {
        let yaml = r#"
packages:
  all:
    compiler: [gcc@5.4, clang]
    providers:
      mpi: [openmpi, mpich]
  zlib:
    version: [1.2.11, "1.2.8", 2]
    variants: +shared
    architecture: [linux-rhel7-x86_64]
    paths:
      zlib@1.2.8: /usr
      zlib@1.2.3:
    modules:
      zlib@1.2.11: zlib/1.2.11
    buildable: false
"#;
        let config = PackagesConfig::from_yaml_str(yaml, "site").unwrap();

        assert_eq!(config.package_names().collect::<Vec<_>>(), vec!["all", "zlib"]);

        let all = config.get(ALL_PACKAGES).unwrap();
        assert_eq!(all.compiler, vec!["gcc@5.4", "clang"]);
        assert_eq!(all.providers["mpi"], vec!["openmpi", "mpich"]);
        assert_eq!(all.buildable, None);

        let zlib = config.get("zlib").unwrap();
        assert_eq!(zlib.version, vec!["1.2.11", "1.2.8", "2"]);
        assert_eq!(zlib.variants, Some(VariantsSetting::One("+shared".into())));
        assert_eq!(zlib.architecture, vec!["linux-rhel7-x86_64"]);
        assert_eq!(zlib.paths["zlib@1.2.8"], "/usr");
        assert_eq!(zlib.paths["zlib@1.2.3"], "");
        assert_eq!(zlib.modules["zlib@1.2.11"], "zlib/1.2.11");
        assert_eq!(zlib.buildable, Some(false));
        assert_eq!(config.origin("zlib"), Some("site"));
    }

    #[test]
    fn test_float_versions_keep_fraction() {
        let config =
            PackagesConfig::from_yaml_str("packages:\n  python:\n    version: [3.0, 2.7, 3]\n", "site").unwrap();
        assert_eq!(config.get("python").unwrap().version, vec!["3.0", "2.7", "3"]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(PackagesConfig::from_yaml_str("", "empty").unwrap().is_empty());
        assert!(PackagesConfig::from_yaml_str("packages:\n", "empty").unwrap().is_empty());

        let config = PackagesConfig::from_yaml_str("packages:\n  zlib:\n", "s").unwrap();
        assert_eq!(config.get("zlib"), Some(&PackageEntry::default()));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = PackagesConfig::from_yaml_str("packages:\n  zlib:\n    versions: [1.2]\n", "site")
            .unwrap_err();
        assert!(err.to_string().contains("site"), "got: {err}");
    }

    #[test]
    fn test_parse_toml() {
        let toml_content = r#"
[packages.zlib]
version = ["1.2.11"]
buildable = false

[packages.all.providers]
mpi = ["mpich"]
"#;
        let config = PackagesConfig::from_toml_str(toml_content, "user").unwrap();
        assert_eq!(config.get("zlib").unwrap().version, vec!["1.2.11"]);
        assert_eq!(config.get("all").unwrap().providers["mpi"], vec!["mpich"]);
    }

    #[test]
    fn test_variants_setting_forms() {
        let one = VariantsSetting::One("+debug ~shared".into());
        assert_eq!(one.entries(), vec!["+debug ~shared"]);
        assert_eq!(one.joined(), "+debug ~shared");

        let many = VariantsSetting::Many(vec!["+debug".into(), "~shared".into()]);
        assert_eq!(many.entries().len(), 2);
        assert_eq!(many.joined(), "+debug ~shared");
        assert!(VariantsSetting::One("  ".into()).is_empty());
    }

    #[test]
    fn test_entry_merge_prefers_higher_scope() {
        let mut base = PackageEntry {
            version: vec!["1.2.8".into(), "1.2.11".into()],
            buildable: Some(false),
            ..Default::default()
        };
        base.providers.insert("mpi".into(), vec!["mpich".into()]);
        base.paths.insert("zlib@1.2.8".into(), "/usr".into());

        let mut higher = PackageEntry {
            version: vec!["1.2.11".into()],
            variants: Some(VariantsSetting::One("+shared".into())),
            ..Default::default()
        };
        higher.providers.insert("mpi".into(), vec!["openmpi".into()]);
        higher.paths.insert("zlib@1.2.8".into(), "/opt/zlib".into());

        base.merge(&higher);

        assert_eq!(base.version, vec!["1.2.11", "1.2.8"]);
        assert_eq!(base.providers["mpi"], vec!["openmpi", "mpich"]);
        assert_eq!(base.paths["zlib@1.2.8"], "/opt/zlib");
        assert_eq!(base.variants, Some(VariantsSetting::One("+shared".into())));
        // Not set by the higher scope, so kept.
        assert_eq!(base.buildable, Some(false));
    }

    #[test]
    fn test_config_merge_tracks_origin() {
        let mut config = PackagesConfig::from_yaml_str("packages:\n  zlib:\n    version: [1.2.8]\n", "defaults").unwrap();
        let user = PackagesConfig::from_yaml_str(
            "packages:\n  zlib:\n    version: [1.2.11]\n  hdf5:\n    buildable: false\n",
            "user",
        )
        .unwrap();

        config.merge(&user);

        assert_eq!(config.get("zlib").unwrap().version, vec!["1.2.11", "1.2.8"]);
        assert_eq!(config.get("hdf5").unwrap().buildable, Some(false));
        assert_eq!(config.origin("zlib"), Some("user"));
        assert_eq!(config.origin("hdf5"), Some("user"));
    }

    #[test]
    fn test_insert_has_no_origin() {
        let config = PackagesConfig::new().with_package("zlib", PackageEntry::default());
        assert!(config.contains("zlib"));
        assert_eq!(config.origin("zlib"), None);
        assert_eq!(config.len(), 1);
    }
}

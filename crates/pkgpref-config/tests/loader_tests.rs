//! Integration tests for scope loading and merging

use pkgpref_config::{ConfigLoader, ConfigProvider, ConfigScope, Error, VariantsSetting};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_scope(temp: &TempDir, file: &str, content: &str) -> PathBuf {
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_higher_scope_lists_come_first() {
    let temp = TempDir::new().unwrap();
    let defaults = write_scope(
        &temp,
        "defaults.yaml",
        r#"
packages:
  all:
    compiler: [gcc, clang]
    providers:
      mpi: [openmpi, mpich]
  zlib:
    version: [1.2.8]
"#,
    );
    let user = write_scope(
        &temp,
        "user.yaml",
        r#"
packages:
  all:
    compiler: [clang]
    providers:
      mpi: [mvapich2]
"#,
    );

    let config = ConfigLoader::new()
        .with_scope("defaults", &defaults)
        .with_scope("user", &user)
        .load()
        .unwrap();

    let all = config.get("all").unwrap();
    assert_eq!(all.compiler, vec!["clang", "gcc"]);
    assert_eq!(all.providers["mpi"], vec!["mvapich2", "openmpi", "mpich"]);
    assert_eq!(config.get("zlib").unwrap().version, vec!["1.2.8"]);
    assert_eq!(config.origin("all"), Some("user"));
    assert_eq!(config.origin("zlib"), Some("defaults"));
}

#[test]
fn test_yaml_and_toml_scopes_mix() {
    let temp = TempDir::new().unwrap();
    let site = write_scope(
        &temp,
        "site.yaml",
        "packages:\n  hdf5:\n    variants: [+mpi, ~cxx]\n    buildable: true\n",
    );
    let user = write_scope(
        &temp,
        "user.toml",
        "[packages.hdf5]\nbuildable = false\n",
    );

    let loader = ConfigLoader::new()
        .with_scope("site", &site)
        .with_scope("user", &user);
    assert_eq!(loader.scopes().len(), 2);

    let provider: &dyn ConfigProvider = &loader;
    let config = provider.load().unwrap();

    let hdf5 = config.get("hdf5").unwrap();
    assert_eq!(hdf5.buildable, Some(false));
    assert_eq!(
        hdf5.variants,
        Some(VariantsSetting::Many(vec!["+mpi".into(), "~cxx".into()]))
    );
}

#[test]
fn test_invalid_scope_names_the_scope() {
    let temp = TempDir::new().unwrap();
    let broken = write_scope(&temp, "broken.yaml", "packages:\n  zlib:\n    buildable: [oops]\n");

    let err = ConfigLoader::new()
        .with_scope("broken-site", &broken)
        .load()
        .unwrap_err();

    assert!(matches!(&err, Error::Yaml { scope, .. } if scope == "broken-site"));
    assert!(err.to_string().contains("broken-site"), "got: {err}");
}

#[test]
fn test_user_scope_location() {
    if let Some(scope) = ConfigScope::user() {
        assert_eq!(scope.name, "user");
        assert!(scope.path.ends_with("pkgpref/packages.yaml"));
    }
}

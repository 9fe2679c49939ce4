//! Packages configuration for package preference resolution.
//!
//! This crate provides:
//!
//! - **Schema**: [`PackagesConfig`] and [`PackageEntry`], the typed form of
//!   a `packages.yaml` file
//! - **Scopes**: [`ConfigScope`] and [`ConfigLoader`], which read several
//!   files and merge them in priority order
//! - **Provider trait**: [`ConfigProvider`], the seam through which the
//!   preference engine obtains its configuration
//!
//! # Example
//!
//! ```no_run
//! use pkgpref_config::ConfigLoader;
//!
//! let loader = ConfigLoader::with_default_scopes()
//!     .with_scope("site", "/etc/pkgpref/packages.yaml");
//! let config = loader.load()?;
//! for name in config.package_names() {
//!     println!("{name}");
//! }
//! # Ok::<(), pkgpref_config::Error>(())
//! ```

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{Error, Result};
pub use loader::{ConfigLoader, ConfigProvider, ConfigScope, PACKAGES_FILE};
pub use schema::{ALL_PACKAGES, PackageEntry, PackagesConfig, VariantsSetting};

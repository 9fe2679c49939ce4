//! The preference context: configuration snapshot plus the order cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use pkgpref_config::{ConfigProvider, PackagesConfig};

use crate::Result;
use crate::category::Category;
use crate::compare::Comparator;
use crate::constraint::Constraint;
use crate::error::{Error, VirtualEntry};
use crate::index::PreferenceIndex;
use crate::order;
use crate::registry::{InMemoryRepository, ModuleResolver, PackageRegistry, VirtualRegistry};

/// Cached lists for one package. Provider lists are keyed by virtual
/// package; every other list by category alone.
///
/// Nested maps keyed by `String` can be probed with a borrowed `&str`, so
/// a cache hit allocates nothing.
#[derive(Debug, Default)]
struct PackageOrders {
    lists: HashMap<Category, Arc<CachedOrder>>,
    providers: HashMap<String, Arc<CachedOrder>>,
}

impl PackageOrders {
    fn get(&self, category: Category, sub_key: Option<&str>) -> Option<&Arc<CachedOrder>> {
        match sub_key {
            Some(vpkg) => self.providers.get(vpkg),
            None => self.lists.get(&category),
        }
    }

    fn get_or_insert(&mut self, category: Category, sub_key: Option<&str>, raw: Vec<String>) -> &Arc<CachedOrder> {
        let fresh = || Arc::new(CachedOrder::new(raw));
        match sub_key {
            Some(vpkg) => self.providers.entry(vpkg.to_string()).or_insert_with(fresh),
            None => self.lists.entry(category).or_insert_with(fresh),
        }
    }

    fn len(&self) -> usize {
        self.lists.len() + self.providers.len()
    }
}

/// One resolved preference list and its compiled form.
///
/// The raw list is fixed when the entry is created; compilation happens on
/// first use and is stored once.
#[derive(Debug)]
pub(crate) struct CachedOrder {
    pub(crate) raw: Vec<String>,
    compiled: OnceLock<Arc<[Constraint]>>,
}

impl CachedOrder {
    fn new(raw: Vec<String>) -> Self {
        Self {
            raw,
            compiled: OnceLock::new(),
        }
    }
}

/// Owns everything preference queries read: the configuration provider,
/// the collaborator registries, the validated configuration snapshot, and
/// a single cache of resolved and compiled preference lists.
///
/// The snapshot is loaded on first use and reused until [`reset`] is
/// called. The context is `Send + Sync`; concurrent first accesses load
/// the configuration once and compile each list once.
///
/// [`reset`]: PreferenceContext::reset
///
/// # Example
///
/// ```
/// use pkgpref_config::{PackageEntry, PackagesConfig};
/// use pkgpref_core::{Category, PreferenceContext};
/// use pkgpref_spec::VersionList;
///
/// let config = PackagesConfig::new().with_package(
///     "zlib",
///     PackageEntry { version: vec!["1.2.8".into(), "1.2.7".into()], ..Default::default() },
/// );
/// let context = PreferenceContext::new(config);
///
/// let index = context.index("zlib", Category::Version, None)?;
/// assert_eq!(index.rank(&VersionList::parse("1.2.7")?).value(), 1);
/// assert_eq!(index.rank(&VersionList::parse("1.3")?), index.unranked());
/// # Ok::<(), pkgpref_core::Error>(())
/// ```
pub struct PreferenceContext {
    provider: Arc<dyn ConfigProvider>,
    pub(crate) virtuals: Arc<dyn VirtualRegistry>,
    pub(crate) packages: Arc<dyn PackageRegistry>,
    pub(crate) modules: Arc<dyn ModuleResolver>,
    snapshot: RwLock<Option<Arc<PackagesConfig>>>,
    orders: RwLock<HashMap<String, PackageOrders>>,
}

impl PreferenceContext {
    /// A context over `provider` with empty registries: no virtual
    /// packages, no declared packages, no resolvable modules.
    pub fn new(provider: impl ConfigProvider + 'static) -> Self {
        let empty = Arc::new(InMemoryRepository::default());
        Self {
            provider: Arc::new(provider),
            virtuals: empty.clone(),
            packages: empty.clone(),
            modules: empty,
            snapshot: RwLock::new(None),
            orders: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_virtual_registry(mut self, registry: Arc<dyn VirtualRegistry>) -> Self {
        self.virtuals = registry;
        self.reset();
        self
    }

    pub fn with_package_registry(mut self, registry: Arc<dyn PackageRegistry>) -> Self {
        self.packages = registry;
        self
    }

    pub fn with_module_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.modules = resolver;
        self
    }

    /// Use one repository for all three collaborator roles.
    pub fn with_repository(self, repository: InMemoryRepository) -> Self {
        let repository = Arc::new(repository);
        self.with_virtual_registry(repository.clone())
            .with_package_registry(repository.clone())
            .with_module_resolver(repository)
    }

    /// The validated configuration snapshot, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VirtualPackageInConfig`] if any top-level entry
    /// names a virtual package, or [`Error::Config`] if loading fails.
    /// Failed loads are not cached.
    pub fn packages_config(&self) -> Result<Arc<PackagesConfig>> {
        if let Some(config) = self.snapshot.read().unwrap_or_else(PoisonError::into_inner).as_ref() {
            return Ok(Arc::clone(config));
        }

        let mut slot = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = slot.as_ref() {
            return Ok(Arc::clone(config));
        }

        let config = self.provider.load()?;
        self.validate(&config)?;
        tracing::debug!(packages = config.len(), "Packages config snapshot taken");

        let config = Arc::new(config);
        *slot = Some(Arc::clone(&config));
        Ok(config)
    }

    fn validate(&self, config: &PackagesConfig) -> Result<()> {
        let entries: Vec<VirtualEntry> = config
            .package_names()
            .filter(|name| self.virtuals.is_virtual(name))
            .map(|name| VirtualEntry {
                name: name.to_string(),
                scope: config.origin(name).map(str::to_string),
            })
            .collect();

        if entries.is_empty() {
            Ok(())
        } else {
            Err(Error::VirtualPackageInConfig { entries })
        }
    }

    /// The configured preference list for `package` and `category`.
    ///
    /// See [`order::lookup`] for the fallback rules. Lists looked up with
    /// the `all` fallback are cached.
    pub fn order_for(
        &self,
        package: &str,
        category: Category,
        sub_key: Option<&str>,
        include_wildcard: bool,
    ) -> Result<Vec<String>> {
        if include_wildcard {
            return Ok(self.cached_order(package, category, sub_key)?.raw.clone());
        }
        let config = self.packages_config()?;
        Ok(order::lookup(&config, package, category, sub_key, false))
    }

    pub(crate) fn cached_order(
        &self,
        package: &str,
        category: Category,
        sub_key: Option<&str>,
    ) -> Result<Arc<CachedOrder>> {
        // Only provider lists are keyed below the category.
        let sub_key = sub_key.filter(|_| category == Category::Providers);

        if let Some(cached) = self
            .orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(package)
            .and_then(|orders| orders.get(category, sub_key))
        {
            return Ok(Arc::clone(cached));
        }

        let config = self.packages_config()?;
        let raw = order::lookup(&config, package, category, sub_key, true);
        tracing::debug!(package, %category, sub_key, len = raw.len(), "Preference list cached");

        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        let cached = orders
            .entry(package.to_string())
            .or_default()
            .get_or_insert(category, sub_key, raw);
        Ok(Arc::clone(cached))
    }

    /// The compiled preference list for `package` and `category`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPreference`] naming the first entry that does
    /// not parse. Nothing is cached for a list that fails to compile.
    pub(crate) fn compiled_order(
        &self,
        package: &str,
        category: Category,
        sub_key: Option<&str>,
    ) -> Result<Arc<[Constraint]>> {
        let cached = self.cached_order(package, category, sub_key)?;
        if let Some(compiled) = cached.compiled.get() {
            return Ok(Arc::clone(compiled));
        }

        let compiled = cached
            .raw
            .iter()
            .map(|entry| {
                Constraint::compile(category, entry).map_err(|source| Error::InvalidPreference {
                    package: package.to_string(),
                    category,
                    entry: entry.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(package, %category, sub_key, len = compiled.len(), "Preference list compiled");

        let compiled: Arc<[Constraint]> = compiled.into();
        Ok(Arc::clone(cached.compiled.get_or_init(|| compiled)))
    }

    /// A rank lookup for one preference list.
    pub fn index(
        &self,
        package: &str,
        category: Category,
        sub_key: Option<&str>,
    ) -> Result<PreferenceIndex> {
        let order = self.compiled_order(package, category, sub_key)?;
        Ok(PreferenceIndex::new(package, category, sub_key, order))
    }

    /// Pairwise comparisons under this context's preferences.
    pub fn comparator(&self) -> Comparator<'_> {
        Comparator::new(self)
    }

    /// Drop the configuration snapshot and every cached list. The next
    /// query reloads from the provider.
    pub fn reset(&self) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.orders.write().unwrap_or_else(PoisonError::into_inner).clear();
        tracing::debug!("Preference caches cleared");
    }

    /// Number of cached preference lists.
    pub fn cache_len(&self) -> usize {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(PackageOrders::len)
            .sum()
    }
}

impl fmt::Debug for PreferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = self.snapshot.read().unwrap_or_else(PoisonError::into_inner).is_some();
        f.debug_struct("PreferenceContext")
            .field("loaded", &loaded)
            .field("cached_orders", &self.cache_len())
            .finish_non_exhaustive()
    }
}

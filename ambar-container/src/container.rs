//! # The Container — heart of Ambar
//!
//! Collects packages, named values, classes and pre-built instances, then
//! scans them exactly once into a set of wired singletons.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──scan()──> Container
//!   packages ─┐                   │
//!   classes ──┼─> catalog ─> validate ─> provide ─> inject ─> singletons
//!   instances ┘                   │
//!                          get_bean_by_type::<T>()
//! ```
//!
//! # Examples
//! ```rust
//! use ambar_container::prelude::*;
//! use ambar_container::descriptor::{BeanDescriptor, BeanKind, BoxError, Instance, Shared, SlotDescriptor};
//! use ambar_container::error::AssignError;
//! use std::any::{Any, TypeId};
//!
//! #[derive(Default)]
//! struct Greeter {
//!     greeting: Option<String>,
//! }
//!
//! fn construct() -> std::result::Result<Instance, BoxError> {
//!     Ok(Box::new(Greeter::default()))
//! }
//!
//! fn assign(target: &mut dyn Any, value: Option<&Shared>) -> std::result::Result<(), AssignError> {
//!     ambar_container::__private::target::<Greeter>(target)?.greeting =
//!         ambar_container::__private::coerce(value)?;
//!     Ok(())
//! }
//!
//! static GREETER: BeanDescriptor = BeanDescriptor {
//!     type_id: TypeId::of::<Greeter>,
//!     type_name: "app::Greeter",
//!     namespace: "app",
//!     name: None,
//!     kind: BeanKind::Concrete(construct),
//!     slots: &[SlotDescriptor { declaring_type: "app::Greeter", field: "greeting", name: None, assign }],
//!     bases: &[],
//! };
//!
//! let mut builder = Container::builder_with(DescriptorTable::new().with(&GREETER));
//! builder.add_package("app");
//! builder.add_injectable("greeting", String::from("hello"))?;
//! let container = builder.scan()?;
//!
//! let greeter = container.get_bean_by_type::<Greeter>()?.expect("constructed");
//! assert_eq!(greeter.greeting.as_deref(), Some("hello"));
//! # Ok::<(), AmbarError>(())
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use ambar_support::rendering::{shorten_type_name, suggest_similar};
use tracing::{debug, info, instrument, trace, warn};

use crate::config::ContainerConfig;
use crate::descriptor::{Bean, BeanDescriptor, Instance, Shared};
use crate::discovery::{InventoryDiscoverer, TypeDiscoverer, namespace_contains};
use crate::error::{AmbarError, OutOfScopeError, Result};
use crate::inject::Injector;
use crate::key::TypeKey;
use crate::naming::bean_name;
use crate::provision::Provision;
use crate::registry::Registry;
use crate::validate::CatalogValidator;

// ═══════════════════════════════════════════
// ScanScope
// ═══════════════════════════════════════════

/// Everything that decides which beans belong to a container.
///
/// Shared by the builder, which fills it, and the container, which checks
/// lookups against it.
struct ScanScope {
    discoverer: Box<dyn TypeDiscoverer>,
    packages: BTreeSet<String>,
    exclusions: BTreeSet<String>,
    classes: Vec<&'static BeanDescriptor>,
    instance_types: HashSet<TypeId>,
}

impl ScanScope {
    fn new(discoverer: Box<dyn TypeDiscoverer>) -> Self {
        Self {
            discoverer,
            packages: BTreeSet::new(),
            exclusions: BTreeSet::new(),
            classes: Vec::new(),
            instance_types: HashSet::new(),
        }
    }

    /// Returns the descriptor of a bean type known to this scope.
    fn descriptor_of(&self, type_id: TypeId) -> Option<&'static BeanDescriptor> {
        self.classes
            .iter()
            .find(|descriptor| (descriptor.type_id)() == type_id)
            .copied()
            .or_else(|| self.discoverer.descriptor_of(type_id))
    }

    fn has_registrations(&self) -> bool {
        !self.packages.is_empty() || !self.classes.is_empty() || !self.instance_types.is_empty()
    }

    fn is_explicit(&self, type_id: TypeId) -> bool {
        self.instance_types.contains(&type_id)
            || self.classes.iter().any(|descriptor| (descriptor.type_id)() == type_id)
    }

    fn in_packages(&self, descriptor: &BeanDescriptor) -> bool {
        self.packages
            .iter()
            .any(|package| namespace_contains(package, descriptor.namespace))
    }

    /// Returns the first exclusion whose short name occurs in `type_name`.
    ///
    /// Matching is by substring, so excluding `Demo` also drops `DemoImpl2`
    /// and any type inside a `demo_x` module path containing it.
    fn excluded_by(&self, type_name: &str) -> Option<&str> {
        self.exclusions
            .iter()
            .find(|short| type_name.contains(short.as_str()))
            .map(String::as_str)
    }

    /// Beans of every package, minus exclusions.
    fn scanned_descriptors(&self) -> Vec<&'static BeanDescriptor> {
        let mut scanned = Vec::new();

        for package in &self.packages {
            let found = match self.discoverer.discover(package) {
                Ok(found) => found,
                Err(error) => {
                    warn!(package = %package, %error, "Package discovery failed, scanning nothing");
                    Vec::new()
                }
            };

            for descriptor in found {
                match self.excluded_by(descriptor.type_name) {
                    Some(short) => {
                        debug!(bean = descriptor.type_name, exclusion = short, "Excluded from scanning")
                    }
                    None => scanned.push(descriptor),
                }
            }
        }

        scanned
    }

    /// Scanned beans, explicit classes and manual instance types,
    /// deduplicated by type and ordered by type path.
    fn assemble_catalog(&self, instances: &HashMap<TypeId, ManualInstance>) -> Vec<&'static BeanDescriptor> {
        let mut seen = HashSet::new();
        let mut catalog: Vec<&'static BeanDescriptor> = self
            .scanned_descriptors()
            .into_iter()
            .chain(self.classes.iter().copied())
            .chain(instances.values().map(|manual| manual.descriptor))
            .filter(|descriptor| seen.insert((descriptor.type_id)()))
            .collect();

        catalog.sort_by_key(|descriptor| descriptor.type_name);
        debug!(beans = catalog.len(), "Assembled bean catalog");
        catalog
    }
}

/// A caller-supplied instance waiting for the scan.
struct ManualInstance {
    descriptor: &'static BeanDescriptor,
    instance: Instance,
}

// ═══════════════════════════════════════════
// ContainerBuilder
// ═══════════════════════════════════════════

/// Collects registrations for a [`Container`].
///
/// Register packages, named values, classes and instances, then call
/// [`scan()`](ContainerBuilder::scan). Scanning consumes the builder, so it
/// runs exactly once.
pub struct ContainerBuilder {
    scope: ScanScope,
    registry: Registry,
    instances: HashMap<TypeId, ManualInstance>,
}

impl ContainerBuilder {
    fn new(discoverer: Box<dyn TypeDiscoverer>) -> Self {
        Self {
            scope: ScanScope::new(discoverer),
            registry: Registry::new(),
            instances: HashMap::new(),
        }
    }

    /// Registers a package (module path) to scan.
    ///
    /// Not validated here; a package that can not be searched scans nothing.
    pub fn add_package(&mut self, package: impl Into<String>) -> &mut Self {
        let package = package.into();
        debug!(package = %package, "Added package");
        self.scope.packages.insert(package);
        self
    }

    /// Excludes the short name of bean `T` from scanning.
    ///
    /// The name is taken from the bean's declared path, so `dyn Port`
    /// excludes `Port`.
    pub fn exclude_from_scanning<T: Bean + ?Sized>(&mut self) -> &mut Self {
        self.exclude_names([shorten_type_name(T::descriptor().type_name)])
    }

    /// Excludes short type names from scanning.
    ///
    /// A scanned bean is dropped when its qualified path contains any
    /// excluded name.
    pub fn exclude_names<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            debug!(name = %name, "Excluded from scanning");
            self.scope.exclusions.insert(name);
        }
        self
    }

    /// Registers a named value for injection.
    ///
    /// # Errors
    /// Returns [`AmbarError::DuplicateNamedValue`] if `name` is taken.
    pub fn add_injectable<V: Any + Send + Sync>(&mut self, name: impl Into<String>, value: V) -> Result<&mut Self> {
        self.registry.register(name.into(), value)?;
        Ok(self)
    }

    /// Same as [`add_injectable`](ContainerBuilder::add_injectable).
    pub fn add_bean<V: Any + Send + Sync>(&mut self, name: impl Into<String>, value: V) -> Result<&mut Self> {
        self.add_injectable(name, value)
    }

    /// Adds a bean type regardless of package membership or exclusions.
    pub fn add_class<T: Bean + ?Sized>(&mut self) -> &mut Self {
        self.add_descriptor(T::descriptor())
    }

    /// Adds a bean descriptor regardless of package membership or exclusions.
    pub fn add_descriptor(&mut self, descriptor: &'static BeanDescriptor) -> &mut Self {
        if !self.scope.is_explicit((descriptor.type_id)()) {
            debug!(bean = descriptor.type_name, "Added class");
            self.scope.classes.push(descriptor);
        }
        self
    }

    /// Registers a pre-built instance as the singleton of its type.
    ///
    /// The instance is not reconstructed but still receives injection.
    ///
    /// # Errors
    /// Returns [`AmbarError::NotABean`] if `T` is not marked as a bean.
    pub fn add_instance<T: Any + Send + Sync>(&mut self, instance: T) -> Result<&mut Self> {
        let key = TypeKey::of::<T>();
        let descriptor = self
            .scope
            .descriptor_of(key.type_id())
            .ok_or(AmbarError::NotABean { key })?;

        let previous = self.instances.insert(
            key.type_id(),
            ManualInstance {
                descriptor,
                instance: Box::new(instance),
            },
        );
        if previous.is_some() {
            warn!(bean = descriptor.type_name, "Replaced previously added instance");
        }

        self.scope.instance_types.insert(key.type_id());
        debug!(bean = descriptor.type_name, "Added instance");
        Ok(self)
    }

    /// Registers the packages and exclusions of a [`ContainerConfig`].
    pub fn apply_config(&mut self, config: &ContainerConfig) -> &mut Self {
        for package in &config.packages {
            self.add_package(package.as_str());
        }
        self.exclude_names(config.exclude.iter().map(String::as_str))
    }

    /// Scans the registrations into a [`Container`].
    ///
    /// Discovers package beans, validates bean and slot names, then
    /// constructs (or takes over) and injects every instantiable bean.
    /// Abstract and interface beans are skipped.
    ///
    /// # Errors
    /// - [`AmbarError::DuplicateBeanName`] / [`AmbarError::DuplicateSlotName`],
    ///   raised before any bean is constructed
    /// - [`AmbarError::ConstructionFailed`], which aborts the whole scan
    #[instrument(skip(self), name = "container_scan")]
    pub fn scan(self) -> Result<Container> {
        let ContainerBuilder {
            scope,
            registry,
            mut instances,
        } = self;

        info!(
            packages = scope.packages.len(),
            classes = scope.classes.len(),
            instances = instances.len(),
            values = registry.len(),
            "Scanning container"
        );

        let catalog = scope.assemble_catalog(&instances);
        let plans = CatalogValidator::new(&catalog).validate()?;

        let injector = Injector::new(&registry);
        let mut singletons: HashMap<&'static str, Shared> = HashMap::with_capacity(plans.len());

        for plan in &plans {
            let provision = match instances.remove(&(plan.descriptor.type_id)()) {
                Some(manual) => Provision::UseGiven(manual.instance),
                None => Provision::ConstructFresh,
            };

            let mut instance = provision.provide(plan.descriptor)?;
            let bound = injector.inject(plan, &mut *instance);
            debug!(bean = plan.name, slots = plan.slots.len(), bound, "Wired singleton");

            singletons.insert(plan.name, Shared::from(instance));
        }

        for manual in instances.values() {
            debug!(bean = manual.descriptor.type_name, "Skipped instance of non-instantiable bean");
        }

        info!(singletons = singletons.len(), "Container scanned successfully ✓");
        Ok(Container { scope, singletons })
    }
}

impl fmt::Debug for ContainerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBuilder")
            .field("packages", &self.scope.packages)
            .field("exclusions", &self.scope.exclusions)
            .field("classes", &self.scope.classes.len())
            .field("instances", &self.instances.len())
            .field("registry", &self.registry)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// A scanned container holding one singleton per instantiable bean.
///
/// Created by [`ContainerBuilder::scan()`].
pub struct Container {
    scope: ScanScope,
    singletons: HashMap<&'static str, Shared>,
}

impl Container {
    /// Create a builder that discovers beans registered with `#[derive(Bean)]`.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new(Box::new(InventoryDiscoverer))
    }

    /// Create a builder with a custom discovery capability.
    pub fn builder_with(discoverer: impl TypeDiscoverer + 'static) -> ContainerBuilder {
        ContainerBuilder::new(Box::new(discoverer))
    }

    /// Returns the singleton of bean type `T`.
    ///
    /// `Ok(None)` means the bean is in scope but has no singleton.
    ///
    /// # Errors
    /// - [`AmbarError::NotABean`] / [`AmbarError::NotInstantiable`]
    /// - [`AmbarError::NothingRegistered`] if the builder had no package,
    ///   class or instance
    /// - [`AmbarError::OutOfScope`] if `T` was excluded, or lies outside every
    ///   package and was not added explicitly
    ///
    /// ```rust,ignore
    /// let service: Arc<UserService> = container.get_bean_by_type()?.expect("scanned");
    /// ```
    pub fn get_bean_by_type<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>> {
        let key = TypeKey::of::<T>();
        let Some(shared) = self.lookup(key)? else {
            return Ok(None);
        };

        shared.downcast::<T>().map(Some).map_err(|_| AmbarError::InstanceMismatch {
            bean: key.type_name(),
            expected: type_name::<T>(),
        })
    }

    /// Type-erased variant of [`get_bean_by_type`](Container::get_bean_by_type),
    /// which also accepts unsized types such as `dyn Trait`.
    pub fn get_any_bean_by_type<T: ?Sized + 'static>(&self) -> Result<Option<Shared>> {
        self.lookup(TypeKey::of::<T>())
    }

    fn lookup(&self, key: TypeKey) -> Result<Option<Shared>> {
        trace!(key = %key, "Looking up bean");

        let descriptor = self
            .scope
            .descriptor_of(key.type_id())
            .ok_or(AmbarError::NotABean { key })?;

        if !descriptor.is_instantiable() {
            return Err(AmbarError::NotInstantiable { key });
        }

        if !self.scope.has_registrations() {
            return Err(AmbarError::NothingRegistered { requested: key });
        }

        self.check_in_scope(descriptor)?;
        Ok(self.singletons.get(bean_name(descriptor)).cloned())
    }

    fn check_in_scope(&self, descriptor: &'static BeanDescriptor) -> Result<()> {
        if self.scope.is_explicit((descriptor.type_id)()) {
            return Ok(());
        }

        let excluded_by = if self.scope.in_packages(descriptor) {
            match self.scope.excluded_by(descriptor.type_name) {
                Some(short) => Some(short.to_string()),
                None => return Ok(()),
            }
        } else {
            None
        };

        Err(AmbarError::OutOfScope(OutOfScopeError {
            requested: TypeKey::of_descriptor(descriptor),
            excluded_by,
            suggestions: self.find_suggestions(descriptor.type_name),
        }))
    }

    fn find_suggestions(&self, type_name: &str) -> Vec<String> {
        let names: Vec<&str> = self.singletons.keys().copied().collect();
        suggest_similar(type_name, &names, 3)
    }

    /// Names of all singletons, sorted.
    pub fn bean_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.singletons.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.singletons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.singletons.is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("singletons", &self.singletons.len())
            .field("packages", &self.scope.packages)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::config::ContainerConfig;
    pub use crate::descriptor::Bean;
    pub use crate::discovery::{DescriptorTable, InventoryDiscoverer, TypeDiscoverer};
    pub use crate::error::{AmbarError, ErrorKind, Result};
    pub use crate::key::TypeKey;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

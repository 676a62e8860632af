//! Bean type discovery.
//!
//! The container never enumerates types itself. It asks a [`TypeDiscoverer`]
//! for the beans of each registered namespace. A namespace is a module path:
//! `app::beans` contains the modules `app::beans` and `app::beans::*`, but
//! not `app::beansx`.

use std::any::TypeId;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, trace};

use crate::descriptor::{BeanDescriptor, BeanRegistration};

/// Error returned when a namespace can not be searched.
///
/// The container degrades such failures to an empty result.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("`{0}` is not a valid namespace")]
    InvalidNamespace(String),
}

/// Finds the bean descriptors of a namespace.
pub trait TypeDiscoverer: Send + Sync {
    /// Returns every bean declared in `namespace` or below it.
    fn discover(&self, namespace: &str) -> Result<Vec<&'static BeanDescriptor>, DiscoveryError>;

    /// Returns the descriptor of a type if it is marked as a bean.
    fn descriptor_of(&self, type_id: TypeId) -> Option<&'static BeanDescriptor>;
}

/// Returns `true` if the module path `module` lies in `namespace`.
///
/// ```
/// use ambar_container::discovery::namespace_contains;
///
/// assert!(namespace_contains("app::beans", "app::beans"));
/// assert!(namespace_contains("app::beans", "app::beans::invalid"));
/// assert!(!namespace_contains("app::beans", "app::beansx"));
/// ```
pub fn namespace_contains(namespace: &str, module: &str) -> bool {
    match module.strip_prefix(namespace) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

/// Checks that every `::` separated segment is a plain identifier.
pub fn validate_namespace(namespace: &str) -> Result<(), DiscoveryError> {
    let valid = !namespace.is_empty()
        && namespace.split("::").all(|segment| {
            !segment.is_empty()
                && !segment.starts_with(|c: char| c.is_ascii_digit())
                && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        });

    if valid {
        Ok(())
    } else {
        Err(DiscoveryError::InvalidNamespace(namespace.to_string()))
    }
}

fn in_namespace<'a>(
    descriptors: impl Iterator<Item = &'a &'static BeanDescriptor>,
    namespace: &str,
) -> Vec<&'static BeanDescriptor> {
    let mut found: Vec<&'static BeanDescriptor> = descriptors
        .filter(|descriptor| namespace_contains(namespace, descriptor.namespace))
        .copied()
        .collect();
    found.sort_by_key(|descriptor| descriptor.type_name);
    found
}

/// Index of every bean registered through `#[derive(Bean)]` or `interface!`.
static INVENTORY_INDEX: Lazy<HashMap<TypeId, &'static BeanDescriptor>> = Lazy::new(|| {
    let index: HashMap<_, _> = inventory::iter::<BeanRegistration>
        .into_iter()
        .map(|registration| {
            let descriptor = (registration.descriptor)();
            ((descriptor.type_id)(), descriptor)
        })
        .collect();
    debug!(beans = index.len(), "Indexed registered beans");
    index
});

/// Discovers the beans registered at link time.
///
/// This is the default discoverer of a [`Container`](crate::container::Container).
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryDiscoverer;

impl TypeDiscoverer for InventoryDiscoverer {
    fn discover(&self, namespace: &str) -> Result<Vec<&'static BeanDescriptor>, DiscoveryError> {
        validate_namespace(namespace)?;
        let found = in_namespace(INVENTORY_INDEX.values(), namespace);
        trace!(namespace, found = found.len(), "Discovered registered beans");
        Ok(found)
    }

    fn descriptor_of(&self, type_id: TypeId) -> Option<&'static BeanDescriptor> {
        INVENTORY_INDEX.get(&type_id).copied()
    }
}

/// An explicit table of descriptors.
///
/// Useful when beans are described by hand or when a container must see
/// only a fixed set of types.
#[derive(Debug, Default, Clone)]
pub struct DescriptorTable {
    descriptors: Vec<&'static BeanDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor. A descriptor already present is ignored.
    pub fn with(mut self, descriptor: &'static BeanDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    pub fn insert(&mut self, descriptor: &'static BeanDescriptor) {
        let type_id = (descriptor.type_id)();
        if !self.descriptors.iter().any(|known| (known.type_id)() == type_id) {
            self.descriptors.push(descriptor);
        }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl TypeDiscoverer for DescriptorTable {
    fn discover(&self, namespace: &str) -> Result<Vec<&'static BeanDescriptor>, DiscoveryError> {
        validate_namespace(namespace)?;
        Ok(in_namespace(self.descriptors.iter(), namespace))
    }

    fn descriptor_of(&self, type_id: TypeId) -> Option<&'static BeanDescriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| (descriptor.type_id)() == type_id)
            .copied()
    }
}

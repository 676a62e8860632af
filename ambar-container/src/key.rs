//! Type identification keys.
//!
//! [`TypeKey`] identifies a bean type within the container. It pairs a
//! [`TypeId`] with the qualified type path used in names and messages.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use ambar_support::rendering::shorten_type_name;

use crate::descriptor::BeanDescriptor;

/// Identifies a type in lookups, exclusions and error messages.
///
/// # Examples
/// ```
/// use ambar_container::key::TypeKey;
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert_eq!(key.short_name(), "String");
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeKey {
    /// Creates a key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Creates a key from a bean descriptor, using its qualified path.
    #[inline]
    pub fn of_descriptor(descriptor: &BeanDescriptor) -> Self {
        Self {
            type_id: (descriptor.type_id)(),
            type_name: descriptor.type_name,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the qualified type path.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the simple name, the last path segment.
    pub fn short_name(&self) -> String {
        shorten_type_name(self.type_name)
    }
}

// Two keys are equal when they name the same TypeId; the path is display-only.
impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.type_name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Service;

    #[test]
    fn key_of_type() {
        let key = TypeKey::of::<Service>();
        assert!(key.type_name().ends_with("Service"));
        assert_eq!(key.short_name(), "Service");
    }

    #[test]
    fn keys_compare_by_type_id() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i32>());
    }

    #[test]
    fn trait_object_key() {
        trait Demo {}
        let key = TypeKey::of::<dyn Demo>();
        assert!(key.type_name().contains("Demo"));
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TypeKey::of::<String>(), "string");
        assert_eq!(map.get(&TypeKey::of::<String>()), Some(&"string"));
        assert_eq!(map.get(&TypeKey::of::<bool>()), None);
    }
}

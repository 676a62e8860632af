//! Bean type descriptors.
//!
//! A [`BeanDescriptor`] is the static metadata the container needs about a
//! bean type: its qualified path, the namespace (module path) it lives in,
//! an optional name override, whether it can be instantiated, and its
//! injectable slots. `#[derive(Bean)]` and [`interface!`](crate::interface)
//! emit one descriptor per type and register it with [`inventory`]; tests
//! and embedders can also build descriptors by hand as `static` items.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::AssignError;

/// A type-erased, shared singleton or named value.
pub type Shared = Arc<dyn Any + Send + Sync>;

/// A type-erased instance that is still being wired.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Boxed error returned by construction routines.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Zero-argument construction routine of a concrete bean.
pub type ConstructFn = fn() -> Result<Instance, BoxError>;

/// Assigns a resolved value (or `None`) to one slot of a bean instance.
pub type AssignFn = fn(&mut dyn Any, Option<&Shared>) -> Result<(), AssignError>;

/// Projects a bean instance onto one of its embedded base beans.
pub type ProjectFn = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Implemented by every type marked as a bean.
///
/// Usually derived with `#[derive(Bean)]`. Trait objects are marked with
/// [`interface!`](crate::interface).
pub trait Bean: 'static {
    fn descriptor() -> &'static BeanDescriptor;
}

/// Whether a bean can be constructed.
#[derive(Clone, Copy)]
pub enum BeanKind {
    /// A concrete type with a zero-argument construction routine.
    Concrete(ConstructFn),
    /// An abstract type: catalogued, never constructed.
    Abstract,
    /// A trait object: catalogued, never constructed.
    Interface,
}

impl fmt::Debug for BeanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeanKind::Concrete(_) => f.write_str("Concrete"),
            BeanKind::Abstract => f.write_str("Abstract"),
            BeanKind::Interface => f.write_str("Interface"),
        }
    }
}

/// A field marked `#[inject]`.
pub struct SlotDescriptor {
    /// Qualified path of the type that declares the field.
    pub declaring_type: &'static str,
    /// The field identifier.
    pub field: &'static str,
    /// Override from `#[named(name = "...")]`.
    pub name: Option<&'static str>,
    pub assign: AssignFn,
}

impl fmt::Debug for SlotDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotDescriptor")
            .field("declaring_type", &self.declaring_type)
            .field("field", &self.field)
            .field("name", &self.name)
            .finish()
    }
}

/// An embedded base bean (`#[base]` field) whose slots are inherited.
pub struct BaseDescriptor {
    pub field: &'static str,
    pub descriptor: fn() -> &'static BeanDescriptor,
    pub project: ProjectFn,
}

impl fmt::Debug for BaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseDescriptor")
            .field("field", &self.field)
            .field("type", &(self.descriptor)().type_name)
            .finish()
    }
}

/// Static metadata of one bean type.
pub struct BeanDescriptor {
    pub type_id: fn() -> TypeId,
    /// Fully qualified path, e.g. `app::beans::UserService`.
    pub type_name: &'static str,
    /// Module path the type is declared in.
    pub namespace: &'static str,
    /// Override from `#[bean(name = "...")]` or `#[named(name = "...")]`.
    pub name: Option<&'static str>,
    pub kind: BeanKind,
    pub slots: &'static [SlotDescriptor],
    pub bases: &'static [BaseDescriptor],
}

impl BeanDescriptor {
    /// Returns `true` unless the bean is abstract or an interface.
    #[inline]
    pub fn is_instantiable(&self) -> bool {
        matches!(self.kind, BeanKind::Concrete(_))
    }
}

impl fmt::Debug for BeanDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDescriptor")
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("slots", &self.slots)
            .field("bases", &self.bases)
            .finish()
    }
}

/// Link-time registration of a bean, collected with [`inventory`].
pub struct BeanRegistration {
    pub descriptor: fn() -> &'static BeanDescriptor,
}

inventory::collect!(BeanRegistration);

/// Marks a trait object as an interface bean.
///
/// The interface is catalogued when its module is scanned, but it is never
/// instantiated and looking it up fails.
///
/// ```
/// use ambar_container::Bean;
///
/// pub trait Repository {}
/// ambar_container::interface!(Repository);
///
/// fn main() {
///     assert!(!<dyn Repository as Bean>::descriptor().is_instantiable());
/// }
/// ```
#[macro_export]
macro_rules! interface {
    ($tr:ident) => {
        $crate::interface!(@emit $tr, ::core::option::Option::None);
    };
    ($tr:ident, name = $name:literal) => {
        $crate::interface!(@emit $tr, ::core::option::Option::Some($name));
    };
    (@emit $tr:ident, $name:expr) => {
        impl $crate::Bean for dyn $tr {
            fn descriptor() -> &'static $crate::BeanDescriptor {
                static DESCRIPTOR: $crate::BeanDescriptor = $crate::BeanDescriptor {
                    type_id: ::core::any::TypeId::of::<dyn $tr>,
                    type_name: ::core::concat!(::core::module_path!(), "::", ::core::stringify!($tr)),
                    namespace: ::core::module_path!(),
                    name: $name,
                    kind: $crate::BeanKind::Interface,
                    slots: &[],
                    bases: &[],
                };
                &DESCRIPTOR
            }
        }

        $crate::__private::inventory::submit! {
            $crate::BeanRegistration { descriptor: <dyn $tr as $crate::Bean>::descriptor }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    fn construct_plain() -> Result<Instance, BoxError> {
        Ok(Box::new(Plain))
    }

    static PLAIN: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Plain>,
        type_name: "app::Plain",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_plain),
        slots: &[],
        bases: &[],
    };

    static ABSTRACT: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Plain>,
        type_name: "app::AbstractPlain",
        namespace: "app",
        name: None,
        kind: BeanKind::Abstract,
        slots: &[],
        bases: &[],
    };

    trait Gateway {}
    crate::interface!(Gateway, name = "gateway");

    #[test]
    fn concrete_is_instantiable() {
        assert!(PLAIN.is_instantiable());
        assert!(!ABSTRACT.is_instantiable());
    }

    #[test]
    fn interface_macro_emits_descriptor() {
        let descriptor = <dyn Gateway as Bean>::descriptor();
        assert!(!descriptor.is_instantiable());
        assert_eq!(descriptor.name, Some("gateway"));
        assert!(descriptor.type_name.ends_with("::Gateway"));
        assert_eq!((descriptor.type_id)(), TypeId::of::<dyn Gateway>());
    }

    #[test]
    fn interface_is_registered_with_inventory() {
        let found = inventory::iter::<BeanRegistration>
            .into_iter()
            .any(|registration| (registration.descriptor)().name == Some("gateway"));
        assert!(found);
    }

    #[test]
    fn debug_hides_function_pointers() {
        let debug = format!("{PLAIN:?}");
        assert!(debug.contains("app::Plain"));
        assert!(debug.contains("Concrete"));
    }
}

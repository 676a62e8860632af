//! Core container implementation for Ambar DI.

pub mod config;
pub mod container;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod key;
pub mod naming;

mod inject;
mod provision;
mod registry;
mod validate;

pub use config::ContainerConfig;
pub use container::{Container, ContainerBuilder, prelude};
pub use descriptor::{
    BaseDescriptor, Bean, BeanDescriptor, BeanKind, BeanRegistration, Shared, SlotDescriptor,
};
pub use discovery::{DescriptorTable, InventoryDiscoverer, TypeDiscoverer};
pub use error::{AmbarError, AssignError, ErrorKind, Result};
pub use key::TypeKey;

/// Support items for code generated by `#[derive(Bean)]` and [`interface!`].
#[doc(hidden)]
pub mod __private {
    pub use crate::descriptor::{BoxError, Instance};
    pub use crate::inject::{coerce, target};
    pub use inventory;

    /// Construction routine of a bean built with `Default`.
    pub fn construct_default<T: Default + Send + Sync + 'static>() -> Result<Instance, BoxError> {
        Ok(Box::new(T::default()))
    }

    /// Wraps the result of a custom constructor.
    pub fn construct_with<T, E>(result: Result<T, E>) -> Result<Instance, BoxError>
    where
        T: Send + Sync + 'static,
        E: Into<BoxError>,
    {
        result.map(|value| Box::new(value) as Instance).map_err(Into::into)
    }
}

//! How a singleton instance comes into being.
//!
//! Each instantiable bean gets one [`Provision`]: either a fresh instance
//! from its construction routine, or the instance the caller handed over
//! with [`ContainerBuilder::add_instance`](crate::container::ContainerBuilder::add_instance).

use tracing::{debug, warn};

use crate::descriptor::{BeanDescriptor, BeanKind, Instance};
use crate::error::{AmbarError, Result};

/// Source of a bean's singleton instance.
pub(crate) enum Provision {
    /// Run the bean's zero-argument construction routine.
    ConstructFresh,
    /// Use a pre-built instance as is.
    UseGiven(Instance),
}

impl Provision {
    /// Produces the instance for `descriptor`.
    ///
    /// # Errors
    /// Returns [`AmbarError::ConstructionFailed`] if the construction routine
    /// fails or the bean has none.
    pub fn provide(self, descriptor: &'static BeanDescriptor) -> Result<Instance> {
        match self {
            Provision::UseGiven(instance) => {
                debug!(bean = descriptor.type_name, "Using given instance");
                Ok(instance)
            }
            Provision::ConstructFresh => {
                let BeanKind::Concrete(construct) = descriptor.kind else {
                    return Err(AmbarError::ConstructionFailed {
                        bean: descriptor.type_name,
                        source: "bean has no construction routine".into(),
                    });
                };

                debug!(bean = descriptor.type_name, "Constructing bean");
                construct().map_err(|source| {
                    warn!(bean = descriptor.type_name, error = %source, "Construction failed");
                    AmbarError::ConstructionFailed {
                        bean: descriptor.type_name,
                        source,
                    }
                })
            }
        }
    }
}

impl std::fmt::Debug for Provision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provision::ConstructFresh => f.write_str("ConstructFresh"),
            Provision::UseGiven(_) => f.write_str("UseGiven"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::BoxError;
    use crate::error::ErrorKind;
    use std::any::TypeId;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);

    fn construct_counter() -> std::result::Result<Instance, BoxError> {
        Ok(Box::new(Counter(0)))
    }

    fn construct_failing() -> std::result::Result<Instance, BoxError> {
        Err("pool exhausted".into())
    }

    static COUNTER: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Counter>,
        type_name: "app::Counter",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_counter),
        slots: &[],
        bases: &[],
    };

    static FAILING: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Counter>,
        type_name: "app::Failing",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_failing),
        slots: &[],
        bases: &[],
    };

    static ABSTRACT: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Counter>,
        type_name: "app::Abstract",
        namespace: "app",
        name: None,
        kind: BeanKind::Abstract,
        slots: &[],
        bases: &[],
    };

    #[test]
    fn construct_fresh_runs_routine() {
        let instance = Provision::ConstructFresh.provide(&COUNTER).unwrap();
        assert_eq!(instance.downcast_ref::<Counter>(), Some(&Counter(0)));
    }

    #[test]
    fn use_given_keeps_instance() {
        let given: Instance = Box::new(Counter(9));
        let instance = Provision::UseGiven(given).provide(&COUNTER).unwrap();
        assert_eq!(instance.downcast_ref::<Counter>(), Some(&Counter(9)));
    }

    #[test]
    fn failing_routine_is_construction_error() {
        let err = Provision::ConstructFresh.provide(&FAILING).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
        assert!(format!("{err}").contains("pool exhausted"));
    }

    #[test]
    fn missing_routine_is_construction_error() {
        let err = Provision::ConstructFresh.provide(&ABSTRACT).unwrap_err();
        assert!(matches!(err, AmbarError::ConstructionFailed { bean: "app::Abstract", .. }));
    }
}

//! Slot injection.
//!
//! Every slot is resolved by name against the named value registry. A name
//! with no registered value assigns `None`: a missing binding is not an
//! error. A failing assignment is logged and skipped; it never aborts the
//! scan.

use std::any::{Any, type_name};

use tracing::{debug, trace, warn};

use crate::descriptor::{BaseDescriptor, Shared};
use crate::error::AssignError;
use crate::registry::Registry;
use crate::validate::BeanPlan;

/// Assigns named values to the slots of bean instances.
pub(crate) struct Injector<'a> {
    registry: &'a Registry,
}

impl<'a> Injector<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Injects every slot of `plan` into `instance`.
    ///
    /// Returns the number of slots that received a value.
    pub fn inject(&self, plan: &BeanPlan, instance: &mut dyn Any) -> usize {
        let mut bound = 0;

        for resolved in &plan.slots {
            let value = self.registry.get(resolved.name);
            if value.is_none() {
                debug!(bean = plan.name, slot = resolved.name, "No named value bound, assigning None");
            }

            let Some(target) = project(instance, &resolved.path) else {
                warn!(
                    bean = plan.name,
                    slot = resolved.name,
                    field = %resolved.qualified_field(),
                    "Failed to reach declaring base of slot"
                );
                continue;
            };

            match (resolved.slot.assign)(target, value) {
                Ok(()) => {
                    trace!(bean = plan.name, slot = resolved.name, "Assigned slot");
                    bound += usize::from(value.is_some());
                }
                Err(error) => warn!(
                    bean = plan.name,
                    slot = resolved.name,
                    field = %resolved.qualified_field(),
                    %error,
                    "Failed to assign slot"
                ),
            }
        }

        bound
    }
}

fn project<'t>(instance: &'t mut dyn Any, path: &[&'static BaseDescriptor]) -> Option<&'t mut dyn Any> {
    path.iter().try_fold(instance, |target, base| (base.project)(target))
}

/// Converts a resolved value into the type of an `Option<T>` slot.
///
/// Used by `#[derive(Bean)]` generated assignment routines.
pub fn coerce<T: Any + Clone>(value: Option<&Shared>) -> Result<Option<T>, AssignError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .downcast_ref::<T>()
            .cloned()
            .map(Some)
            .ok_or(AssignError::TypeMismatch { expected: type_name::<T>() }),
    }
}

/// Downcasts the instance handed to an assignment routine.
pub fn target<T: Any>(instance: &mut dyn Any) -> Result<&mut T, AssignError> {
    instance
        .downcast_mut::<T>()
        .ok_or(AssignError::TargetMismatch { expected: type_name::<T>() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BeanDescriptor, BeanKind, BoxError, Instance, SlotDescriptor};
    use crate::naming::collect_slots;
    use std::any::TypeId;
    use std::sync::Arc;

    #[derive(Default)]
    struct Clock {
        zone: Option<String>,
    }

    #[derive(Default)]
    struct Target {
        value_a: Option<i32>,
        value_b: Option<i32>,
        clock: Clock,
    }

    fn assign_a(instance: &mut dyn Any, value: Option<&Shared>) -> Result<(), AssignError> {
        target::<Target>(instance)?.value_a = coerce(value)?;
        Ok(())
    }

    fn assign_b(instance: &mut dyn Any, value: Option<&Shared>) -> Result<(), AssignError> {
        target::<Target>(instance)?.value_b = coerce(value)?;
        Ok(())
    }

    fn assign_zone(instance: &mut dyn Any, value: Option<&Shared>) -> Result<(), AssignError> {
        target::<Clock>(instance)?.zone = coerce(value)?;
        Ok(())
    }

    fn project_clock(instance: &mut dyn Any) -> Option<&mut dyn Any> {
        instance
            .downcast_mut::<Target>()
            .map(|target| &mut target.clock as &mut dyn Any)
    }

    fn construct_target() -> Result<Instance, BoxError> {
        Ok(Box::new(Target::default()))
    }

    fn clock_descriptor() -> &'static BeanDescriptor {
        &CLOCK
    }

    static CLOCK: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Clock>,
        type_name: "app::Clock",
        namespace: "app",
        name: None,
        kind: BeanKind::Abstract,
        slots: &[SlotDescriptor {
            declaring_type: "app::Clock",
            field: "zone",
            name: None,
            assign: assign_zone,
        }],
        bases: &[],
    };

    static TARGET: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<Target>,
        type_name: "app::Target",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_target),
        slots: &[
            SlotDescriptor {
                declaring_type: "app::Target",
                field: "value_a",
                name: Some("a"),
                assign: assign_a,
            },
            SlotDescriptor {
                declaring_type: "app::Target",
                field: "value_b",
                name: Some("b"),
                assign: assign_b,
            },
        ],
        bases: &[crate::descriptor::BaseDescriptor {
            field: "clock",
            descriptor: clock_descriptor,
            project: project_clock,
        }],
    };

    fn plan() -> BeanPlan {
        BeanPlan {
            descriptor: &TARGET,
            name: "app::Target",
            slots: collect_slots(&TARGET),
        }
    }

    #[test]
    fn injects_own_and_inherited_slots() {
        let mut registry = Registry::new();
        registry.register("a".into(), 1i32).unwrap();
        registry.register("b".into(), 2i32).unwrap();
        registry.register("zone".into(), "UTC".to_string()).unwrap();

        let mut target = Target::default();
        let bound = Injector::new(&registry).inject(&plan(), &mut target);

        assert_eq!(bound, 3);
        assert_eq!(target.value_a, Some(1));
        assert_eq!(target.value_b, Some(2));
        assert_eq!(target.clock.zone.as_deref(), Some("UTC"));
    }

    #[test]
    fn missing_binding_assigns_none() {
        let mut registry = Registry::new();
        registry.register("a".into(), 1i32).unwrap();

        let mut target = Target {
            value_b: Some(7),
            ..Target::default()
        };
        let bound = Injector::new(&registry).inject(&plan(), &mut target);

        assert_eq!(bound, 1);
        assert_eq!(target.value_a, Some(1));
        assert_eq!(target.value_b, None);
    }

    #[test]
    fn type_mismatch_is_suppressed() {
        let mut registry = Registry::new();
        registry.register("a".into(), "not a number").unwrap();
        registry.register("b".into(), 2i32).unwrap();

        let mut target = Target::default();
        let bound = Injector::new(&registry).inject(&plan(), &mut target);

        assert_eq!(bound, 1);
        assert_eq!(target.value_a, None);
        assert_eq!(target.value_b, Some(2));
    }

    #[test]
    fn wrong_target_is_suppressed() {
        let registry = Registry::new();
        let mut wrong = Clock::default();
        assert_eq!(Injector::new(&registry).inject(&plan(), &mut wrong), 0);
    }

    #[test]
    fn coerce_clones_shared_values() {
        let shared: Shared = Arc::new(Arc::new(5u8));
        let value: Option<Arc<u8>> = coerce(Some(&shared)).unwrap();
        assert_eq!(value.as_deref(), Some(&5));
        assert!(matches!(
            coerce::<String>(Some(&shared)),
            Err(AssignError::TypeMismatch { .. })
        ));
    }
}

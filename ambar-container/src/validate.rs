//! Catalog validation.
//!
//! Runs during [`ContainerBuilder::scan()`](crate::container::ContainerBuilder::scan),
//! BEFORE any bean is constructed:
//! - bean names must be unique across the whole catalog
//! - slot names must be unique within every instantiable bean
//!
//! Both checks group by resolved name and reject any group with more
//! than one member.

use std::collections::BTreeMap;

use tracing::{debug, instrument, warn};

use crate::descriptor::BeanDescriptor;
use crate::error::{AmbarError, DuplicateBeanNameError, DuplicateSlotNameError};
use crate::naming::{ResolvedSlot, bean_name, collect_slots};

/// An instantiable bean that passed validation.
#[derive(Debug)]
pub(crate) struct BeanPlan {
    pub descriptor: &'static BeanDescriptor,
    pub name: &'static str,
    pub slots: Vec<ResolvedSlot>,
}

/// Validates an assembled catalog.
pub(crate) struct CatalogValidator<'a> {
    catalog: &'a [&'static BeanDescriptor],
}

impl<'a> CatalogValidator<'a> {
    pub fn new(catalog: &'a [&'static BeanDescriptor]) -> Self {
        Self { catalog }
    }

    /// Validates the catalog and returns one plan per instantiable bean,
    /// in catalog order.
    ///
    /// # Errors
    /// - [`AmbarError::DuplicateBeanName`]: two types share a bean name
    /// - [`AmbarError::DuplicateSlotName`]: one bean has two slots with the same name
    #[instrument(skip(self), name = "catalog_validation", fields(beans = self.catalog.len()))]
    pub fn validate(&self) -> Result<Vec<BeanPlan>, AmbarError> {
        self.check_bean_names()?;

        let plans = self
            .catalog
            .iter()
            .filter(|descriptor| descriptor.is_instantiable())
            .map(|&descriptor| {
                let plan = BeanPlan {
                    descriptor,
                    name: bean_name(descriptor),
                    slots: collect_slots(descriptor),
                };
                check_slot_names(&plan)?;
                Ok(plan)
            })
            .collect::<Result<Vec<_>, AmbarError>>()?;

        debug!(instantiable = plans.len(), "Catalog validation passed ✓");
        Ok(plans)
    }

    fn check_bean_names(&self) -> Result<(), AmbarError> {
        let mut by_name: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        for descriptor in self.catalog {
            by_name
                .entry(bean_name(descriptor))
                .or_default()
                .push(descriptor.type_name);
        }

        match by_name.into_iter().find(|(_, types)| types.len() > 1) {
            Some((name, types)) => {
                warn!(name, types = ?types, "Duplicate bean name");
                Err(AmbarError::DuplicateBeanName(DuplicateBeanNameError { name, types }))
            }
            None => Ok(()),
        }
    }
}

fn check_slot_names(plan: &BeanPlan) -> Result<(), AmbarError> {
    let mut by_name: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for slot in &plan.slots {
        by_name.entry(slot.name).or_default().push(slot.qualified_field());
    }

    match by_name.into_iter().find(|(_, fields)| fields.len() > 1) {
        Some((slot_name, fields)) => {
            warn!(bean = plan.name, slot_name, fields = ?fields, "Duplicate slot name");
            Err(AmbarError::DuplicateSlotName(DuplicateSlotNameError {
                bean: plan.descriptor.type_name,
                slot_name,
                fields,
            }))
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{BeanKind, BoxError, Instance, Shared, SlotDescriptor};
    use crate::error::AssignError;
    use std::any::{Any, TypeId};

    struct A;
    struct B;
    struct C;

    fn ignore(_: &mut dyn Any, _: Option<&Shared>) -> Result<(), AssignError> {
        Ok(())
    }

    fn construct_a() -> Result<Instance, BoxError> {
        Ok(Box::new(A))
    }

    const fn slot(field: &'static str, name: Option<&'static str>) -> SlotDescriptor {
        SlotDescriptor {
            declaring_type: "app::A",
            field,
            name,
            assign: ignore,
        }
    }

    static UNIQUE_SLOTS: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<A>,
        type_name: "app::A",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_a),
        slots: &[slot("value_a", Some("a")), slot("value_b", Some("b"))],
        bases: &[],
    };

    static CLASHING_SLOTS: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<A>,
        type_name: "app::A",
        namespace: "app",
        name: None,
        kind: BeanKind::Concrete(construct_a),
        slots: &[slot("demo1", Some("demo2")), slot("demo2", None)],
        bases: &[],
    };

    static ABSTRACT_CLASHING: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<B>,
        type_name: "app::B",
        namespace: "app",
        name: None,
        kind: BeanKind::Abstract,
        slots: &[slot("x", None), slot("y", Some("x"))],
        bases: &[],
    };

    static NAMED_34: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<B>,
        type_name: "app::DemoImpl3",
        namespace: "app",
        name: Some("Demo34"),
        kind: BeanKind::Abstract,
        slots: &[],
        bases: &[],
    };

    static ALSO_NAMED_34: BeanDescriptor = BeanDescriptor {
        type_id: TypeId::of::<C>,
        type_name: "app::DemoImpl4",
        namespace: "app",
        name: Some("Demo34"),
        kind: BeanKind::Abstract,
        slots: &[],
        bases: &[],
    };

    #[test]
    fn valid_catalog_plans_instantiable_beans() {
        let catalog = [&UNIQUE_SLOTS, &NAMED_34];
        let plans = CatalogValidator::new(&catalog).validate().unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "app::A");
        assert_eq!(plans[0].slots.len(), 2);
    }

    #[test]
    fn detect_duplicate_slot_names() {
        let catalog = [&CLASHING_SLOTS];
        match CatalogValidator::new(&catalog).validate().unwrap_err() {
            AmbarError::DuplicateSlotName(err) => {
                assert_eq!(err.slot_name, "demo2");
                assert_eq!(err.fields.len(), 2);
            }
            other => panic!("Expected DuplicateSlotName, got: {other:?}"),
        }
    }

    #[test]
    fn abstract_beans_skip_slot_check() {
        let catalog = [&ABSTRACT_CLASHING];
        assert!(CatalogValidator::new(&catalog).validate().is_ok());
    }

    #[test]
    fn detect_duplicate_bean_names() {
        let catalog = [&NAMED_34, &UNIQUE_SLOTS, &ALSO_NAMED_34];
        match CatalogValidator::new(&catalog).validate().unwrap_err() {
            AmbarError::DuplicateBeanName(err) => {
                assert_eq!(err.name, "Demo34");
                assert_eq!(err.types, vec!["app::DemoImpl3", "app::DemoImpl4"]);
            }
            other => panic!("Expected DuplicateBeanName, got: {other:?}"),
        }
    }

    #[test]
    fn bean_names_checked_before_slots() {
        let catalog = [&CLASHING_SLOTS, &NAMED_34, &ALSO_NAMED_34];
        let err = CatalogValidator::new(&catalog).validate().unwrap_err();
        assert!(matches!(err, AmbarError::DuplicateBeanName(_)));
    }
}

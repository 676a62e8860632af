//! Canonical names of beans and slots.
//!
//! A bean is named by its override, else by its qualified type path. A slot
//! is named by its override, else by its field identifier.

use crate::descriptor::{BaseDescriptor, BeanDescriptor, SlotDescriptor};

/// Returns the canonical name of a bean.
#[inline]
pub fn bean_name(descriptor: &BeanDescriptor) -> &'static str {
    descriptor.name.unwrap_or(descriptor.type_name)
}

/// Returns the canonical name of a slot.
#[inline]
pub fn slot_name(slot: &SlotDescriptor) -> &'static str {
    slot.name.unwrap_or(slot.field)
}

/// A slot together with the route from the bean to its declaring type.
#[derive(Debug, Clone)]
pub struct ResolvedSlot {
    pub name: &'static str,
    pub slot: &'static SlotDescriptor,
    /// Base projections to apply, outermost first. Empty for own slots.
    pub path: Vec<&'static BaseDescriptor>,
}

impl ResolvedSlot {
    /// `declaring_type::field`, used in diagnostics.
    pub fn qualified_field(&self) -> String {
        format!("{}::{}", self.slot.declaring_type, self.slot.field)
    }
}

/// Collects every slot of a bean, own slots first, then inherited ones.
pub fn collect_slots(descriptor: &'static BeanDescriptor) -> Vec<ResolvedSlot> {
    let mut slots: Vec<ResolvedSlot> = descriptor
        .slots
        .iter()
        .map(|slot| ResolvedSlot {
            name: slot_name(slot),
            slot,
            path: Vec::new(),
        })
        .collect();

    for base in descriptor.bases {
        for mut inherited in collect_slots((base.descriptor)()) {
            inherited.path.insert(0, base);
            slots.push(inherited);
        }
    }

    slots
}

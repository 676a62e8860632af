//! Named value registry.
//!
//! The registry maps injection names to caller-supplied values. Slots are
//! resolved against it by name during the scan.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::descriptor::Shared;
use crate::error::{AmbarError, Result};

/// Stores every named value of a container.
///
/// Names are unique; a registered value is never replaced.
#[derive(Default)]
pub(crate) struct Registry {
    values: HashMap<String, Shared>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` under `name`.
    ///
    /// # Errors
    /// Returns [`AmbarError::DuplicateNamedValue`] if `name` is taken.
    pub fn register<V: Any + Send + Sync>(&mut self, name: String, value: V) -> Result<()> {
        if self.values.contains_key(&name) {
            return Err(AmbarError::DuplicateNamedValue { name });
        }

        debug!(name = %name, value_type = std::any::type_name::<V>(), "Registered named value");
        self.values.insert(name, Arc::new(value));
        Ok(())
    }

    /// Looks up a value by name.
    pub fn get(&self, name: &str) -> Option<&Shared> {
        let value = self.values.get(name);
        trace!(name, found = value.is_some(), "Named value lookup");
        value
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.values.keys().collect();
        names.sort();
        f.debug_struct("Registry").field("names", &names).finish()
    }
}

//! Error types for Ambar container operations.
//!
//! Every [`AmbarError`] belongs to one [`ErrorKind`]: caller mistakes are
//! [`ErrorKind::InvalidArgument`], broken bean configuration is
//! [`ErrorKind::IllegalState`], and a failing construction routine is
//! [`ErrorKind::Construction`].

use std::fmt;

use ambar_support::rendering::render_list;

use crate::descriptor::BoxError;
use crate::key::TypeKey;

/// Coarse classification of an [`AmbarError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    IllegalState,
    Construction,
}

/// Main error type for all Ambar operations.
#[derive(Debug, thiserror::Error)]
pub enum AmbarError {
    /// A named value with this name was already registered.
    #[error(
        "Named value already registered: `{name}`\n  Hint: injectable names must be unique within a container"
    )]
    DuplicateNamedValue { name: String },

    /// The type is not marked as a bean.
    #[error("Type {key} is not a bean\n  Hint: Did you forget #[derive(Bean)]?")]
    NotABean { key: TypeKey },

    /// The bean is abstract or an interface.
    #[error("Type {key} can not be instantiated\n  Hint: abstract and interface beans are never constructed")]
    NotInstantiable { key: TypeKey },

    /// The bean was excluded or lies outside every scanned namespace.
    #[error("{}", .0)]
    OutOfScope(OutOfScopeError),

    /// Two slots of one bean resolve to the same name.
    #[error("{}", .0)]
    DuplicateSlotName(DuplicateSlotNameError),

    /// Two beans resolve to the same name.
    #[error("{}", .0)]
    DuplicateBeanName(DuplicateBeanNameError),

    /// A lookup happened before any namespace, class or instance was added.
    #[error(
        "Nothing registered while looking up {requested}\n  Hint: add a package, class or instance before scanning"
    )]
    NothingRegistered { requested: TypeKey },

    /// A construction routine returned an error.
    #[error("Failed to construct {bean}: {source}")]
    ConstructionFailed {
        bean: &'static str,
        #[source]
        source: BoxError,
    },

    /// A stored singleton does not have the requested type.
    #[error("Singleton `{bean}` is not a {expected}")]
    InstanceMismatch {
        bean: &'static str,
        expected: &'static str,
    },
}

impl AmbarError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmbarError::DuplicateNamedValue { .. }
            | AmbarError::NotABean { .. }
            | AmbarError::NotInstantiable { .. }
            | AmbarError::OutOfScope(_) => ErrorKind::InvalidArgument,
            AmbarError::DuplicateSlotName(_)
            | AmbarError::DuplicateBeanName(_)
            | AmbarError::NothingRegistered { .. }
            | AmbarError::InstanceMismatch { .. } => ErrorKind::IllegalState,
            AmbarError::ConstructionFailed { .. } => ErrorKind::Construction,
        }
    }
}

/// Error when a looked-up bean is not part of the scanned catalog.
#[derive(Debug)]
pub struct OutOfScopeError {
    pub requested: TypeKey,
    /// Set when the type lies inside a package but its short name is excluded.
    pub excluded_by: Option<String>,
    /// Catalogued beans with similar names.
    pub suggestions: Vec<String>,
}

impl fmt::Display for OutOfScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.excluded_by {
            Some(ref short) => write!(
                f,
                "Bean {} was excluded from scanning by `{short}`",
                self.requested
            )?,
            None => write!(
                f,
                "Bean {} has not been added and is outside every scanned package",
                self.requested
            )?,
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .add_class::<{}>()?",
            self.requested.short_name()
        )
    }
}

/// Error when slots of one bean share a resolved name.
#[derive(Debug)]
pub struct DuplicateSlotNameError {
    pub bean: &'static str,
    pub slot_name: &'static str,
    /// `declaring_type::field` of every colliding slot.
    pub fields: Vec<String>,
}

impl fmt::Display for DuplicateSlotNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bean {} has several injectable slots named `{}`: {}",
            self.bean,
            self.slot_name,
            render_list(&self.fields)
        )?;
        write!(f, "\n  Hint: give each slot a distinct #[named(name = \"...\")]")
    }
}

/// Error when distinct bean types share a resolved name.
#[derive(Debug)]
pub struct DuplicateBeanNameError {
    pub name: &'static str,
    pub types: Vec<&'static str>,
}

impl fmt::Display for DuplicateBeanNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bean name `{}` is used by several types: {}",
            self.name,
            render_list(&self.types)
        )?;
        write!(f, "\n  Hint: rename one of them or exclude it from scanning")
    }
}

/// Error when a slot value can not be assigned.
///
/// Logged and suppressed by the injector, never returned from a scan.
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    #[error("value is not a {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("target instance is not a {expected}")]
    TargetMismatch { expected: &'static str },
}

/// Convenient Result type for Ambar operations.
pub type Result<T> = std::result::Result<T, AmbarError>;

//! Procedural macros for Ambar.
//!
//! Use them through the `ambar` crate rather than depending on this one.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod bean;

/// Marks a struct as a bean and registers it for package scanning.
///
/// # Type attributes
/// - `#[bean(name = "...")]` or `#[named(name = "...")]`: overrides the bean
///   name, which defaults to the qualified type path
/// - `#[bean(abstract_type)]`: catalogued but never constructed
/// - `#[bean(constructor = "path::to::fn")]`: zero-argument routine returning
///   `Result<Self, E>`; without it the bean is built with `Default`
/// - `#[bean(crate = "path")]`: path of the `ambar` crate
///
/// # Field attributes
/// - `#[inject]` on an `Option<T>` field: an injectable slot
/// - `#[named(name = "...")]`: overrides the slot name, which defaults to the
///   field name
/// - `#[base]` on a field whose type is a bean: inherits that bean's slots
///
/// ```rust,ignore
/// #[derive(Default, Bean)]
/// #[bean(name = "myBean")]
/// pub struct InjectionTargetNamed {
///     #[inject]
///     #[named(name = "a")]
///     value_a: Option<i32>,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean, named, inject, base))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bean::expand(&input)
        .unwrap_or_else(darling::Error::write_errors)
        .into()
}

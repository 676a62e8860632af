//! # Ambar — scanning dependency injection for Rust
//!
//! Mark structs with `#[derive(Bean)]`, register packages (module paths)
//! and named values on a builder, then scan once: every instantiable bean
//! becomes a singleton with its `#[inject]` slots filled by name.
//!
//! ```rust
//! use ambar::prelude::*;
//! use ambar::Bean;
//!
//! #[derive(Default, Bean)]
//! struct Greeter {
//!     #[inject]
//!     #[named(name = "greeting")]
//!     text: Option<String>,
//! }
//!
//! fn main() -> ambar::Result<()> {
//!     let mut builder = Container::builder();
//!     builder.add_class::<Greeter>();
//!     builder.add_injectable("greeting", String::from("hello"))?;
//!     let container = builder.scan()?;
//!
//!     let greeter = container.get_bean_by_type::<Greeter>()?.expect("scanned");
//!     assert_eq!(greeter.text.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

pub use ambar_container::*;
pub use ambar_derive::*;
pub use ambar_support::*;

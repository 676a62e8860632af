//! Derive macros for Ambar beans.

pub use ambar_macros::Bean;

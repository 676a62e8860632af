//! # Ambar Support
//!
//! Shared helpers for the Ambar DI crates.
//!
//! This crate provides:
//! - Short-name derivation for qualified type paths
//! - Rendering of name lists and "did you mean?" suggestions for errors

pub mod rendering;

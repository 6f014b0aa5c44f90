//! Domain layer for flag-panel
//!
//! This crate contains the flag schema, value objects, and merge rules.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Schema
//!
//! The set of flags is fixed at compile time. Each entry declares its key,
//! its value kind (toggle, bounded count, or closed choice), and its default.
//!
//! ## FlagSet
//!
//! A [`FlagSet`] always holds a value for every schema key. It is rebuilt
//! from the flags file on every read, updated by merging a partial JSON
//! object, and written back in full.

pub mod core;
pub mod flags;

// Re-export commonly used types
pub use core::error::DomainError;
pub use flags::{
    flag_set::FlagSet,
    schema::{FieldKind, FieldSpec, MAX_INSTANCES, OS_TYPES, lookup_field, schema},
    value::FlagValue,
};

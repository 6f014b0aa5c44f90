//! Feature flags managed by the control panel.
//!
//! - [`schema`]: the fixed flag registry and per-kind coercion rules
//! - [`value::FlagValue`]: a single typed value
//! - [`flag_set::FlagSet`]: a complete, normalized assignment of values

pub mod flag_set;
pub mod schema;
pub mod value;

//! Flag value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single flag value.
///
/// Serialized untagged so a [`FlagSet`](super::FlagSet) renders as a flat
/// JSON object (`{"enable_vpc": false, "instance_count": 2, ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Toggle(bool),
    Count(i64),
    Choice(String),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FlagValue::Toggle(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlagValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Choice(s) => Some(s),
            _ => None,
        }
    }
}

/// Renders the value the way it appears on the right-hand side of a
/// `key = value` line: bare booleans and integers, quoted strings.
impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Toggle(b) => write!(f, "{}", b),
            FlagValue::Count(n) => write!(f, "{}", n),
            FlagValue::Choice(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Toggle(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Count(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::Choice(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_tfvars_syntax() {
        assert_eq!(FlagValue::Toggle(true).to_string(), "true");
        assert_eq!(FlagValue::Count(3).to_string(), "3");
        assert_eq!(FlagValue::from("ubuntu").to_string(), "\"ubuntu\"");
    }

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(serde_json::to_string(&FlagValue::Toggle(false)).unwrap(), "false");
        assert_eq!(serde_json::to_string(&FlagValue::Count(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&FlagValue::from("amazon_linux")).unwrap(),
            "\"amazon_linux\""
        );
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        assert_eq!(FlagValue::Toggle(true).as_i64(), None);
        assert_eq!(FlagValue::Count(1).as_bool(), None);
        assert_eq!(FlagValue::from("x").as_str(), Some("x"));
    }
}

//! Flag schema registry.
//!
//! Defines the fixed set of flags the control panel manages: key name,
//! description, value kind, and default. Every read, merge, and write
//! iterates this table, so adding a flag means adding one entry here.

use super::value::FlagValue;
use serde_json::Value;

/// The value domain of a flag, with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// On/off switch.
    Toggle { default: bool },
    /// Integer clamped into `[min, max]`.
    Count { min: i64, max: i64, default: i64 },
    /// One of a closed set of lower-case tokens. Unrecognized input
    /// collapses to `allowed[0]`.
    Choice {
        allowed: &'static [&'static str],
        default: &'static str,
    },
}

/// Metadata for a single flag.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Variable name as written in the flags file and the JSON API.
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// The value this flag takes when the file does not set it.
    pub fn default_value(&self) -> FlagValue {
        match self.kind {
            FieldKind::Toggle { default } => FlagValue::Toggle(default),
            FieldKind::Count { default, .. } => FlagValue::Count(default),
            FieldKind::Choice { default, .. } => FlagValue::Choice(default.to_string()),
        }
    }

    /// Coerce an incoming JSON value into this flag's domain.
    ///
    /// Returns `None` only when the input cannot be interpreted at all
    /// (a non-numeric value for a count); the caller keeps its prior value.
    pub fn coerce(&self, input: &Value) -> Option<FlagValue> {
        match self.kind {
            FieldKind::Toggle { .. } => Some(FlagValue::Toggle(truthy(input))),
            FieldKind::Count { min, max, .. } => {
                numeric(input).map(|n| FlagValue::Count(clamp_truncated(n, min, max)))
            }
            FieldKind::Choice { allowed, .. } => {
                let raw = input.as_str().unwrap_or_default();
                Some(FlagValue::Choice(nearest_choice(raw, allowed).to_string()))
            }
        }
    }

    /// Bring an already-typed value into this flag's domain.
    ///
    /// Used on values parsed from the flags file. A value of the wrong
    /// variant is replaced by the default.
    pub fn normalize(&self, value: FlagValue) -> FlagValue {
        match (self.kind, value) {
            (FieldKind::Toggle { .. }, v @ FlagValue::Toggle(_)) => v,
            (FieldKind::Count { min, max, .. }, FlagValue::Count(n)) => {
                FlagValue::Count(n.clamp(min, max))
            }
            (FieldKind::Choice { allowed, .. }, FlagValue::Choice(s)) => {
                FlagValue::Choice(nearest_choice(&s, allowed).to_string())
            }
            _ => self.default_value(),
        }
    }
}

/// All flags in serialization order.
pub fn schema() -> &'static [FieldSpec] {
    &SCHEMA
}

/// Look up a flag by its key.
pub fn lookup_field(key: &str) -> Option<&'static FieldSpec> {
    SCHEMA.iter().find(|f| f.key == key)
}

/// Accepted operating system ids for `os_type`.
pub const OS_TYPES: &[&str] = &["amazon_linux", "ubuntu"];

/// Upper bound for `instance_count`.
pub const MAX_INSTANCES: i64 = 10;

static SCHEMA: [FieldSpec; 9] = [
    // ==================== Stack toggles ====================
    FieldSpec {
        key: "enable_stack",
        description: "Master switch for the whole stack",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_instances",
        description: "EC2 instances",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_alb",
        description: "Application load balancer",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_dns",
        description: "Route 53 records",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_storage",
        description: "S3 buckets and EBS volumes",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_iam",
        description: "IAM roles and instance profiles",
        kind: FieldKind::Toggle { default: true },
    },
    FieldSpec {
        key: "enable_vpc",
        description: "Dedicated VPC instead of the default one",
        kind: FieldKind::Toggle { default: false },
    },
    // ==================== Sizing ====================
    FieldSpec {
        key: "instance_count",
        description: "Number of EC2 instances (0-10)",
        kind: FieldKind::Count {
            min: 0,
            max: MAX_INSTANCES,
            default: 1,
        },
    },
    FieldSpec {
        key: "os_type",
        description: "Instance operating system: amazon_linux or ubuntu",
        kind: FieldKind::Choice {
            allowed: OS_TYPES,
            default: "amazon_linux",
        },
    },
];

/// JSON truthiness, with the usual spellings of "off" treated as false.
fn truthy(input: &Value) -> bool {
    match input {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "off" | "no" | "0"
        ),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn numeric(input: &Value) -> Option<f64> {
    let n = match input {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn clamp_truncated(n: f64, min: i64, max: i64) -> i64 {
    // `as` saturates for out-of-range floats
    (n.trunc() as i64).clamp(min, max)
}

/// Map free-form input onto one of `allowed`.
///
/// Matching is case-insensitive and treats spaces and hyphens as
/// underscores. Input that names an accepted token anywhere
/// (`"Ubuntu 22.04"`) maps to it; anything else yields `allowed[0]`.
fn nearest_choice(raw: &str, allowed: &'static [&'static str]) -> &'static str {
    let canonical: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();

    allowed
        .iter()
        .find(|a| **a == canonical)
        .or_else(|| allowed.iter().find(|a| canonical.contains(**a)))
        .or_else(|| allowed.first())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_keys_unique() {
        let mut keys: Vec<_> = schema().iter().map(|f| f.key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), schema().len());
    }

    #[test]
    fn test_lookup_existing_key() {
        let field = lookup_field("instance_count").unwrap();
        assert!(matches!(field.kind, FieldKind::Count { max: 10, .. }));
        assert!(lookup_field("enable_nat").is_none());
    }

    #[test]
    fn test_choice_default_is_first_accepted() {
        let field = lookup_field("os_type").unwrap();
        assert_eq!(field.default_value(), FlagValue::from(OS_TYPES[0]));
    }

    #[test]
    fn test_toggle_coercion() {
        let field = lookup_field("enable_vpc").unwrap();
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("yes"), true),
            (json!("false"), false),
            (json!("OFF"), false),
            (json!(""), false),
            (Value::Null, false),
            (json!({}), true),
        ];
        for (input, expected) in cases {
            assert_eq!(
                field.coerce(&input),
                Some(FlagValue::Toggle(expected)),
                "input {input}"
            );
        }
    }

    #[test]
    fn test_count_coercion_clamps_and_truncates() {
        let field = lookup_field("instance_count").unwrap();
        assert_eq!(field.coerce(&json!(15)), Some(FlagValue::Count(10)));
        assert_eq!(field.coerce(&json!(-3)), Some(FlagValue::Count(0)));
        assert_eq!(field.coerce(&json!(4.9)), Some(FlagValue::Count(4)));
        assert_eq!(field.coerce(&json!(" 7 ")), Some(FlagValue::Count(7)));
        assert_eq!(field.coerce(&json!(1e300)), Some(FlagValue::Count(10)));
    }

    #[test]
    fn test_count_coercion_rejects_non_numeric() {
        let field = lookup_field("instance_count").unwrap();
        assert_eq!(field.coerce(&json!("abc")), None);
        assert_eq!(field.coerce(&json!(true)), None);
        assert_eq!(field.coerce(&Value::Null), None);
        assert_eq!(field.coerce(&json!("NaN")), None);
    }

    #[test]
    fn test_choice_coercion() {
        let field = lookup_field("os_type").unwrap();
        let ubuntu = Some(FlagValue::from("ubuntu"));
        let amazon = Some(FlagValue::from("amazon_linux"));

        assert_eq!(field.coerce(&json!("UBUNTU")), ubuntu);
        assert_eq!(field.coerce(&json!("Ubuntu 22.04")), ubuntu);
        assert_eq!(field.coerce(&json!("Amazon Linux")), amazon);
        assert_eq!(field.coerce(&json!("debian")), amazon);
        assert_eq!(field.coerce(&json!(42)), amazon);
    }

    #[test]
    fn test_normalize_file_values() {
        let count = lookup_field("instance_count").unwrap();
        assert_eq!(count.normalize(FlagValue::Count(99)), FlagValue::Count(10));
        assert_eq!(count.normalize(FlagValue::Toggle(true)), FlagValue::Count(1));

        let os = lookup_field("os_type").unwrap();
        assert_eq!(os.normalize(FlagValue::from("centos")), FlagValue::from("amazon_linux"));
    }
}

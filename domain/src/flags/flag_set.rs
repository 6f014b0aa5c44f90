//! FlagSet entity

use super::schema::{FieldSpec, lookup_field, schema};
use super::value::FlagValue;
use crate::core::error::DomainError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A complete assignment of values to every flag in the schema.
///
/// There is no way to build a `FlagSet` with a missing key: it starts from
/// [`FlagSet::defaults`] and every mutation goes through the schema, so
/// counts and choices are always inside their domains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    values: HashMap<&'static str, FlagValue>,
}

impl FlagSet {
    /// Every flag at its schema default.
    pub fn defaults() -> Self {
        Self {
            values: schema()
                .iter()
                .map(|f| (f.key, f.default_value()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.values.get(key)
    }

    /// Set a flag, normalizing the value into the flag's domain.
    pub fn set(&mut self, key: &str, value: FlagValue) -> Result<(), DomainError> {
        let field = lookup_field(key).ok_or_else(|| DomainError::UnknownFlag(key.to_string()))?;
        self.set_field(field, value);
        Ok(())
    }

    /// Set a flag through its schema entry, normalizing the value.
    pub fn set_field(&mut self, field: &'static FieldSpec, value: FlagValue) {
        self.values.insert(field.key, field.normalize(value));
    }

    pub fn with(mut self, key: &str, value: impl Into<FlagValue>) -> Result<Self, DomainError> {
        self.set(key, value.into())?;
        Ok(self)
    }

    pub fn toggle(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FlagValue::as_bool)
    }

    pub fn count(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FlagValue::as_i64)
    }

    pub fn choice(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FlagValue::as_str)
    }

    /// Iterate `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, &FlagValue)> + '_ {
        schema()
            .iter()
            .filter_map(move |f| self.values.get(f.key).map(|v| (f, v)))
    }

    /// Apply a partial update from an untyped JSON object.
    ///
    /// Only schema keys present in `partial` are touched. A count that does
    /// not parse keeps its current value; an unrecognized choice collapses
    /// to the first accepted value. Keys outside the schema are ignored.
    pub fn merge(&self, partial: &Map<String, Value>) -> FlagSet {
        let mut next = self.clone();
        for field in schema() {
            let Some(input) = partial.get(field.key) else {
                continue;
            };
            if let Some(value) = field.coerce(input) {
                next.values.insert(field.key, value);
            }
        }
        next
    }

    /// Keys in `partial` that the schema does not know about.
    pub fn unknown_keys(partial: &Map<String, Value>) -> Vec<&str> {
        partial
            .keys()
            .map(String::as_str)
            .filter(|k| lookup_field(k).is_none())
            .collect()
    }

    /// Keys whose values differ between `self` and `other`, in schema order.
    pub fn changed_keys(&self, other: &FlagSet) -> Vec<&'static str> {
        schema()
            .iter()
            .filter(|f| self.values.get(f.key) != other.values.get(f.key))
            .map(|f| f.key)
            .collect()
    }
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Serialize for FlagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field.key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn partial(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_defaults_cover_every_field() {
        let flags = FlagSet::defaults();
        for field in schema() {
            assert_eq!(flags.get(field.key), Some(&field.default_value()));
        }
        assert_eq!(flags.toggle("enable_vpc"), Some(false));
        assert_eq!(flags.count("instance_count"), Some(1));
        assert_eq!(flags.choice("os_type"), Some("amazon_linux"));
    }

    #[test]
    fn test_merge_single_toggle_changes_only_that_key() {
        let current = FlagSet::defaults();
        let next = current.merge(&partial(json!({"enable_vpc": true})));

        assert_eq!(next.toggle("enable_vpc"), Some(true));
        assert_eq!(current.changed_keys(&next), vec!["enable_vpc"]);
    }

    #[test]
    fn test_merge_clamps_instance_count() {
        let current = FlagSet::defaults();

        let high = current.merge(&partial(json!({"instance_count": 15})));
        assert_eq!(high.count("instance_count"), Some(10));

        let low = current.merge(&partial(json!({"instance_count": -3})));
        assert_eq!(low.count("instance_count"), Some(0));
    }

    #[test]
    fn test_merge_non_numeric_count_keeps_prior() {
        let current = FlagSet::defaults().with("instance_count", 4_i64).unwrap();
        let next = current.merge(&partial(json!({"instance_count": "abc"})));
        assert_eq!(next.count("instance_count"), Some(4));
    }

    #[test]
    fn test_merge_unrecognized_os_collapses_to_first_accepted() {
        let current = FlagSet::defaults().with("os_type", "ubuntu").unwrap();
        let next = current.merge(&partial(json!({"os_type": "debian"})));
        assert_eq!(next.choice("os_type"), Some("amazon_linux"));
    }

    #[test]
    fn test_merge_ignores_unknown_keys() {
        let current = FlagSet::defaults();
        let input = partial(json!({"enable_nat": true, "enable_dns": false}));
        let next = current.merge(&input);

        assert_eq!(current.changed_keys(&next), vec!["enable_dns"]);
        assert_eq!(FlagSet::unknown_keys(&input), vec!["enable_nat"]);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut flags = FlagSet::defaults();
        let err = flags.set("enable_nat", FlagValue::Toggle(true)).unwrap_err();
        assert!(matches!(err, DomainError::UnknownFlag(ref k) if k == "enable_nat"));
    }

    #[test]
    fn test_set_field_normalizes_through_schema_entry() {
        let mut flags = FlagSet::defaults();
        let field = lookup_field("instance_count").unwrap();

        flags.set_field(field, FlagValue::Count(-5));

        assert_eq!(flags.count("instance_count"), Some(0));
    }

    #[test]
    fn test_set_normalizes() {
        let flags = FlagSet::defaults().with("instance_count", 42_i64).unwrap();
        assert_eq!(flags.count("instance_count"), Some(10));
    }

    #[test]
    fn test_serialize_flat_object_in_schema_order() {
        let json = serde_json::to_string(&FlagSet::defaults()).unwrap();
        assert!(json.starts_with("{\"enable_stack\":true,"));
        assert!(json.ends_with("\"instance_count\":1,\"os_type\":\"amazon_linux\"}"));
    }
}

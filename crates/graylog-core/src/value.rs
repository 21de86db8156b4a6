//! Loosely-typed configuration values.
//!
//! Callers declare extra configuration (input settings, notification and
//! event processor config) as strings. Before a value is sent to Graylog it is
//! coerced into the narrowest type it cleanly parses as:
//!
//! - `"true"` / `"false"` become booleans
//! - anything that parses as a signed 64-bit integer becomes an integer
//! - everything else stays a string
//!
//! Coercion is idempotent: rendering a coerced value back to its declared
//! string form and coercing again yields the same value.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A coerced configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

/// Declared configuration as supplied by the caller, in declaration order.
pub type DeclaredConfig = IndexMap<String, String>;

/// Coerced configuration, keyed in declaration order.
pub type ConfigMap = IndexMap<String, ConfigValue>;

impl ConfigValue {
    /// Coerce a declared string into its typed form.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => match raw.parse::<i64>() {
                Ok(n) => Self::Int(n),
                Err(_) => Self::String(raw.to_string()),
            },
        }
    }

    /// Convert a value observed on the remote record.
    ///
    /// Scalars keep their type. Floats, lists and nested objects have no
    /// typed counterpart and are carried as their JSON text.
    pub fn from_remote(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::String(s) => Self::String(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::String(n.to_string()),
            },
            Value::Null => Self::String(String::new()),
            other => Self::String(other.to_string()),
        }
    }

    /// The declared string form of this value.
    pub fn to_declared(&self) -> String {
        self.to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<ConfigValue> for Value {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Bool(b) => Value::Bool(b),
            ConfigValue::Int(i) => Value::from(i),
            ConfigValue::String(s) => Value::String(s),
        }
    }
}

/// Coerce every declared value, preserving declaration order.
pub fn coerce_all(declared: &DeclaredConfig) -> ConfigMap {
    declared
        .iter()
        .map(|(key, raw)| (key.clone(), ConfigValue::coerce(raw)))
        .collect()
}

/// Coerce declared values straight into a JSON object for a request body.
pub fn coerce_to_json(declared: &DeclaredConfig) -> Map<String, Value> {
    declared
        .iter()
        .map(|(key, raw)| (key.clone(), Value::from(ConfigValue::coerce(raw))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(ConfigValue::coerce("42"), ConfigValue::Int(42));
        assert_eq!(ConfigValue::coerce("-7"), ConfigValue::Int(-7));
        assert_eq!(ConfigValue::coerce("514"), ConfigValue::Int(514));
    }

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(ConfigValue::coerce("true"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::coerce("false"), ConfigValue::Bool(false));
        // Only the exact lowercase spellings are booleans
        assert_eq!(
            ConfigValue::coerce("True"),
            ConfigValue::String("True".to_string())
        );
    }

    #[test]
    fn test_coerce_leaves_other_strings() {
        assert_eq!(
            ConfigValue::coerce("0.0.0.0"),
            ConfigValue::String("0.0.0.0".to_string())
        );
        assert_eq!(ConfigValue::coerce("1.5"), ConfigValue::String("1.5".to_string()));
        assert_eq!(ConfigValue::coerce(""), ConfigValue::String(String::new()));
        assert_eq!(
            ConfigValue::coerce("99999999999999999999"),
            ConfigValue::String("99999999999999999999".to_string())
        );
    }

    #[test]
    fn test_coercion_is_idempotent() {
        for raw in ["42", "+42", "042", "true", "false", "syslog", "", "-0", "1e3"] {
            let once = ConfigValue::coerce(raw);
            let twice = ConfigValue::coerce(&once.to_declared());
            assert_eq!(once, twice, "coercion of {raw:?} is not stable");
        }
    }

    #[test]
    fn test_serializes_untagged() {
        let map = coerce_all(&DeclaredConfig::from([
            ("port".to_string(), "514".to_string()),
            ("tls".to_string(), "false".to_string()),
            ("bind_address".to_string(), "0.0.0.0".to_string()),
        ]));
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            json!({"port": 514, "tls": false, "bind_address": "0.0.0.0"})
        );
    }

    #[test]
    fn test_from_remote() {
        assert_eq!(ConfigValue::from_remote(&json!(514)), ConfigValue::Int(514));
        assert_eq!(ConfigValue::from_remote(&json!(true)), ConfigValue::Bool(true));
        assert_eq!(
            ConfigValue::from_remote(&json!("x")),
            ConfigValue::String("x".to_string())
        );
        assert_eq!(
            ConfigValue::from_remote(&json!(["a", "b"])),
            ConfigValue::String("[\"a\",\"b\"]".to_string())
        );
    }

    #[test]
    fn test_coerce_to_json_coerces_each_value() {
        let declared = DeclaredConfig::from([
            ("b".to_string(), "1".to_string()),
            ("a".to_string(), "two".to_string()),
        ]);
        let map = coerce_to_json(&declared);
        assert_eq!(map.get("b"), Some(&json!(1)));
        assert_eq!(map.get("a"), Some(&json!("two")));
    }
}

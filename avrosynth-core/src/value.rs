//! Dynamically typed datum values.
//!
//! A [`Value`] is what the synthesizer produces and what the validator and
//! encoder consume. Records and maps are both represented as an
//! insertion-ordered [`IndexMap`] keyed by field name or map key.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// A datum that may or may not conform to some schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Any integer; `int` range checks happen in the validator.
    Long(i64),
    /// Any floating point number.
    Double(f64),
    /// UTF-8 text.
    String(String),
    /// Raw bytes (`bytes` and `fixed`).
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<Value>),
    /// Ordered mapping (records and maps).
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Returns a short name for the dynamic type, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Long(_) => "integer",
            Self::Double(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer payload, if this is an integer.
    #[must_use]
    pub const fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns any numeric payload widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Long(v) => Some(*v as f64),
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the payload as bytes.
    ///
    /// Raw bytes are returned as-is. A string is accepted when every code
    /// point is at most `0xFF`, which is how the Avro JSON encoding spells
    /// `bytes` and `fixed` values.
    #[must_use]
    pub fn as_byte_slice(&self) -> Option<Cow<'_, [u8]>> {
        match self {
            Self::Bytes(b) => Some(Cow::Borrowed(b)),
            Self::String(s) => s
                .chars()
                .map(|c| u8::try_from(u32::from(c)).ok())
                .collect::<Option<Vec<u8>>>()
                .map(Cow::Owned),
            _ => None,
        }
    }

    /// Compares two datums as the binary encoding sees them.
    ///
    /// Unlike `==`, a latin-1 string equals the bytes it spells, and an absent
    /// mapping entry equals an explicit `null`. Integers and doubles never
    /// compare equal to each other.
    #[must_use]
    pub fn same_datum(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(_), Self::Bytes(_)) | (Self::Bytes(_), Self::String(_)) => {
                self.as_byte_slice() == other.as_byte_slice()
            }
            (Self::Array(left), Self::Array(right)) => {
                left.len() == right.len() && left.iter().zip(right).all(|(l, r)| l.same_datum(r))
            }
            (Self::Map(left), Self::Map(right)) => {
                left.iter().all(|(key, l)| match right.get(key) {
                    Some(r) => l.same_datum(r),
                    None => l.is_null(),
                }) && right
                    .iter()
                    .filter(|(key, _)| !left.contains_key(*key))
                    .all(|(_, r)| r.is_null())
            }
            _ => self == other,
        }
    }

    /// Converts a JSON tree into a value.
    ///
    /// Integers that do not fit in an `i64` become doubles.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Long(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => {
                Self::Array(items.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts the value into its JSON form.
    ///
    /// Bytes are rendered as a string of code points `0x00..=0xFF`; doubles
    /// that are not finite become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Long(v) => serde_json::Value::from(*v),
            Self::Double(v) => serde_json::Number::from_f64(*v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Bytes(b) => serde_json::Value::String(b.iter().map(|&c| char::from(c)).collect()),
            Self::Array(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Long(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_preserves_order() {
        let value = Value::from_json(&json!({"z": 1, "a": [true, null], "m": 1.5}));
        let Value::Map(entries) = value else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(entries["z"], Value::Long(1));
        assert_eq!(entries["a"], Value::Array(vec![Value::Boolean(true), Value::Null]));
        assert_eq!(entries["m"], Value::Double(1.5));
    }

    #[test]
    fn test_large_unsigned_becomes_double() {
        let value = Value::from_json(&json!(u64::MAX));
        assert!(matches!(value, Value::Double(_)));
    }

    #[test]
    fn test_bytes_json_form() {
        let value = Value::Bytes(vec![0x00, 0x41, 0xFF]);
        let json = value.to_json();
        assert_eq!(json, json!("\u{0}A\u{ff}"));
        let back = Value::from_json(&json);
        assert_eq!(
            back.as_byte_slice().expect("latin-1 string").as_ref(),
            &[0x00, 0x41, 0xFF]
        );
    }

    #[test]
    fn test_wide_string_is_not_bytes() {
        assert!(Value::from("\u{263A}").as_byte_slice().is_none());
        assert!(Value::Long(1).as_byte_slice().is_none());
    }

    #[test]
    fn test_same_datum() {
        assert!(Value::from("ab").same_datum(&Value::Bytes(b"ab".to_vec())));
        assert!(!Value::from("\u{263A}").same_datum(&Value::Bytes(Vec::new())));
        assert!(!Value::Long(0).same_datum(&Value::Double(0.0)));
        assert!(Value::Double(0.5).same_datum(&Value::Double(0.5)));

        let record = Value::from_json(&json!({"id": 1, "note": null}));
        assert!(record.same_datum(&Value::from_json(&json!({"id": 1}))));
        assert!(Value::from_json(&json!({"id": 1})).same_datum(&record));
        assert!(!record.same_datum(&Value::from_json(&json!({"id": 1.0}))));
        assert!(
            Value::from_json(&json!([[1], "x"]))
                .same_datum(&Value::Array(vec![Value::from_json(&json!([1])), Value::Bytes(vec![b'x'])]))
        );
    }

    #[test]
    fn test_display_is_compact_json() {
        let mut entries = IndexMap::new();
        entries.insert("next".to_string(), Value::Null);
        assert_eq!(Value::Map(entries).to_string(), r#"{"next":null}"#);
    }
}

//! Runtime values produced by resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dynamically-typed value held in a context or produced from a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Bool(bool),
    SignedInt(i64),
    UnsignedInt(u64),
    Float(f64),
    String(String),
    Byte(u8),
    Nil,
    /// Structured data (arrays, objects) that only supports equality.
    Opaque(serde_json::Value),
}

/// The concrete kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    SignedInt,
    UnsignedInt,
    Float,
    String,
    Byte,
    Nil,
    Opaque,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::SignedInt => "i64",
            ValueKind::UnsignedInt => "u64",
            ValueKind::Float => "f64",
            ValueKind::String => "string",
            ValueKind::Byte => "byte",
            ValueKind::Nil => "nil",
            ValueKind::Opaque => "opaque",
        }
    }

    /// Comparability family of this kind.
    pub fn family(&self) -> Family {
        match self {
            ValueKind::SignedInt => Family::Signed,
            ValueKind::UnsignedInt | ValueKind::Byte => Family::Unsigned,
            ValueKind::Float => Family::Float,
            ValueKind::String => Family::String,
            other => Family::Other(*other),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping of kinds within which relational operators are defined.
///
/// Kinds outside the numeric and string families each form their own
/// family, so two `Other` families only match on identical kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Signed,
    Unsigned,
    Float,
    String,
    Other(ValueKind),
}

impl Family {
    /// Returns true if values of this family support `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Family::Other(_))
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::SignedInt(_) => ValueKind::SignedInt,
            Value::UnsignedInt(_) => ValueKind::UnsignedInt,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Byte(_) => ValueKind::Byte,
            Value::Nil => ValueKind::Nil,
            Value::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn family(&self) -> Family {
        self.kind().family()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::SignedInt(n) => write!(f, "{}", n),
            Value::UnsignedInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Byte(b) => write!(f, "{:?}", char::from(*b)),
            Value::Nil => f.write_str("nil"),
            Value::Opaque(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty; $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(n: $source) -> Self {
                    Value::$variant(n as $target)
                }
            }
        )*
    };
}

impl_from_int!(SignedInt, i64; i8, i16, i32, i64, isize);
impl_from_int!(UnsignedInt, u64; u16, u32, u64, usize);

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Byte(b)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::SignedInt(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UnsignedInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            other => Value::Opaque(other),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::SignedInt(n) => serde_json::json!(n),
            Value::UnsignedInt(n) => serde_json::json!(n),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Byte(b) => serde_json::json!(b),
            Value::Nil => serde_json::Value::Null,
            Value::Opaque(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::from(200), ValueKind::SignedInt, Family::Signed)]
    #[case(Value::from(200u32), ValueKind::UnsignedInt, Family::Unsigned)]
    #[case(Value::from(b'a'), ValueKind::Byte, Family::Unsigned)]
    #[case(Value::from(42.314), ValueKind::Float, Family::Float)]
    #[case(Value::from("admin"), ValueKind::String, Family::String)]
    #[case(Value::from(true), ValueKind::Bool, Family::Other(ValueKind::Bool))]
    #[case(Value::from(None::<i32>), ValueKind::Nil, Family::Other(ValueKind::Nil))]
    fn test_kind_and_family(#[case] value: Value, #[case] kind: ValueKind, #[case] family: Family) {
        assert_eq!(value.kind(), kind);
        assert_eq!(value.family(), family);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(serde_json::json!(null)), Value::Nil);
        assert_eq!(Value::from(serde_json::json!(-3)), Value::SignedInt(-3));
        assert_eq!(Value::from(serde_json::json!(u64::MAX)), Value::UnsignedInt(u64::MAX));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(
            Value::from(serde_json::json!(["a", "b"])),
            Value::Opaque(serde_json::json!(["a", "b"]))
        );
    }

    #[test]
    fn test_deserialize_through_json_mapping() {
        let value: Value = serde_json::from_str(r#"{"groups": ["dev"]}"#).unwrap();
        assert_eq!(value.kind(), ValueKind::Opaque);

        let value: Value = serde_yaml::from_str("200").unwrap();
        assert_eq!(value, Value::SignedInt(200));
    }

    #[test]
    fn test_ordered_families() {
        assert!(Family::Signed.is_ordered());
        assert!(Family::String.is_ordered());
        assert!(!Family::Other(ValueKind::Nil).is_ordered());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("admin").to_string(), "\"admin\"");
        assert_eq!(Value::Byte(b'a').to_string(), "'a'");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}

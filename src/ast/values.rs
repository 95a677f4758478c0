use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A CQL value, either bound as a statement parameter or inlined as a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Blob(Vec<u8>),
    List(Vec<Value>),
    Set(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Tuple(Vec<Value>),
    /// Components of a `token(...)` call; each one binds as its own parameter.
    Token(Vec<Value>),
    /// Named fields of a user-defined type, also used for captured host records.
    Udt(Vec<(String, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Integer payload of `Int` and `BigInt` values.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n as i64),
            Value::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Elements of an iterable value, in iteration order.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) | Value::Set(items) | Value::Tuple(items) => Some(items.clone()),
            Value::Map(entries) => Some(entries.iter().map(|(k, _)| k.clone()).collect()),
            _ => None,
        }
    }

    /// Field of a `Udt` value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Udt(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Uuid(_) => "uuid",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Token(_) => "token",
            Value::Udt(_) => "udt",
        }
    }

    /// Encode this value as an inline CQL literal.
    pub fn to_cql_literal(&self) -> String {
        self.to_string()
    }
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    open: &str,
    items: &[Value],
    close: &str,
) -> std::fmt::Result {
    write!(f, "{}", open)?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    write!(f, "{}", close)
}

/// CQL spelling of a non-finite float.
fn non_finite(n: f64) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("Infinity")
    } else if n == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::Float(n) => match non_finite(f64::from(*n)) {
                Some(text) => write!(f, "{}", text),
                None => write!(f, "{}", n),
            },
            Value::Double(n) => match non_finite(*n) {
                Some(text) => write!(f, "{}", text),
                None => write!(f, "{}", n),
            },
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Uuid(u) => write!(f, "{}", u),
            Value::Timestamp(ts) => write!(f, "{}", ts.timestamp_millis()),
            Value::Blob(bytes) => {
                write!(f, "0x")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            Value::List(items) => write_joined(f, "[", items, "]"),
            Value::Set(items) => write_joined(f, "{", items, "}"),
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Tuple(items) => write_joined(f, "(", items, ")"),
            Value::Token(items) => write_joined(f, "token(", items, ")"),
            Value::Udt(fields) => {
                write!(f, "{{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::BigInt(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_float_literals() {
        assert_eq!(Value::Double(f64::INFINITY).to_cql_literal(), "Infinity");
        assert_eq!(Value::Double(f64::NEG_INFINITY).to_cql_literal(), "-Infinity");
        assert_eq!(Value::Float(f32::NAN).to_cql_literal(), "NaN");
        assert_eq!(Value::Double(2.5).to_cql_literal(), "2.5");
    }

    #[test]
    fn test_text_literal_doubles_quotes() {
        assert_eq!(Value::from("it's").to_cql_literal(), "'it''s'");
    }

    #[test]
    fn test_collection_literals() {
        let list = Value::from(vec![1, 2, 3]);
        assert_eq!(list.to_string(), "[1, 2, 3]");

        let set = Value::Set(vec!["a".into(), "b".into()]);
        assert_eq!(set.to_string(), "{'a', 'b'}");

        let map = Value::Map(vec![("k".into(), Value::BigInt(7))]);
        assert_eq!(map.to_string(), "{'k': 7}");
    }

    #[test]
    fn test_blob_and_timestamp_literals() {
        assert_eq!(Value::Blob(vec![0xde, 0xad]).to_string(), "0xdead");

        let ts = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(Value::from(ts).to_string(), "1700000000123");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(4i64)), Value::BigInt(4));
    }

    #[test]
    fn test_elements_of_map_are_keys() {
        let map = Value::Map(vec![(1.into(), "a".into()), (2.into(), "b".into())]);
        assert_eq!(map.elements(), Some(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(Value::Int(1).elements(), None);
    }
}

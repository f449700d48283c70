//! Owned bind values.
//!
//! Clause builders hand their parameters back to the caller, and the caller
//! (tests included) needs to compare and print them. `SqlValue` is a small
//! closed set of scalars that also encodes itself as a Postgres parameter.

use crate::error::{JoblyError, JoblyResult};
use bytes::BytesMut;
use rust_decimal::Decimal;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A scalar value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Numeric(Decimal),
    Text(String),
}

impl SqlValue {
    /// Convert a JSON scalar. Arrays and objects are rejected.
    pub fn from_json(value: serde_json::Value) -> JoblyResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .ok_or_else(|| JoblyError::bad_request(format!("Unsupported number: {n}"))),
            },
            Value::String(s) => Ok(Self::Text(s)),
            other => Err(JoblyError::bad_request(format!(
                "Expected a scalar value, got {other}"
            ))),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Numeric(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Numeric(d) => serializer.serialize_str(&d.to_string()),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        // Integers and text are narrowed/parsed to whatever the column expects,
        // so a JSON payload can target INT4 and NUMERIC columns alike.
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) => b.to_sql_checked(ty, out),
            Self::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::NUMERIC => Decimal::from(*i).to_sql(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Self::Float(x) => match *ty {
                Type::FLOAT4 => (*x as f32).to_sql(ty, out),
                Type::NUMERIC => Decimal::try_from(*x)?.to_sql(ty, out),
                _ => x.to_sql_checked(ty, out),
            },
            Self::Numeric(d) => d.to_sql_checked(ty, out),
            Self::Text(s) => match *ty {
                Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql(ty, out),
                _ => s.to_sql_checked(ty, out),
            },
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        Self::Numeric(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_convert() {
        assert_eq!(SqlValue::from_json(json!(null)).unwrap(), SqlValue::Null);
        assert_eq!(SqlValue::from_json(json!(true)).unwrap(), SqlValue::Bool(true));
        assert_eq!(SqlValue::from_json(json!(42)).unwrap(), SqlValue::Int(42));
        assert_eq!(SqlValue::from_json(json!(0.5)).unwrap(), SqlValue::Float(0.5));
        assert_eq!(
            SqlValue::from_json(json!("River")).unwrap(),
            SqlValue::Text("River".into())
        );
    }

    #[test]
    fn json_containers_are_rejected() {
        assert!(SqlValue::from_json(json!([1, 2])).unwrap_err().is_bad_request());
        assert!(SqlValue::from_json(json!({"a": 1})).unwrap_err().is_bad_request());
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("x")), SqlValue::Text("x".into()));
    }

    #[test]
    fn int_narrows_to_int4() {
        let mut buf = BytesMut::new();
        SqlValue::Int(7).to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        assert!(
            SqlValue::Int(i64::MAX)
                .to_sql_checked(&Type::INT4, &mut buf)
                .is_err()
        );
    }

    #[test]
    fn null_encodes_as_sql_null() {
        let mut buf = BytesMut::new();
        let is_null = SqlValue::Null.to_sql_checked(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
    }

    #[test]
    fn serializes_as_plain_json() {
        let values = vec![SqlValue::Text("%at%".into()), SqlValue::Int(10), SqlValue::Null];
        assert_eq!(serde_json::to_value(&values).unwrap(), json!(["%at%", 10, null]));
    }
}

//! Attribute values for nodes, edges, and table cells.

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// `Real(NaN)` is the padding placeholder for attributes absent from a
/// row; `Text("")` is a present-but-empty value. The two are distinct:
/// padding marks "this row never had the attribute", the empty string
/// marks "the attribute was declared with no content".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttrValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl AttrValue {
    /// The not-a-number padding placeholder.
    pub fn nan() -> Self {
        AttrValue::Real(f64::NAN)
    }

    /// Create a text value.
    pub fn text(s: impl Into<String>) -> Self {
        AttrValue::Text(s.into())
    }

    /// Create an integer value.
    pub fn integer(i: i64) -> Self {
        AttrValue::Integer(i)
    }

    /// Create a real value.
    pub fn real(r: f64) -> Self {
        AttrValue::Real(r)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// True for the padding placeholder.
    pub fn is_nan(&self) -> bool {
        matches!(self, AttrValue::Real(r) if r.is_nan())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            AttrValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Node identifier form of this value, if it has one. `Null` and the
    /// padding placeholder carry no identifier.
    pub(crate) fn to_id_string(&self) -> Option<String> {
        match self {
            AttrValue::Text(s) => Some(s.clone()),
            AttrValue::Integer(i) => Some(i.to_string()),
            AttrValue::Real(r) if !r.is_nan() => Some(r.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Null => write!(f, ""),
            AttrValue::Integer(i) => write!(f, "{}", i),
            AttrValue::Real(r) => write!(f, "{}", r),
            AttrValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Integer(i)
    }
}

impl From<f64> for AttrValue {
    fn from(r: f64) -> Self {
        AttrValue::Real(r)
    }
}

impl ToSql for AttrValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            AttrValue::Null => Value::Null,
            AttrValue::Integer(i) => Value::Integer(*i),
            // SQLite has no NaN; absent-attribute padding lands as NULL
            AttrValue::Real(r) if r.is_nan() => Value::Null,
            AttrValue::Real(r) => Value::Real(*r),
            AttrValue::Text(s) => Value::Text(s.clone()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

impl FromSql for AttrValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(AttrValue::Null),
            ValueRef::Integer(i) => Ok(AttrValue::Integer(i)),
            ValueRef::Real(r) => Ok(AttrValue::Real(r)),
            ValueRef::Text(t) => Ok(AttrValue::Text(String::from_utf8_lossy(t).into_owned())),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

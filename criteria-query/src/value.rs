//! Typed field values
//!
//! Entities expose their stored fields as [`Value`]s, criteria carry their
//! filter values as [`Value`]s and predicates compare the two. Every field is
//! declared with a [`ValueKind`], which is what criteria values are coerced to
//! before comparison.
//!
//! # Example
//!
//! ```rust
//! use criteria_query::value::{Value, ValueKind};
//!
//! let value: Value = 42_i64.into();
//! assert_eq!(value.kind(), Some(ValueKind::Integer));
//!
//! // Integers widen to decimals, but text never becomes a number
//! assert!(value.coerce(ValueKind::Decimal).is_some());
//! assert!(Value::from("42").coerce(ValueKind::Integer).is_none());
//! ```

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declared type of an entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// `true` / `false`
    Boolean,
    /// Signed 64-bit integer
    Integer,
    /// Fixed-point decimal
    Decimal,
    /// Free text
    Text,
    /// UTC timestamp
    Timestamp,
    /// Unique value with a canonical empty (nil) representative
    Uuid,
}

impl ValueKind {
    const fn rank(self) -> u8 {
        match self {
            Self::Boolean => 0,
            Self::Integer | Self::Decimal => 1,
            Self::Text => 2,
            Self::Timestamp => 3,
            Self::Uuid => 4,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Integer => write!(f, "integer"),
            Self::Decimal => write!(f, "decimal"),
            Self::Text => write!(f, "text"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Uuid => write!(f, "uuid"),
        }
    }
}

/// A stored or requested field value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Decimal value
    Decimal(Decimal),
    /// Text value
    Text(String),
    /// Timestamp value
    Timestamp(DateTime<Utc>),
    /// UUID value
    Uuid(Uuid),
}

impl Value {
    /// Kind of this value, `None` for [`Value::Null`]
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Boolean(_) => Some(ValueKind::Boolean),
            Self::Integer(_) => Some(ValueKind::Integer),
            Self::Decimal(_) => Some(ValueKind::Decimal),
            Self::Text(_) => Some(ValueKind::Text),
            Self::Timestamp(_) => Some(ValueKind::Timestamp),
            Self::Uuid(_) => Some(ValueKind::Uuid),
        }
    }

    /// Whether this is [`Value::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The zero/empty representative of a kind
    ///
    /// For [`ValueKind::Uuid`] this is the nil UUID, which equality filters
    /// treat as equivalent to a stored null.
    ///
    /// # Example
    ///
    /// ```rust
    /// use criteria_query::value::{Value, ValueKind};
    ///
    /// assert_eq!(Value::canonical_empty(ValueKind::Uuid), Value::Uuid(uuid::Uuid::nil()));
    /// assert_eq!(Value::canonical_empty(ValueKind::Integer), Value::Integer(0));
    /// ```
    #[must_use]
    pub fn canonical_empty(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Boolean => Self::Boolean(false),
            ValueKind::Integer => Self::Integer(0),
            ValueKind::Decimal => Self::Decimal(Decimal::ZERO),
            ValueKind::Text => Self::Text(String::new()),
            ValueKind::Timestamp => Self::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
            ValueKind::Uuid => Self::Uuid(Uuid::nil()),
        }
    }

    /// Convert this value to the given kind
    ///
    /// Returns `None` when no conversion exists. [`Value::Null`] converts to
    /// any kind and stays null.
    #[must_use]
    pub fn coerce(&self, kind: ValueKind) -> Option<Self> {
        match (self, kind) {
            (Self::Null, _) => Some(Self::Null),
            (value, kind) if value.kind() == Some(kind) => Some(value.clone()),
            (Self::Integer(n), ValueKind::Decimal) => Some(Self::Decimal(Decimal::from(*n))),
            (Self::Decimal(d), ValueKind::Integer) if d.fract().is_zero() => {
                d.to_i64().map(Self::Integer)
            }
            (Self::Text(s), ValueKind::Uuid) => Uuid::parse_str(s).ok().map(Self::Uuid),
            (Self::Text(s), ValueKind::Timestamp) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| Self::Timestamp(ts.with_timezone(&Utc))),
            (value, ValueKind::Text) => value.to_text().map(Self::Text),
            _ => None,
        }
    }

    /// Textual rendering used by substring filters, `None` for null
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Boolean(b) => Some(b.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Decimal(d) => Some(d.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(ts.to_rfc3339()),
            Self::Uuid(id) => Some(id.to_string()),
        }
    }

    /// Numeric view of integer and decimal values
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Integer(n) => Some(Decimal::from(*n)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Total ordering used when sorting rows
    ///
    /// Nulls sort first, integers and decimals compare numerically and
    /// values of unrelated kinds fall back to a fixed kind rank.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::cmp::Ordering;
    /// use criteria_query::value::Value;
    ///
    /// assert_eq!(Value::Null.total_cmp(&Value::Integer(-5)), Ordering::Less);
    /// assert_eq!(Value::Integer(2).total_cmp(&Value::Integer(10)), Ordering::Less);
    /// ```
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Boolean(a), Self::Boolean(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.cmp(b),
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => rank(a).cmp(&rank(b)),
            },
        }
    }
}

fn rank(value: &Value) -> u8 {
    value.kind().map_or(0, ValueKind::rank)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
            Self::Uuid(id) => write!(f, "'{id}'"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Self::Uuid(id)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

//! Field predicates
//!
//! A [`Predicate`] is a single constraint on one stored field. Queryables
//! receive predicates one at a time through [`Queryable::filter`] and keep
//! the conjunction of everything they were given.
//!
//! Storage collaborators translate predicates into their own query language;
//! [`Predicate::evaluate`] is the reference semantics they must match.
//!
//! [`Queryable::filter`]: super::Queryable::filter
//!
//! # Example
//!
//! ```rust
//! use criteria_query::query::Predicate;
//!
//! let filter = Predicate::contains("last_name", "Mil");
//! assert_eq!(filter.to_string(), "last_name LIKE '%Mil%'");
//!
//! let filter = Predicate::is_null("created_at");
//! assert_eq!(filter.to_string(), "created_at IS NULL");
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::entity::Record;
use crate::value::Value;

use super::error::{QueryError, QueryResult};

/// Comparison performed by a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOperator {
    /// Stored value equals the operand
    Equal,
    /// Stored value, with null read as the canonical empty value, equals the operand
    EqualOrEmpty,
    /// Stored value rendered as text contains the operand
    Contains,
    /// Stored value is at least the operand; a null stored value is an error
    GreaterThanOrEqual,
    /// Stored value is at most the operand; a null stored value is an error
    LessThanOrEqual,
    /// Stored value is null
    IsNull,
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal | Self::EqualOrEmpty => write!(f, "="),
            Self::Contains => write!(f, "LIKE"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::IsNull => write!(f, "IS NULL"),
        }
    }
}

/// A single constraint on a stored field
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Stored field name
    pub field: String,
    /// The comparison operator
    pub operator: PredicateOperator,
    /// The operand
    pub value: Value,
}

impl Predicate {
    /// Create a predicate from its parts
    pub fn new(field: impl Into<String>, operator: PredicateOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Equality (`field = value`)
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::Equal,
            value: value.into(),
        }
    }

    /// Equality where a null on either side reads as the canonical empty value
    ///
    /// ```rust
    /// use criteria_query::query::Predicate;
    ///
    /// let filter = Predicate::eq_or_empty("parent", uuid::Uuid::nil());
    /// assert_eq!(
    ///     filter.to_string(),
    ///     "COALESCE(parent, '00000000-0000-0000-0000-000000000000') = '00000000-0000-0000-0000-000000000000'"
    /// );
    /// ```
    pub fn eq_or_empty(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::EqualOrEmpty,
            value: value.into(),
        }
    }

    /// Substring match against the stored value rendered as text
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::Contains,
            value: Value::Text(needle.into()),
        }
    }

    /// Lower bound (`field >= value`)
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::GreaterThanOrEqual,
            value: value.into(),
        }
    }

    /// Upper bound (`field <= value`)
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::LessThanOrEqual,
            value: value.into(),
        }
    }

    /// Null test (`field IS NULL`)
    pub fn is_null(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: PredicateOperator::IsNull,
            value: Value::Null,
        }
    }

    /// Evaluate this predicate against a row
    ///
    /// Range operators fail with a null-comparison error when the stored
    /// value is null, the same way a non-nullable comparison fails in storage.
    pub fn evaluate<R: Record>(&self, record: &R) -> QueryResult<bool> {
        let stored = record.value(&self.field);
        match self.operator {
            PredicateOperator::Equal => Ok(stored == self.value),
            PredicateOperator::EqualOrEmpty => {
                let empty = self.empty_value();
                let lhs = if stored.is_null() { empty.clone() } else { stored };
                let rhs = if self.value.is_null() {
                    empty
                } else {
                    self.value.clone()
                };
                Ok(lhs == rhs)
            }
            PredicateOperator::Contains => Ok(match (stored.to_text(), &self.value) {
                (Some(haystack), Value::Text(needle)) => haystack.contains(needle.as_str()),
                _ => false,
            }),
            PredicateOperator::GreaterThanOrEqual => {
                Ok(self.compare(&stored)? != Ordering::Less)
            }
            PredicateOperator::LessThanOrEqual => {
                Ok(self.compare(&stored)? != Ordering::Greater)
            }
            PredicateOperator::IsNull => Ok(stored.is_null()),
        }
    }

    fn compare(&self, stored: &Value) -> QueryResult<Ordering> {
        if stored.is_null() {
            return Err(QueryError::null_comparison(&self.field));
        }
        Ok(stored.total_cmp(&self.value))
    }

    fn empty_value(&self) -> Value {
        self.value.kind().map_or(Value::Null, Value::canonical_empty)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            PredicateOperator::EqualOrEmpty => write!(
                f,
                "COALESCE({}, {}) {} {}",
                self.field,
                self.empty_value(),
                self.operator,
                self.value
            ),
            PredicateOperator::Contains => {
                let needle = self.value.to_text().unwrap_or_default();
                write!(
                    f,
                    "{} {} {}",
                    self.field,
                    self.operator,
                    Value::Text(format!("%{needle}%"))
                )
            }
            PredicateOperator::IsNull => write!(f, "{} {}", self.field, self.operator),
            _ => write!(f, "{} {} {}", self.field, self.operator, self.value),
        }
    }
}

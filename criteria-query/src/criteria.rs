//! Criteria descriptors
//!
//! A criteria type lists its filterable fields as [`CriteriaField`]s. Each
//! field is tagged with a [`FieldSpec`] once, where it is declared, so the
//! predicate compiler never has to inspect types at runtime.
//!
//! Absent values never produce a filter. Range fields are the exception: a
//! present range with neither bound set (see [`DateRange::null`]) asks for
//! rows whose stored value is null.
//!
//! # Example
//!
//! ```rust,ignore
//! use criteria_query::criteria::{Criteria, CriteriaField, DateRange};
//!
//! #[derive(Default)]
//! struct PersonCriteria {
//!     last_name: Option<String>,
//!     created_at: Option<DateRange>,
//!     is_anarchist: Option<bool>,
//! }
//!
//! impl Criteria<Person> for PersonCriteria {
//!     fn fields(&self) -> Vec<CriteriaField> {
//!         vec![
//!             CriteriaField::text("last_name", self.last_name.clone()),
//!             CriteriaField::date_range("created_at", self.created_at),
//!             CriteriaField::scalar("is_anarchist", self.is_anarchist),
//!         ]
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::paging::PageParameters;
use crate::value::Value;

/// An optional pair of timestamp bounds, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Range with the given bounds
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Range that matches only null stored values
    #[must_use]
    pub const fn null() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether both bounds are absent
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// An optional pair of decimal bounds, both inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecimalRange {
    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Decimal>,
    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Decimal>,
}

impl DecimalRange {
    /// Range with the given bounds
    #[must_use]
    pub const fn new(start: Option<Decimal>, end: Option<Decimal>) -> Self {
        Self { start, end }
    }

    /// Range that matches only null stored values
    #[must_use]
    pub const fn null() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether both bounds are absent
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// How a criteria field filters, together with its current value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    /// Exact match after coercion to the entity field's type
    Scalar(Option<Value>),
    /// Substring match against the entity field rendered as text
    Text(Option<String>),
    /// Inclusive timestamp range
    DateRange(Option<DateRange>),
    /// Inclusive decimal range
    DecimalRange(Option<DecimalRange>),
    /// Never participates in filtering
    Excluded,
}

impl FieldSpec {
    /// Whether this field contributes a predicate
    ///
    /// ```rust
    /// use criteria_query::criteria::{DateRange, FieldSpec};
    /// use criteria_query::value::Value;
    ///
    /// assert!(!FieldSpec::Scalar(None).is_active());
    /// assert!(!FieldSpec::Scalar(Some(Value::Null)).is_active());
    /// assert!(!FieldSpec::Excluded.is_active());
    /// assert!(FieldSpec::DateRange(Some(DateRange::null())).is_active());
    /// ```
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Scalar(value) => value.as_ref().is_some_and(|v| !v.is_null()),
            Self::Text(value) => value.is_some(),
            Self::DateRange(range) => range.is_some(),
            Self::DecimalRange(range) => range.is_some(),
            Self::Excluded => false,
        }
    }
}

/// A named criteria field
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaField {
    /// Name of the entity field this filters
    pub name: &'static str,
    /// Filter kind and value
    pub spec: FieldSpec,
}

impl CriteriaField {
    /// Create a field from its parts
    #[must_use]
    pub const fn new(name: &'static str, spec: FieldSpec) -> Self {
        Self { name, spec }
    }

    /// Exact-match field
    pub fn scalar<V: Into<Value>>(name: &'static str, value: Option<V>) -> Self {
        Self {
            name,
            spec: FieldSpec::Scalar(value.map(Into::into)),
        }
    }

    /// Substring-match field
    pub fn text<S: Into<String>>(name: &'static str, value: Option<S>) -> Self {
        Self {
            name,
            spec: FieldSpec::Text(value.map(Into::into)),
        }
    }

    /// Timestamp range field
    #[must_use]
    pub const fn date_range(name: &'static str, value: Option<DateRange>) -> Self {
        Self {
            name,
            spec: FieldSpec::DateRange(value),
        }
    }

    /// Decimal range field
    #[must_use]
    pub const fn decimal_range(name: &'static str, value: Option<DecimalRange>) -> Self {
        Self {
            name,
            spec: FieldSpec::DecimalRange(value),
        }
    }

    /// Field that is carried alongside criteria but never filters
    #[must_use]
    pub const fn excluded(name: &'static str) -> Self {
        Self {
            name,
            spec: FieldSpec::Excluded,
        }
    }
}

/// Filter description for entities of type `E`
pub trait Criteria<E: Entity> {
    /// All criteria fields with their current values
    fn fields(&self) -> Vec<CriteriaField>;

    /// Fields that will contribute a predicate
    fn active_fields(&self) -> Vec<CriteriaField> {
        self.fields()
            .into_iter()
            .filter(|field| field.spec.is_active())
            .collect()
    }
}

/// Criteria bundled with the page parameters of a search request
///
/// The page parameters ride along with the criteria but never filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters<C> {
    /// Filter criteria
    pub criteria: C,
    /// Paging and sorting
    #[serde(default)]
    pub page_parameters: PageParameters,
}

impl<C> SearchParameters<C> {
    /// Bundle criteria with page parameters
    pub const fn new(criteria: C, page_parameters: PageParameters) -> Self {
        Self {
            criteria,
            page_parameters,
        }
    }
}

//! Queryable capability traits
//!
//! These traits are the whole contract between the query compilers and a
//! storage collaborator. They use RPITIT (Return Position Impl Trait In
//! Traits), so implementors write plain `async fn` for the I/O methods.
//!
//! - [`Pageable`]: count, skip/take, materialize. Enough for paging any row
//!   type, including projections.
//! - [`Queryable`]: adds filtering and ordering over entity fields.
//!
//! Builder methods consume `self` and return the narrowed query; nothing runs
//! until [`Pageable::count`] or [`Pageable::materialize`] is awaited.
//!
//! # Example
//!
//! ```rust,ignore
//! use criteria_query::query::{OrderBy, Pageable, Predicate, Queryable};
//!
//! let people = store
//!     .people()
//!     .filter(Predicate::eq("last_name", "Miles"))
//!     .order_by(OrderBy::descending("created_at"))
//!     .skip(0)
//!     .take(20)
//!     .materialize()
//!     .await?;
//! ```

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::error::QueryResult;
use super::predicate::Predicate;

/// Direction for ordering results
///
/// ```rust
/// use criteria_query::query::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(OrderDirection::from_desc(true), OrderDirection::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// Direction for a `desc` flag
    #[must_use]
    pub const fn from_desc(desc: bool) -> Self {
        if desc {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Whether this is [`OrderDirection::Descending`]
    #[must_use]
    pub const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// A resolved ordering on one stored field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderBy {
    /// Stored field name
    pub field: String,
    /// Sort direction
    pub direction: OrderDirection,
}

impl OrderBy {
    /// Ordering with an explicit direction
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending ordering
    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Ascending)
    }

    /// Descending ordering
    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Descending)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_sql())
    }
}

/// Row counting, slicing and materialization
pub trait Pageable: Sized + Send {
    /// Row type produced by [`Pageable::materialize`]
    type Item: Send;

    /// Count the rows this query would produce
    fn count(&self) -> impl Future<Output = QueryResult<u64>> + Send;

    /// Skip the first `n` rows
    #[must_use]
    fn skip(self, n: u64) -> Self;

    /// Keep at most `n` rows
    #[must_use]
    fn take(self, n: u64) -> Self;

    /// Run the query and collect its rows in order
    fn materialize(self) -> impl Future<Output = QueryResult<Vec<Self::Item>>> + Send;
}

/// Filtering and ordering over entity fields
pub trait Queryable: Pageable {
    /// Narrow the query to rows matching `predicate`, in addition to every
    /// predicate already applied
    #[must_use]
    fn filter(self, predicate: Predicate) -> Self;

    /// Stable-sort the rows produced so far by one field
    ///
    /// This is a primary sort: a later `order_by` re-sorts the output of an
    /// earlier one, which then only decides the order among ties.
    #[must_use]
    fn order_by(self, order: OrderBy) -> Self;
}

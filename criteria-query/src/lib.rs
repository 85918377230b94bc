//! # criteria-query
//!
//! Compile criteria objects and sort directives into filtered, ordered and
//! paged queries over any storage that implements a small queryable
//! capability set.
//!
//! ## Features
//!
//! - **Criteria**: per-field filters declared once as a [`criteria::FieldSpec`]
//!   (scalar, text, date range, decimal range, excluded)
//! - **Predicates**: equality, null-tolerant identifier equality, substring,
//!   inclusive ranges and null tests, combined by conjunction
//! - **Sorting**: ordered sort directives with identifier-attribute resolution
//! - **Paging**: row and page counts plus a zero-based page slice in a
//!   serializable envelope
//! - **Repository**: read-only orchestration with override hooks (feature
//!   `repository`, on by default)
//!
//! ## Example
//!
//! ```rust,ignore
//! use criteria_query::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let criteria = PersonCriteria {
//!         last_name: Some("Miles".to_string()),
//!         ..Default::default()
//!     };
//!     let page = search(MemoryQueryable::new(people), &criteria, &config.page_parameters()).await?;
//!     println!("{} of {} rows", page.resource.len(), page.count);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod criteria;
pub mod entity;
pub mod error;
pub mod observability;
pub mod paging;
pub mod query;
pub mod value;

#[cfg(feature = "repository")]
pub mod repository;

#[cfg(test)]
mod test_fixtures;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{Config, LogFormat, LoggingConfig, PagingConfig};
    pub use crate::criteria::{
        Criteria, CriteriaField, DateRange, DecimalRange, FieldSpec, SearchParameters,
    };
    pub use crate::entity::{Entity, FieldDef, Record, StringIdentifier, DEFAULT_ID_ATTRIBUTE};
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;
    pub use crate::paging::{
        compute_pages, compute_projection_pages, page_entities, page_projection, PageParameters,
        PageRequest, PagedEntities, Pagination, SimplePageParameters, SortParameter,
    };
    pub use crate::query::{
        apply_criteria, apply_sorts, search, MemoryQueryable, OrderBy, OrderDirection, Pageable,
        Predicate, PredicateOperator, QueryError, QueryErrorKind, QueryOperation, QueryResult,
        Queryable,
    };
    pub use crate::value::{Value, ValueKind};

    #[cfg(feature = "repository")]
    pub use crate::repository::ReadOnlyRepository;
}

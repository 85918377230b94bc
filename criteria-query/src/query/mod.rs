//! Query construction
//!
//! This module compiles criteria and sort directives into operations on a
//! [`Queryable`]. The pipeline is:
//!
//! ```text
//! criteria ─▶ apply_criteria ─▶ apply_sorts ─▶ page_entities ─▶ PagedEntities
//! ```
//!
//! Compilation is synchronous and performs no I/O. Only counting and
//! materializing go through the storage collaborator, which is anything that
//! implements [`Queryable`]. [`MemoryQueryable`] is the in-process
//! implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use criteria_query::paging::PageParameters;
//! use criteria_query::query::{search, MemoryQueryable};
//!
//! let criteria = PersonCriteria {
//!     last_name: Some("Miles".to_string()),
//!     ..Default::default()
//! };
//! let page = search(MemoryQueryable::new(people), &criteria, &PageParameters::default()).await?;
//! assert_eq!(page.count, 2);
//! ```

mod compiler;
mod error;
mod memory;
mod predicate;
mod queryable;
mod sort;

pub use compiler::{apply_criteria, compile_predicates};
pub use error::{QueryError, QueryErrorKind, QueryOperation, QueryResult};
pub use memory::MemoryQueryable;
pub use predicate::{Predicate, PredicateOperator};
pub use queryable::{OrderBy, OrderDirection, Pageable, Queryable};
pub use sort::{apply_sorts, compile_sorts, resolve_sort_field};

use crate::criteria::Criteria;
use crate::entity::Entity;
use crate::paging::{page_entities, PageRequest, PagedEntities};

/// Filter, sort and page `source` in one call
///
/// Criteria and sort directives are compiled before anything is counted, so
/// configuration errors surface without a storage round-trip.
pub async fn search<E, C, Q, R>(source: Q, criteria: &C, request: &R) -> QueryResult<PagedEntities<E>>
where
    E: Entity + Send,
    C: Criteria<E> + ?Sized,
    Q: Queryable<Item = E>,
    R: PageRequest + ?Sized,
{
    let filtered = apply_criteria(source, criteria)?;
    let sorted = apply_sorts(filtered, &request.sort())?;
    page_entities(sorted, request).await
}

//! Read-only repository
//!
//! [`ReadOnlyRepository`] wires the query pipeline to a storage collaborator.
//! Implementors supply [`ReadOnlyRepository::entities`]; paging, criteria
//! search and lookup by identifier come from default methods built on RPITIT
//! (Return Position Impl Trait In Traits), so no `async_trait` is needed.
//!
//! Three hooks can be overridden to adjust the query at fixed points:
//!
//! - [`ReadOnlyRepository::post_process_get`] after the source is fetched for `get`
//! - [`ReadOnlyRepository::post_process_query`] after criteria are applied
//! - [`ReadOnlyRepository::post_paging`] after the page slice is taken, before
//!   rows are materialized
//!
//! # Example
//!
//! ```rust,ignore
//! use criteria_query::prelude::*;
//!
//! struct PersonRepository {
//!     people: Vec<Person>,
//! }
//!
//! impl ReadOnlyRepository<Person> for PersonRepository {
//!     type Source = MemoryQueryable<Person>;
//!
//!     fn entities(&self) -> Self::Source {
//!         MemoryQueryable::new(self.people.clone())
//!     }
//! }
//!
//! let page = repo.query(&criteria, &PageParameters::default()).await?;
//! let person = repo.find(person_id).await?;
//! ```

use std::future::Future;

use futures::TryFutureExt;

use crate::criteria::Criteria;
use crate::entity::{Entity, DEFAULT_ID_ATTRIBUTE};
use crate::paging::{compute_pages, page_query, PageRequest, PagedEntities};
use crate::query::{
    apply_criteria, apply_sorts, resolve_sort_field, Pageable, Predicate, QueryOperation,
    QueryResult, Queryable,
};
use crate::value::Value;

/// Paged, criteria-driven read access to one entity type
pub trait ReadOnlyRepository<E>: Send + Sync
where
    E: Entity + Send,
{
    /// Queryable over every stored entity
    type Source: Queryable<Item = E>;

    /// A fresh query over every stored entity
    fn entities(&self) -> Self::Source;

    /// Adjust the unfiltered query used by [`ReadOnlyRepository::get`]
    fn post_process_get(&self, query: Self::Source) -> Self::Source {
        query
    }

    /// Adjust a query after `criteria` have been applied
    fn post_process_query<C>(&self, criteria: &C, query: Self::Source) -> Self::Source
    where
        C: Criteria<E> + ?Sized,
    {
        let _ = criteria;
        query
    }

    /// Adjust the page slice before it is materialized
    fn post_paging(&self, query: Self::Source) -> Self::Source {
        query
    }

    /// One page of all entities
    fn get<R>(&self, request: &R) -> impl Future<Output = QueryResult<PagedEntities<E>>> + Send
    where
        R: PageRequest + Sync + ?Sized,
    {
        let sorted = apply_sorts(self.post_process_get(self.entities()), &request.sort());
        async move {
            page_query(sorted?, request, compute_pages, |query| self.post_paging(query)).await
        }
    }

    /// One page of the entities matching `criteria`
    ///
    /// Criteria and sort directives are compiled before the returned future
    /// is first polled.
    fn query<C, R>(
        &self,
        criteria: &C,
        request: &R,
    ) -> impl Future<Output = QueryResult<PagedEntities<E>>> + Send
    where
        C: Criteria<E> + ?Sized,
        R: PageRequest + Sync + ?Sized,
    {
        let prepared = apply_criteria(self.entities(), criteria)
            .map(|query| self.post_process_query(criteria, query))
            .and_then(|query| apply_sorts(query, &request.sort()));
        async move {
            page_query(prepared?, request, compute_pages, |query| self.post_paging(query)).await
        }
    }

    /// The entity with identifier `id`, if any
    fn find(&self, id: E::Id) -> impl Future<Output = QueryResult<Option<E>>> + Send
    where
        E::Id: Into<Value>,
    {
        let lookup = resolve_sort_field::<E>(DEFAULT_ID_ATTRIBUTE)
            .map(|def| {
                self.entities()
                    .filter(Predicate::eq(def.name, id.into()))
                    .take(1)
            })
            .map_err(|e| e.with_operation(QueryOperation::Find));
        async move {
            lookup?
                .materialize()
                .map_ok(|rows| rows.into_iter().next())
                .await
        }
    }
}

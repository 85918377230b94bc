//! In-memory queryable
//!
//! [`MemoryQueryable`] implements the capability traits over rows held in a
//! shared vector. Operations are recorded, not run: each `count` or
//! `materialize` replays them in order against the source rows, the way a
//! database would re-run a composed query.

use std::fmt;
use std::sync::Arc;

use crate::entity::Record;

use super::error::QueryResult;
use super::predicate::Predicate;
use super::queryable::{OrderBy, Pageable, Queryable};

type Stage<T> = Arc<dyn Fn(Vec<T>) -> QueryResult<Vec<T>> + Send + Sync>;

/// Deferred query over in-memory rows
///
/// ```rust,ignore
/// use criteria_query::query::{MemoryQueryable, OrderBy, Pageable, Predicate, Queryable};
///
/// let query = MemoryQueryable::new(people)
///     .filter(Predicate::eq("last_name", "Miles"))
///     .order_by(OrderBy::ascending("first_name"));
/// assert_eq!(query.plan(), vec!["WHERE last_name = 'Miles'", "ORDER BY first_name ASC"]);
/// let rows = query.materialize().await?;
/// ```
pub struct MemoryQueryable<T> {
    rows: Arc<Vec<T>>,
    stages: Vec<(String, Stage<T>)>,
}

impl<T> MemoryQueryable<T> {
    /// Query over the given rows
    pub fn new(rows: impl Into<Vec<T>>) -> Self {
        Self {
            rows: Arc::new(rows.into()),
            stages: Vec::new(),
        }
    }

    /// Descriptions of the recorded operations, in application order
    #[must_use]
    pub fn plan(&self) -> Vec<&str> {
        self.stages.iter().map(|(step, _)| step.as_str()).collect()
    }

    /// Number of source rows, before any operation
    #[must_use]
    pub fn source_len(&self) -> usize {
        self.rows.len()
    }

    fn push(mut self, step: String, stage: Stage<T>) -> Self {
        self.stages.push((step, stage));
        self
    }
}

impl<T: Clone> MemoryQueryable<T> {
    fn execute(&self) -> QueryResult<Vec<T>> {
        tracing::trace!(
            rows = self.rows.len(),
            stages = self.stages.len(),
            "executing in-memory query"
        );
        let mut rows = self.rows.as_ref().clone();
        for (_, stage) in &self.stages {
            rows = stage(rows)?;
        }
        Ok(rows)
    }
}

impl<T> Clone for MemoryQueryable<T> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            stages: self.stages.clone(),
        }
    }
}

impl<T> fmt::Debug for MemoryQueryable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQueryable")
            .field("rows", &self.rows.len())
            .field("plan", &self.plan())
            .finish()
    }
}

impl<T> From<Vec<T>> for MemoryQueryable<T> {
    fn from(rows: Vec<T>) -> Self {
        Self::new(rows)
    }
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

impl<T> Pageable for MemoryQueryable<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    async fn count(&self) -> QueryResult<u64> {
        let rows = self.execute()?;
        Ok(rows.len() as u64)
    }

    fn skip(self, n: u64) -> Self {
        let n = to_usize(n);
        self.push(
            format!("OFFSET {n}"),
            Arc::new(move |rows: Vec<T>| -> QueryResult<Vec<T>> {
                Ok(rows.into_iter().skip(n).collect())
            }),
        )
    }

    fn take(self, n: u64) -> Self {
        let n = to_usize(n);
        self.push(
            format!("LIMIT {n}"),
            Arc::new(move |rows: Vec<T>| -> QueryResult<Vec<T>> {
                Ok(rows.into_iter().take(n).collect())
            }),
        )
    }

    async fn materialize(self) -> QueryResult<Vec<T>> {
        self.execute()
    }
}

impl<T> Queryable for MemoryQueryable<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    fn filter(self, predicate: Predicate) -> Self {
        self.push(
            format!("WHERE {predicate}"),
            Arc::new(move |rows: Vec<T>| -> QueryResult<Vec<T>> {
                let mut kept = Vec::with_capacity(rows.len());
                for row in rows {
                    let matched = predicate
                        .evaluate(&row)
                        .map_err(|e| e.with_entity(T::entity_name()))?;
                    if matched {
                        kept.push(row);
                    }
                }
                Ok(kept)
            }),
        )
    }

    fn order_by(self, order: OrderBy) -> Self {
        self.push(
            format!("ORDER BY {order}"),
            Arc::new(move |mut rows: Vec<T>| -> QueryResult<Vec<T>> {
                // sort_by is stable, so rows tied on this key keep the order
                // an earlier ordering gave them
                rows.sort_by(|a, b| {
                    let ordering = a.value(&order.field).total_cmp(&b.value(&order.field));
                    if order.direction.is_descending() {
                        ordering.reverse()
                    } else {
                        ordering
                    }
                });
                Ok(rows)
            }),
        )
    }
}

//! Sort compiler
//!
//! Sort directives are applied one at a time, in the order given, each as a
//! stable primary sort over the output of the previous one. The last
//! directive therefore decides the final order and earlier directives only
//! break its ties:
//!
//! ```text
//! [last_name asc, first_name asc]  ->  ORDER BY last_name ASC
//!                                      ORDER BY first_name ASC
//!                                  ==  sorted by first_name, then last_name
//! ```
//!
//! The logical field `"id"` (any case) resolves to the entity's identifier
//! attribute when the entity declares one other than `"id"`.

use crate::entity::{Entity, FieldDef, DEFAULT_ID_ATTRIBUTE};
use crate::paging::SortParameter;

use super::error::{QueryError, QueryResult};
use super::queryable::{OrderBy, Queryable};

/// Resolve a sort field name to a declared field of `E`
///
/// ```rust,ignore
/// assert_eq!(resolve_sort_field::<Document>("id")?.name, "db_id");
/// assert_eq!(resolve_sort_field::<Person>("Last_Name")?.name, "last_name");
/// ```
pub fn resolve_sort_field<E: Entity>(name: &str) -> QueryResult<&'static FieldDef> {
    if name.eq_ignore_ascii_case(DEFAULT_ID_ATTRIBUTE) {
        let attribute = E::id_attribute();
        if attribute != DEFAULT_ID_ATTRIBUTE {
            if let Some(def) = E::field(attribute) {
                return Ok(def);
            }
            tracing::debug!(
                entity = E::entity_name(),
                id_attribute = attribute,
                "identifier attribute not declared, sorting on literal field"
            );
        }
    }
    E::field(name).ok_or_else(|| QueryError::unresolvable_sort_field(E::entity_name(), name))
}

/// Resolve every directive to an ordering, in application order
///
/// An empty list sorts by identifier, ascending.
pub fn compile_sorts<E: Entity>(sorts: &[SortParameter]) -> QueryResult<Vec<OrderBy>> {
    let default_sort = [SortParameter::default()];
    let sorts = if sorts.is_empty() {
        &default_sort[..]
    } else {
        sorts
    };

    sorts
        .iter()
        .map(|sort| {
            let def = resolve_sort_field::<E>(&sort.field)?;
            let order = OrderBy::new(def.name, sort.direction());
            tracing::debug!(
                entity = E::entity_name(),
                requested = %sort.field,
                order = %order,
                "compiled sort directive"
            );
            Ok(order)
        })
        .collect()
}

/// Order `query` by each directive in turn
///
/// Every directive is resolved before the query is touched.
pub fn apply_sorts<E, Q>(query: Q, sorts: &[SortParameter]) -> QueryResult<Q>
where
    E: Entity,
    Q: Queryable<Item = E>,
{
    let orders = compile_sorts::<E>(sorts)?;
    Ok(orders.into_iter().fold(query, Queryable::order_by))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MemoryQueryable, OrderDirection, Pageable, QueryErrorKind};
    use crate::test_fixtures::{people, Document, Person};

    async fn first_names(sorts: &[SortParameter]) -> Vec<String> {
        let query = apply_sorts(MemoryQueryable::new(people()), sorts).unwrap();
        query
            .materialize()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.first_name)
            .collect()
    }

    #[test]
    fn test_id_resolves_to_identifier_attribute() {
        assert_eq!(resolve_sort_field::<Document>("id").unwrap().name, "db_id");
        assert_eq!(resolve_sort_field::<Document>("ID").unwrap().name, "db_id");
        assert_eq!(resolve_sort_field::<Person>("id").unwrap().name, "id");
    }

    #[test]
    fn test_field_resolution_is_case_insensitive() {
        assert_eq!(resolve_sort_field::<Person>("Last_Name").unwrap().name, "last_name");
    }

    #[test]
    fn test_unknown_sort_field_is_an_error() {
        let error = resolve_sort_field::<Person>("middle_name").unwrap_err();
        assert_eq!(error.kind, QueryErrorKind::UnresolvableSortField);
        assert_eq!(error.field.as_deref(), Some("middle_name"));
    }

    #[test]
    fn test_empty_sorts_default_to_id_ascending() {
        let orders = compile_sorts::<Document>(&[]).unwrap();
        assert_eq!(orders, vec![OrderBy::new("db_id", OrderDirection::Ascending)]);
    }

    #[test]
    fn test_directives_apply_in_given_order() {
        let query = apply_sorts(
            MemoryQueryable::new(people()),
            &[
                SortParameter::ascending("last_name"),
                SortParameter::descending("age"),
            ],
        )
        .unwrap();
        assert_eq!(
            query.plan(),
            vec!["ORDER BY last_name ASC", "ORDER BY age DESC"]
        );
    }

    #[tokio::test]
    async fn test_last_directive_dominates() {
        // age is the primary key; last_name only orders the two 17-year-olds
        let names = first_names(&[
            SortParameter::descending("last_name"),
            SortParameter::ascending("age"),
        ])
        .await;
        assert_eq!(names, vec!["Zed", "Carl", "Emily", "Joanna"]);

        let names = first_names(&[
            SortParameter::ascending("last_name"),
            SortParameter::ascending("age"),
        ])
        .await;
        assert_eq!(names, vec!["Carl", "Zed", "Emily", "Joanna"]);
    }

    #[tokio::test]
    async fn test_unresolvable_directive_leaves_query_untouched() {
        let result = apply_sorts(
            MemoryQueryable::new(people()),
            &[
                SortParameter::ascending("last_name"),
                SortParameter::ascending("shoe_size"),
            ],
        );
        assert!(result.is_err());
    }
}

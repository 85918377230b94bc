//! Predicate compiler
//!
//! Turns the populated fields of a criteria value into predicates on the
//! entity's stored fields and applies them to a queryable. Every predicate
//! narrows the query further; there is no OR.
//!
//! | Criteria field                  | Stored field kind    | Predicate                |
//! |---------------------------------|----------------------|--------------------------|
//! | text `s`                        | any                  | `field LIKE '%s%'`       |
//! | date range `(start, end)`       | timestamp            | `>= start`, `<= end`     |
//! | decimal range `(start, end)`    | decimal, integer     | `>= start`, `<= end`     |
//! | range with neither bound        | as above             | `IS NULL`                |
//! | scalar `v`                      | uuid                 | `COALESCE(field, nil) = v` |
//! | scalar `v`                      | anything else        | `field = v`              |
//!
//! Absent values and excluded fields produce nothing.

use crate::criteria::{Criteria, CriteriaField, DateRange, DecimalRange, FieldSpec};
use crate::entity::{Entity, FieldDef};
use crate::value::{Value, ValueKind};

use super::error::{QueryError, QueryResult};
use super::predicate::Predicate;
use super::queryable::Queryable;

/// Compile every active criteria field into predicates
///
/// Returns an empty list when no field is populated.
pub fn compile_predicates<E, C>(criteria: &C) -> QueryResult<Vec<Predicate>>
where
    E: Entity,
    C: Criteria<E> + ?Sized,
{
    let mut predicates = Vec::new();
    for field in criteria.active_fields() {
        predicates.extend(compile_field::<E>(&field)?);
    }
    Ok(predicates)
}

/// Narrow `query` by every active field of `criteria`
///
/// All fields are compiled before the query is touched, so a type error
/// leaves nothing half-applied. Empty criteria return `query` unchanged.
///
/// ```rust,ignore
/// let criteria = PersonCriteria {
///     last_name: Some("Miles".into()),
///     ..Default::default()
/// };
/// let query = apply_criteria(MemoryQueryable::new(people), &criteria)?;
/// assert_eq!(query.plan(), vec!["WHERE last_name LIKE '%Miles%'"]);
/// ```
pub fn apply_criteria<E, C, Q>(query: Q, criteria: &C) -> QueryResult<Q>
where
    E: Entity,
    C: Criteria<E> + ?Sized,
    Q: Queryable<Item = E>,
{
    let predicates = compile_predicates::<E, C>(criteria)?;
    Ok(predicates.into_iter().fold(query, Queryable::filter))
}

fn compile_field<E: Entity>(field: &CriteriaField) -> QueryResult<Vec<Predicate>> {
    let def = E::field(field.name)
        .ok_or_else(|| QueryError::unknown_field(E::entity_name(), field.name))?;

    let predicates = match &field.spec {
        FieldSpec::Excluded
        | FieldSpec::Scalar(None)
        | FieldSpec::Text(None)
        | FieldSpec::DateRange(None)
        | FieldSpec::DecimalRange(None) => Vec::new(),
        FieldSpec::Text(Some(needle)) => vec![Predicate::contains(def.name, needle.as_str())],
        FieldSpec::DateRange(Some(range)) => compile_date_range::<E>(def, range)?,
        FieldSpec::DecimalRange(Some(range)) => compile_decimal_range::<E>(def, range)?,
        FieldSpec::Scalar(Some(value)) => vec![compile_scalar::<E>(def, value)?],
    };

    for predicate in &predicates {
        tracing::debug!(
            entity = E::entity_name(),
            field = def.name,
            predicate = %predicate,
            "compiled criteria field"
        );
    }
    Ok(predicates)
}

fn compile_scalar<E: Entity>(def: &FieldDef, value: &Value) -> QueryResult<Predicate> {
    let coerced = value.coerce(def.kind).ok_or_else(|| {
        QueryError::type_coercion(
            E::entity_name(),
            def.name,
            format!("cannot convert {value} to {}", def.kind),
        )
    })?;

    if def.kind == ValueKind::Uuid {
        let operand = if coerced.is_null() {
            Value::canonical_empty(ValueKind::Uuid)
        } else {
            coerced
        };
        return Ok(Predicate::eq_or_empty(def.name, operand));
    }
    Ok(Predicate::eq(def.name, coerced))
}

fn compile_date_range<E: Entity>(def: &FieldDef, range: &DateRange) -> QueryResult<Vec<Predicate>> {
    if def.kind != ValueKind::Timestamp {
        return Err(QueryError::type_coercion(
            E::entity_name(),
            def.name,
            format!("date range cannot filter a {} field", def.kind),
        ));
    }
    Ok(range_predicates(
        def.name,
        range.start.map(Value::from),
        range.end.map(Value::from),
    ))
}

fn compile_decimal_range<E: Entity>(
    def: &FieldDef,
    range: &DecimalRange,
) -> QueryResult<Vec<Predicate>> {
    if !matches!(def.kind, ValueKind::Decimal | ValueKind::Integer) {
        return Err(QueryError::type_coercion(
            E::entity_name(),
            def.name,
            format!("decimal range cannot filter a {} field", def.kind),
        ));
    }
    Ok(range_predicates(
        def.name,
        range.start.map(Value::from),
        range.end.map(Value::from),
    ))
}

// Bounds are separate predicates, so a present-but-empty range is the only
// way a range field asks for IS NULL.
fn range_predicates(field: &str, start: Option<Value>, end: Option<Value>) -> Vec<Predicate> {
    match (start, end) {
        (None, None) => vec![Predicate::is_null(field)],
        (start, end) => start
            .map(|start| Predicate::gte(field, start))
            .into_iter()
            .chain(end.map(|end| Predicate::lte(field, end)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{MemoryQueryable, Pageable, PredicateOperator, QueryErrorKind};
    use crate::test_fixtures::{joanna_and_emily, Person, PersonCriteria};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    struct BadCriteria(Vec<CriteriaField>);

    impl Criteria<Person> for BadCriteria {
        fn fields(&self) -> Vec<CriteriaField> {
            self.0.clone()
        }
    }

    async fn matches(criteria: &PersonCriteria) -> Vec<String> {
        let (joanna, emily) = joanna_and_emily();
        let query = apply_criteria(MemoryQueryable::new(vec![joanna, emily]), criteria).unwrap();
        query
            .materialize()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.first_name)
            .collect()
    }

    #[test]
    fn test_empty_criteria_is_a_no_op() {
        let query = apply_criteria(MemoryQueryable::<Person>::new(Vec::new()), &PersonCriteria::default())
            .unwrap();
        assert!(query.plan().is_empty());
    }

    #[tokio::test]
    async fn test_parent_equality() {
        let (joanna, _) = joanna_and_emily();
        let criteria = PersonCriteria {
            parent_person: joanna.id,
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Emily"]);
    }

    #[tokio::test]
    async fn test_empty_guid_matches_null_parent() {
        let criteria = PersonCriteria {
            parent_person: Some(Uuid::nil()),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Joanna"]);
    }

    #[tokio::test]
    async fn test_last_name_substring() {
        let criteria = PersonCriteria {
            last_name: Some("Miles".to_string()),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Joanna", "Emily"]);

        let criteria = PersonCriteria {
            last_name: Some("ile".to_string()),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await.len(), 2);
    }

    #[tokio::test]
    async fn test_absent_last_name_is_omitted() {
        let criteria = PersonCriteria {
            last_name: None,
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await.len(), 2);
    }

    #[tokio::test]
    async fn test_anarchist_flag() {
        let criteria = PersonCriteria {
            is_anarchist: Some(true),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Emily"]);
    }

    #[tokio::test]
    async fn test_empty_range_matches_null_only() {
        let criteria = PersonCriteria {
            deceased_at: Some(DateRange::null()),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Emily"]);
    }

    #[tokio::test]
    async fn test_date_range_bounds() {
        let (joanna, _) = joanna_and_emily();
        let criteria = PersonCriteria {
            created_at: Some(DateRange::new(Some(joanna.created_at), Some(joanna.created_at))),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Joanna"]);
    }

    #[tokio::test]
    async fn test_decimal_range_on_integer_field() {
        let criteria = PersonCriteria {
            age: Some(DecimalRange::new(Some(Decimal::new(605, 1)), None)),
            ..Default::default()
        };
        assert_eq!(matches(&criteria).await, vec!["Joanna"]);
    }

    #[test]
    fn test_range_compiles_to_separate_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let criteria = PersonCriteria {
            created_at: Some(DateRange::new(Some(start), Some(end))),
            ..Default::default()
        };
        let predicates = compile_predicates::<Person, _>(&criteria).unwrap();
        let operators: Vec<_> = predicates.iter().map(|p| p.operator).collect();
        assert_eq!(
            operators,
            vec![
                PredicateOperator::GreaterThanOrEqual,
                PredicateOperator::LessThanOrEqual
            ]
        );

        let criteria = PersonCriteria {
            salary: Some(DecimalRange::new(None, Some(Decimal::ONE))),
            ..Default::default()
        };
        let predicates = compile_predicates::<Person, _>(&criteria).unwrap();
        assert_eq!(predicates, vec![Predicate::lte("salary", Decimal::ONE)]);
    }

    #[test]
    fn test_uuid_field_compiles_to_coalesced_equality() {
        let id = Uuid::new_v4();
        let criteria = PersonCriteria {
            parent_person: Some(id),
            ..Default::default()
        };
        let predicates = compile_predicates::<Person, _>(&criteria).unwrap();
        assert_eq!(predicates, vec![Predicate::eq_or_empty("parent_person", id)]);
    }

    #[test]
    fn test_text_value_coerces_to_uuid_field() {
        let id = Uuid::new_v4();
        let criteria = BadCriteria(vec![CriteriaField::scalar("id", Some(id.to_string()))]);
        let predicates = compile_predicates::<Person, _>(&criteria).unwrap();
        assert_eq!(predicates, vec![Predicate::eq_or_empty("id", id)]);
    }

    #[test]
    fn test_coercion_failure_is_an_error() {
        let criteria = BadCriteria(vec![CriteriaField::scalar("is_anarchist", Some("yes"))]);
        let error = compile_predicates::<Person, _>(&criteria).unwrap_err();
        assert_eq!(error.kind, QueryErrorKind::TypeCoercion);
        assert_eq!(error.field.as_deref(), Some("is_anarchist"));
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_range_on_wrong_kind_is_an_error() {
        let criteria = BadCriteria(vec![CriteriaField::date_range(
            "salary",
            Some(DateRange::null()),
        )]);
        let error = compile_predicates::<Person, _>(&criteria).unwrap_err();
        assert_eq!(error.kind, QueryErrorKind::TypeCoercion);

        let criteria = BadCriteria(vec![CriteriaField::decimal_range(
            "first_name",
            Some(DecimalRange::null()),
        )]);
        assert!(compile_predicates::<Person, _>(&criteria).is_err());
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let criteria = BadCriteria(vec![CriteriaField::text("middle_name", Some("Q"))]);
        let error = compile_predicates::<Person, _>(&criteria).unwrap_err();
        assert_eq!(error.kind, QueryErrorKind::UnknownField);
        assert_eq!(error.entity_type.as_deref(), Some("Person"));
    }

    #[test]
    fn test_criteria_field_names_resolve_case_insensitively() {
        let criteria = BadCriteria(vec![CriteriaField::text("LastName", Some("M"))]);
        assert!(compile_predicates::<Person, _>(&criteria).is_err());

        let criteria = BadCriteria(vec![CriteriaField::text("LAST_NAME", Some("M"))]);
        let predicates = compile_predicates::<Person, _>(&criteria).unwrap();
        assert_eq!(predicates[0].field, "last_name");
    }

    #[test]
    fn test_excluded_and_absent_fields_never_fail() {
        let criteria = BadCriteria(vec![
            CriteriaField::excluded("no_such_field"),
            CriteriaField::scalar::<bool>("also_missing", None),
        ]);
        assert!(compile_predicates::<Person, _>(&criteria).unwrap().is_empty());
    }
}

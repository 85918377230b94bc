//! Query error types
//!
//! This module provides structured errors for query compilation and
//! execution. Errors carry the operation that failed, a category, and the
//! entity type and field involved where known.
//!
//! # Example
//!
//! ```rust
//! use criteria_query::query::{QueryError, QueryErrorKind};
//!
//! let error = QueryError::unresolvable_sort_field("Person", "nickname");
//! assert!(matches!(error.kind, QueryErrorKind::UnresolvableSortField));
//! assert!(error.is_configuration_error());
//! ```

use std::fmt;

/// Result type for query operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Operation being performed when the query error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryOperation {
    /// Compiling criteria into predicates
    Filter,
    /// Compiling sort directives
    Sort,
    /// Counting rows
    Count,
    /// Computing page counts and slice bounds
    Page,
    /// Materializing rows
    Materialize,
    /// Looking up a single entity by identifier
    Find,
}

impl fmt::Display for QueryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => write!(f, "filter"),
            Self::Sort => write!(f, "sort"),
            Self::Count => write!(f, "count"),
            Self::Page => write!(f, "page"),
            Self::Materialize => write!(f, "materialize"),
            Self::Find => write!(f, "find"),
        }
    }
}

/// Category of query error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// A criteria value cannot be converted to the entity field's type
    TypeCoercion,
    /// A criteria field names a field the entity does not declare
    UnknownField,
    /// A sort directive names a field the entity does not declare
    UnresolvableSortField,
    /// A range comparison met a null stored value
    NullComparison,
    /// Page size or page number cannot be used
    InvalidPageParameters,
    /// Error raised by the storage collaborator
    Storage,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeCoercion => write!(f, "type_coercion"),
            Self::UnknownField => write!(f, "unknown_field"),
            Self::UnresolvableSortField => write!(f, "unresolvable_sort_field"),
            Self::NullComparison => write!(f, "null_comparison"),
            Self::InvalidPageParameters => write!(f, "invalid_page_parameters"),
            Self::Storage => write!(f, "storage"),
        }
    }
}

/// Structured query error with operation context
///
/// ```rust
/// use criteria_query::query::{QueryError, QueryOperation};
///
/// let error = QueryError::storage(QueryOperation::Count, "connection reset")
///     .with_entity("Person");
/// assert_eq!(
///     error.to_string(),
///     "Query storage error during count: connection reset [Person]"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The operation being performed when the error occurred
    pub operation: QueryOperation,
    /// The category of error
    pub kind: QueryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved (e.g., "Person")
    pub entity_type: Option<String>,
    /// The field involved
    pub field: Option<String>,
}

impl QueryError {
    /// Create a new query error
    pub fn new(operation: QueryOperation, kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            field: None,
        }
    }

    /// A criteria value could not be converted to the entity field's type
    pub fn type_coercion(
        entity_type: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: QueryOperation::Filter,
            kind: QueryErrorKind::TypeCoercion,
            message: message.into(),
            entity_type: Some(entity_type.into()),
            field: Some(field.into()),
        }
    }

    /// A criteria field names a field the entity does not declare
    pub fn unknown_field(entity_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            operation: QueryOperation::Filter,
            kind: QueryErrorKind::UnknownField,
            message: "Entity does not declare this field".to_string(),
            entity_type: Some(entity_type.into()),
            field: Some(field.into()),
        }
    }

    /// A sort directive names a field the entity does not declare
    pub fn unresolvable_sort_field(entity_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            operation: QueryOperation::Sort,
            kind: QueryErrorKind::UnresolvableSortField,
            message: "Sort field cannot be resolved".to_string(),
            entity_type: Some(entity_type.into()),
            field: Some(field.into()),
        }
    }

    /// A range comparison met a null stored value
    pub fn null_comparison(field: impl Into<String>) -> Self {
        Self {
            operation: QueryOperation::Materialize,
            kind: QueryErrorKind::NullComparison,
            message: "Range comparison against a null stored value".to_string(),
            entity_type: None,
            field: Some(field.into()),
        }
    }

    /// Page parameters cannot be applied
    pub fn invalid_page_parameters(message: impl Into<String>) -> Self {
        Self {
            operation: QueryOperation::Page,
            kind: QueryErrorKind::InvalidPageParameters,
            message: message.into(),
            entity_type: None,
            field: None,
        }
    }

    /// Error surfaced by the storage collaborator
    pub fn storage(operation: QueryOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind: QueryErrorKind::Storage,
            message: message.into(),
            entity_type: None,
            field: None,
        }
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Add field context to an existing error
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: QueryOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Whether this error points at a defect in criteria, entity or sort
    /// declarations rather than at the data
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self.kind,
            QueryErrorKind::TypeCoercion
                | QueryErrorKind::UnknownField
                | QueryErrorKind::UnresolvableSortField
        )
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Query {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        match (&self.entity_type, &self.field) {
            (Some(entity_type), Some(field)) => write!(f, " [{entity_type}.{field}]")?,
            (Some(entity_type), None) => write!(f, " [{entity_type}]")?,
            (None, Some(field)) => write!(f, " [{field}]")?,
            (None, None) => {}
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_operation_display() {
        assert_eq!(format!("{}", QueryOperation::Filter), "filter");
        assert_eq!(format!("{}", QueryOperation::Sort), "sort");
        assert_eq!(format!("{}", QueryOperation::Count), "count");
        assert_eq!(format!("{}", QueryOperation::Page), "page");
        assert_eq!(format!("{}", QueryOperation::Materialize), "materialize");
        assert_eq!(format!("{}", QueryOperation::Find), "find");
    }

    #[test]
    fn test_query_error_kind_display() {
        assert_eq!(format!("{}", QueryErrorKind::TypeCoercion), "type_coercion");
        assert_eq!(
            format!("{}", QueryErrorKind::UnresolvableSortField),
            "unresolvable_sort_field"
        );
        assert_eq!(
            format!("{}", QueryErrorKind::NullComparison),
            "null_comparison"
        );
        assert_eq!(format!("{}", QueryErrorKind::Storage), "storage");
    }

    #[test]
    fn test_type_coercion_display() {
        let error = QueryError::type_coercion("Person", "is_anarchist", "expected boolean, got text");
        assert_eq!(error.operation, QueryOperation::Filter);
        assert_eq!(
            error.to_string(),
            "Query type_coercion error during filter: expected boolean, got text [Person.is_anarchist]"
        );
    }

    #[test]
    fn test_null_comparison_has_field_only() {
        let error = QueryError::null_comparison("created_at");
        assert_eq!(error.operation, QueryOperation::Materialize);
        assert!(error.to_string().ends_with("[created_at]"));
        assert!(!error.is_configuration_error());
    }

    #[test]
    fn test_builders() {
        let error = QueryError::invalid_page_parameters("page size must be positive")
            .with_operation(QueryOperation::Count)
            .with_entity("Person")
            .with_field("size");
        assert_eq!(error.operation, QueryOperation::Count);
        assert_eq!(error.entity_type.as_deref(), Some("Person"));
        assert_eq!(error.field.as_deref(), Some("size"));
    }

    #[test]
    fn test_configuration_errors() {
        assert!(QueryError::unknown_field("Person", "x").is_configuration_error());
        assert!(QueryError::unresolvable_sort_field("Person", "x").is_configuration_error());
        assert!(!QueryError::storage(QueryOperation::Count, "down").is_configuration_error());
    }
}

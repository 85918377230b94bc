//! Entity identity model
//!
//! Every queryable row type implements [`Record`], which declares its stored
//! fields and exposes their values by name. Entities additionally implement
//! [`Entity`]: a typed, nullable identifier plus the name of the stored field
//! that identifier is physically mapped to.
//!
//! # Example
//!
//! ```rust
//! use criteria_query::entity::{Entity, FieldDef, Record};
//! use criteria_query::value::{Value, ValueKind};
//!
//! struct Tag {
//!     id: Option<i64>,
//!     label: String,
//! }
//!
//! impl Record for Tag {
//!     fn entity_name() -> &'static str {
//!         "Tag"
//!     }
//!
//!     fn fields() -> &'static [FieldDef] {
//!         const FIELDS: &[FieldDef] = &[
//!             FieldDef::nullable("id", ValueKind::Integer),
//!             FieldDef::required("label", ValueKind::Text),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn value(&self, field: &str) -> Value {
//!         match field {
//!             "id" => self.id.into(),
//!             "label" => self.label.as_str().into(),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! impl Entity for Tag {
//!     type Id = i64;
//!
//!     fn id(&self) -> Option<i64> {
//!         self.id
//!     }
//! }
//!
//! let tag = Tag { id: None, label: "rust".into() };
//! assert!(!tag.is_persisted());
//! assert_eq!(Tag::id_attribute(), "id");
//! assert_eq!(Tag::field("LABEL").map(|f| f.name), Some("label"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueKind};

/// Name of the stored identifier field unless an entity says otherwise
pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Declaration of a single stored field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDef {
    /// Stored field name
    pub name: &'static str,
    /// Declared type
    pub kind: ValueKind,
    /// Whether the stored value may be null
    pub nullable: bool,
}

impl FieldDef {
    /// Declare a field that always holds a value
    #[must_use]
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            nullable: false,
        }
    }

    /// Declare a field that may hold null
    #[must_use]
    pub const fn nullable(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            nullable: true,
        }
    }
}

/// A row type whose stored fields can be inspected by name
pub trait Record {
    /// Human-readable type name used in error messages
    fn entity_name() -> &'static str;

    /// Declared stored fields
    fn fields() -> &'static [FieldDef];

    /// Current value of a declared field
    ///
    /// `field` is always the declared [`FieldDef::name`]. Implementations
    /// return [`Value::Null`] for null values.
    fn value(&self, field: &str) -> Value;

    /// Look up a declared field by name
    ///
    /// An exact match wins; otherwise the first ASCII case-insensitive match
    /// is returned.
    fn field(name: &str) -> Option<&'static FieldDef> {
        let fields = Self::fields();
        fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }
}

/// A persisted record with a typed, nullable identifier
pub trait Entity: Record {
    /// Identifier type
    type Id: Clone + PartialEq + fmt::Debug + Send + Sync;

    /// Identifier, `None` until the entity is stored
    fn id(&self) -> Option<Self::Id>;

    /// Stored field backing the identifier
    ///
    /// Sorting on the logical `"id"` resolves to this field.
    fn id_attribute() -> &'static str {
        DEFAULT_ID_ATTRIBUTE
    }

    /// Whether the entity has an identifier
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// A comparable string identifier
///
/// Used as the public identifier of entities whose storage key is a text
/// column with a different name.
///
/// ```rust
/// use criteria_query::entity::StringIdentifier;
///
/// let a = StringIdentifier::new("alpha");
/// let b = StringIdentifier::new("beta");
/// assert!(a < b);
/// assert_eq!(a.to_string(), "alpha");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringIdentifier(String);

impl StringIdentifier {
    /// Wrap an identifier string
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The wrapped identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the identifier string
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for StringIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StringIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for StringIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StringIdentifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<StringIdentifier> for Value {
    fn from(id: StringIdentifier) -> Self {
        Self::Text(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{Document, Person};

    #[test]
    fn test_field_lookup_exact_then_case_insensitive() {
        assert_eq!(Person::field("last_name").map(|f| f.name), Some("last_name"));
        assert_eq!(Person::field("Last_Name").map(|f| f.name), Some("last_name"));
        assert!(Person::field("middle_name").is_none());
    }

    #[test]
    fn test_default_id_attribute() {
        assert_eq!(Person::id_attribute(), DEFAULT_ID_ATTRIBUTE);
    }

    #[test]
    fn test_overridden_id_attribute() {
        assert_eq!(Document::id_attribute(), "db_id");
        let doc = Document::new("doc-7", "Minutes");
        assert_eq!(doc.id(), Some(StringIdentifier::new("doc-7")));
    }

    #[test]
    fn test_is_persisted_tracks_identifier() {
        let mut person = Person::new("Joanna", "Miles");
        assert!(!person.is_persisted());
        person.id = Some(uuid::Uuid::new_v4());
        assert!(person.is_persisted());
    }

    #[test]
    fn test_string_identifier_serializes_transparently() {
        let id = StringIdentifier::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: StringIdentifier = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_string_identifier_into_value() {
        assert_eq!(Value::from(StringIdentifier::new("x")), Value::Text("x".to_string()));
    }
}

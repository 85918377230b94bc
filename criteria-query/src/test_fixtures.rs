//! Entities and criteria shared by the unit tests

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::criteria::{Criteria, CriteriaField, DateRange, DecimalRange};
use crate::entity::{Entity, FieldDef, Record, StringIdentifier};
use crate::paging::PageParameters;
use crate::value::{Value, ValueKind};

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: Option<Uuid>,
    pub parent_person: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub deceased_at: Option<DateTime<Utc>>,
    pub is_anarchist: Option<bool>,
    pub salary: Option<Decimal>,
    pub age: i64,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            id: None,
            parent_person: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            nickname: Some(first_name.to_lowercase()),
            created_at: at(2020, 1, 1),
            deceased_at: None,
            is_anarchist: None,
            salary: None,
            age: 0,
        }
    }
}

impl Record for Person {
    fn entity_name() -> &'static str {
        "Person"
    }

    fn fields() -> &'static [FieldDef] {
        const FIELDS: &[FieldDef] = &[
            FieldDef::nullable("id", ValueKind::Uuid),
            FieldDef::nullable("parent_person", ValueKind::Uuid),
            FieldDef::required("first_name", ValueKind::Text),
            FieldDef::required("last_name", ValueKind::Text),
            FieldDef::nullable("nickname", ValueKind::Text),
            FieldDef::required("created_at", ValueKind::Timestamp),
            FieldDef::nullable("deceased_at", ValueKind::Timestamp),
            FieldDef::nullable("is_anarchist", ValueKind::Boolean),
            FieldDef::nullable("salary", ValueKind::Decimal),
            FieldDef::required("age", ValueKind::Integer),
        ];
        FIELDS
    }

    fn value(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "parent_person" => self.parent_person.into(),
            "first_name" => self.first_name.as_str().into(),
            "last_name" => self.last_name.as_str().into(),
            "nickname" => self.nickname.clone().into(),
            "created_at" => self.created_at.into(),
            "deceased_at" => self.deceased_at.into(),
            "is_anarchist" => self.is_anarchist.into(),
            "salary" => self.salary.into(),
            "age" => self.age.into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Person {
    type Id = Uuid;

    fn id(&self) -> Option<Uuid> {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonCriteria {
    pub id: Option<Uuid>,
    pub parent_person: Option<Uuid>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: Option<DateRange>,
    pub deceased_at: Option<DateRange>,
    pub is_anarchist: Option<bool>,
    pub salary: Option<DecimalRange>,
    pub age: Option<DecimalRange>,
    pub page: Option<PageParameters>,
}

impl Criteria<Person> for PersonCriteria {
    fn fields(&self) -> Vec<CriteriaField> {
        vec![
            CriteriaField::scalar("id", self.id),
            CriteriaField::scalar("parent_person", self.parent_person),
            CriteriaField::text("first_name", self.first_name.clone()),
            CriteriaField::text("last_name", self.last_name.clone()),
            CriteriaField::date_range("created_at", self.created_at),
            CriteriaField::date_range("deceased_at", self.deceased_at),
            CriteriaField::scalar("is_anarchist", self.is_anarchist),
            CriteriaField::decimal_range("salary", self.salary),
            CriteriaField::decimal_range("age", self.age),
            CriteriaField::excluded("page"),
        ]
    }
}

/// Joanna has no parent and no anarchist flag; Emily is Joanna's child and
/// an anarchist. Identifiers are fixed so repeated calls agree.
pub fn joanna_and_emily() -> (Person, Person) {
    let mut joanna = Person::new("Joanna", "Miles");
    joanna.id = Some(Uuid::from_u128(1));
    joanna.created_at = at(2021, 1, 1);
    joanna.deceased_at = Some(at(2023, 6, 30));
    joanna.salary = Some(Decimal::new(5000, 0));
    joanna.age = 71;

    let mut emily = Person::new("Emily", "Miles");
    emily.id = Some(Uuid::from_u128(2));
    emily.parent_person = joanna.id;
    emily.is_anarchist = Some(true);
    emily.created_at = at(2022, 6, 1);
    emily.salary = Some(Decimal::new(3250, 0));
    emily.age = 45;

    (joanna, emily)
}

/// Joanna, Emily, Carl Adams (17, no salary) and Zed Young (17), in that order
pub fn people() -> Vec<Person> {
    let (joanna, emily) = joanna_and_emily();

    let mut carl = Person::new("Carl", "Adams");
    carl.id = Some(Uuid::from_u128(3));
    carl.is_anarchist = Some(false);
    carl.created_at = at(2023, 2, 14);
    carl.age = 17;

    let mut zed = Person::new("Zed", "Young");
    zed.id = Some(Uuid::from_u128(4));
    zed.created_at = at(2024, 9, 9);
    zed.salary = Some(Decimal::new(10, 0));
    zed.age = 17;

    vec![joanna, emily, carl, zed]
}

#[derive(Debug, Clone)]
pub struct Document {
    pub db_id: String,
    pub title: String,
}

impl Document {
    pub fn new(db_id: &str, title: &str) -> Self {
        Self {
            db_id: db_id.to_string(),
            title: title.to_string(),
        }
    }
}

impl Record for Document {
    fn entity_name() -> &'static str {
        "Document"
    }

    fn fields() -> &'static [FieldDef] {
        const FIELDS: &[FieldDef] = &[
            FieldDef::required("db_id", ValueKind::Text),
            FieldDef::required("title", ValueKind::Text),
        ];
        FIELDS
    }

    fn value(&self, field: &str) -> Value {
        match field {
            "db_id" => self.db_id.as_str().into(),
            "title" => self.title.as_str().into(),
            _ => Value::Null,
        }
    }
}

impl Entity for Document {
    type Id = StringIdentifier;

    fn id(&self) -> Option<StringIdentifier> {
        Some(StringIdentifier::new(self.db_id.as_str()))
    }

    fn id_attribute() -> &'static str {
        "db_id"
    }
}

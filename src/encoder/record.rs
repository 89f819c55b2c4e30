use std::any::Any;
use std::borrow::Cow;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::RecordKind;

/// A stored record the encoder knows how to read.
///
/// `field` must answer for every name declared in `kind().fields()`.
pub trait Record: Any + Send + Sync {
    fn kind(&self) -> RecordKind;

    /// Read a declared field by name.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    /// Human-readable label, used when a reference is emitted without a nested encoder.
    fn label(&self) -> String;

    /// Canonical-URL capability, for kinds that are addressable over the API.
    fn canonical(&self) -> Option<&dyn HasCanonicalUrl> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

pub trait HasCanonicalUrl {
    fn canonical_url(&self) -> String;
}

/// A field value read off a record.
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Cow<'a, str>),
    DateTime(DateTime<Utc>),
    Reference(&'a dyn Record),
    /// A reverse relation; still lazy until the collection normalizer materializes it.
    Records(Vec<&'a dyn Record>),
    /// A materialized sequence.
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    pub fn optional_text(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::text)
    }

    pub fn uuid(value: Uuid) -> Self {
        FieldValue::Text(Cow::Owned(value.to_string()))
    }

    pub fn records<R: Record>(records: &'a [R]) -> Self {
        FieldValue::Records(records.iter().map(|r| r as &dyn Record).collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Text(_) => "text",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::Reference(_) => "reference",
            FieldValue::Records(_) => "records",
            FieldValue::List(_) => "list",
        }
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(value: i32) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

//! Record-to-JSON encoding.
//!
//! An [`EncoderSpec`] names the fields of one record kind to emit, optional
//! nested specs for reference fields, and an optional hook that merges derived
//! values over the declared ones. The [`Encoder`] walks a record against a spec:
//!
//! 1. `href`, when the record has a canonical URL
//! 2. each declared field in order, either encoded with its nested spec or
//!    passed through the normalizer chain
//! 3. the extra hook's pairs, overwriting same-named keys in place

pub mod normalize;
pub mod record;
pub mod registry;
pub mod spec;

pub use normalize::{Normalizer, DEFAULT_NORMALIZERS};
pub use record::{FieldValue, HasCanonicalUrl, Record};
pub use registry::Encoders;
pub use spec::{EncoderSpec, EncoderSpecBuilder, ExtraFn, SpecError};

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::models::RecordKind;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{spec} encodes {expected} records, got a {found}")]
    UnsupportedType {
        spec: &'static str,
        expected: RecordKind,
        found: RecordKind,
    },

    #[error("{kind} does not expose field `{field}`")]
    MissingField { kind: RecordKind, field: &'static str },

    #[error("field `{field}` holds a {value_type} value that cannot be rendered as JSON")]
    Unencodable {
        field: &'static str,
        value_type: &'static str,
    },
}

/// Input to [`Encoder::encode`]: one record, or a homogeneous sequence.
pub enum Encodable<'a> {
    Record(&'a dyn Record),
    Sequence(Vec<&'a dyn Record>),
}

impl<'a> Encodable<'a> {
    pub fn one<R: Record>(record: &'a R) -> Self {
        Encodable::Record(record)
    }

    pub fn many<R: Record>(records: &'a [R]) -> Self {
        Encodable::Sequence(records.iter().map(|r| r as &dyn Record).collect())
    }
}

/// Walks records against specs. Holds the ordered normalizer chain.
#[derive(Debug, Clone)]
pub struct Encoder {
    normalizers: Vec<Normalizer>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(DEFAULT_NORMALIZERS.to_vec())
    }
}

impl Encoder {
    pub fn new(normalizers: Vec<Normalizer>) -> Self {
        Self { normalizers }
    }

    pub fn encode(&self, value: Encodable<'_>, spec: &EncoderSpec) -> Result<Value, EncodeError> {
        match value {
            Encodable::Record(record) => self.encode_record(record, spec),
            Encodable::Sequence(records) => self.encode_sequence(&records, spec),
        }
    }

    fn encode_sequence(
        &self,
        records: &[&dyn Record],
        spec: &EncoderSpec,
    ) -> Result<Value, EncodeError> {
        records
            .iter()
            .map(|record| self.encode_record(*record, spec))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn encode_record(&self, record: &dyn Record, spec: &EncoderSpec) -> Result<Value, EncodeError> {
        if record.kind() != spec.target() {
            return Err(EncodeError::UnsupportedType {
                spec: spec.name(),
                expected: spec.target(),
                found: record.kind(),
            });
        }

        let mut out = Map::new();
        if let Some(linked) = record.canonical() {
            out.insert("href".to_string(), Value::String(linked.canonical_url()));
        }

        for &field in spec.fields() {
            let value = record.field(field).ok_or(EncodeError::MissingField {
                kind: record.kind(),
                field,
            })?;
            let encoded = match spec.nested(field) {
                Some(nested) => self.encode_nested(field, value, nested)?,
                None => self.emit(field, normalize::normalize(&self.normalizers, value))?,
            };
            out.insert(field.to_string(), encoded);
        }

        // Map::insert keeps the original position of an existing key.
        for (key, value) in spec.extra(record) {
            out.insert(key, value);
        }

        Ok(Value::Object(out))
    }

    fn encode_nested(
        &self,
        field: &'static str,
        value: FieldValue<'_>,
        nested: &EncoderSpec,
    ) -> Result<Value, EncodeError> {
        match value {
            FieldValue::Reference(record) => self.encode_record(record, nested),
            FieldValue::Records(records) => self.encode_sequence(&records, nested),
            FieldValue::Null => Ok(Value::Null),
            other => Err(EncodeError::Unencodable {
                field,
                value_type: other.type_name(),
            }),
        }
    }

    /// Convert a normalized value into JSON. Anything still record-shaped is an error.
    fn emit(&self, field: &'static str, value: FieldValue<'_>) -> Result<Value, EncodeError> {
        match value {
            FieldValue::Null => Ok(Value::Null),
            FieldValue::Bool(b) => Ok(Value::Bool(b)),
            FieldValue::Int(n) => Ok(Value::Number(n.into())),
            FieldValue::Float(x) => Ok(Number::from_f64(x).map_or(Value::Null, Value::Number)),
            FieldValue::Text(s) => Ok(Value::String(s.into_owned())),
            FieldValue::List(items) => items
                .into_iter()
                .map(|item| self.emit(field, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(EncodeError::Unencodable {
                field,
                value_type: other.type_name(),
            }),
        }
    }
}

/// Encode with the default normalizer chain.
pub fn encode(value: Encodable<'_>, spec: &EncoderSpec) -> Result<Value, EncodeError> {
    Encoder::default().encode(value, spec)
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use super::record::Record;
use crate::models::{FieldKind, RecordKind};

/// Computes derived key/value pairs merged over the declared fields.
pub type ExtraFn = fn(&dyn Record) -> Map<String, Value>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("{spec}: {kind} has no field named `{field}`")]
    UnknownField {
        spec: &'static str,
        kind: RecordKind,
        field: &'static str,
    },

    #[error("{spec}: field `{field}` is listed more than once")]
    DuplicateField { spec: &'static str, field: &'static str },

    #[error("{spec}: nested encoder configured for `{field}`, which is not a listed field")]
    NestedNotListed { spec: &'static str, field: &'static str },

    #[error("{spec}: field `{field}` is not a reference and cannot take a nested encoder")]
    NotAReference { spec: &'static str, field: &'static str },

    #[error("{spec}: field `{field}` references {expected}, but its nested encoder targets {found}")]
    KindMismatch {
        spec: &'static str,
        field: &'static str,
        expected: RecordKind,
        found: RecordKind,
    },
}

/// Immutable description of how one record kind renders to JSON.
pub struct EncoderSpec {
    name: &'static str,
    target: RecordKind,
    fields: Vec<&'static str>,
    nested: HashMap<&'static str, Arc<EncoderSpec>>,
    extra: Option<ExtraFn>,
}

impl EncoderSpec {
    pub fn builder(name: &'static str, target: RecordKind) -> EncoderSpecBuilder {
        EncoderSpecBuilder {
            name,
            target,
            fields: Vec::new(),
            nested: Vec::new(),
            extra: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn target(&self) -> RecordKind {
        self.target
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn nested(&self, field: &str) -> Option<&EncoderSpec> {
        self.nested.get(field).map(Arc::as_ref)
    }

    pub fn extra(&self, record: &dyn Record) -> Map<String, Value> {
        self.extra.map(|extra| extra(record)).unwrap_or_default()
    }
}

impl fmt::Debug for EncoderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nested: Vec<_> = self
            .nested
            .iter()
            .map(|(field, spec)| (*field, spec.name))
            .collect();
        nested.sort_unstable();
        f.debug_struct("EncoderSpec")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("fields", &self.fields)
            .field("nested", &nested)
            .field("extra", &self.extra.is_some())
            .finish()
    }
}

pub struct EncoderSpecBuilder {
    name: &'static str,
    target: RecordKind,
    fields: Vec<&'static str>,
    nested: Vec<(&'static str, Arc<EncoderSpec>)>,
    extra: Option<ExtraFn>,
}

impl EncoderSpecBuilder {
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.fields.extend(fields);
        self
    }

    pub fn nested(mut self, field: &'static str, spec: Arc<EncoderSpec>) -> Self {
        self.nested.push((field, spec));
        self
    }

    pub fn extra(mut self, extra: ExtraFn) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Validate the configuration against the target kind's schema.
    pub fn build(self) -> Result<EncoderSpec, SpecError> {
        let spec = self.name;

        for (i, &field) in self.fields.iter().enumerate() {
            if self.target.field(field).is_none() {
                return Err(SpecError::UnknownField {
                    spec,
                    kind: self.target,
                    field,
                });
            }
            if self.fields[..i].contains(&field) {
                return Err(SpecError::DuplicateField { spec, field });
            }
        }

        let mut nested = HashMap::with_capacity(self.nested.len());
        for (field, encoder) in self.nested {
            if !self.fields.contains(&field) {
                return Err(SpecError::NestedNotListed { spec, field });
            }
            let expected = match self.target.field(field).map(|def| def.kind) {
                Some(FieldKind::Reference(kind)) | Some(FieldKind::Collection(kind)) => kind,
                _ => return Err(SpecError::NotAReference { spec, field }),
            };
            if encoder.target != expected {
                return Err(SpecError::KindMismatch {
                    spec,
                    field,
                    expected,
                    found: encoder.target,
                });
            }
            nested.insert(field, encoder);
        }

        Ok(EncoderSpec {
            name: self.name,
            target: self.target,
            fields: self.fields,
            nested,
            extra: self.extra,
        })
    }
}

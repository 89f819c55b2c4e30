use std::borrow::Cow;

use super::record::FieldValue;

/// A value rewrite applied to un-nested fields before they are emitted.
///
/// Normalizers run in order, each on the previous one's output, and recurse
/// into materialized lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    /// Timestamps become ISO-8601 strings.
    Timestamp,
    /// Reverse relations become ordered lists of references.
    Collection,
    /// References become the referenced record's label.
    ReferenceLabel,
}

pub const DEFAULT_NORMALIZERS: &[Normalizer] = &[
    Normalizer::Timestamp,
    Normalizer::Collection,
    Normalizer::ReferenceLabel,
];

impl Normalizer {
    pub fn apply<'a>(self, value: FieldValue<'a>) -> FieldValue<'a> {
        match (self, value) {
            (_, FieldValue::List(items)) => {
                FieldValue::List(items.into_iter().map(|item| self.apply(item)).collect())
            }
            (Normalizer::Timestamp, FieldValue::DateTime(at)) => {
                FieldValue::Text(Cow::Owned(at.to_rfc3339()))
            }
            (Normalizer::Collection, FieldValue::Records(records)) => {
                FieldValue::List(records.into_iter().map(FieldValue::Reference).collect())
            }
            (Normalizer::ReferenceLabel, FieldValue::Reference(record)) => {
                FieldValue::Text(Cow::Owned(record.label()))
            }
            (_, other) => other,
        }
    }
}

pub fn normalize<'a>(normalizers: &[Normalizer], value: FieldValue<'a>) -> FieldValue<'a> {
    normalizers
        .iter()
        .fold(value, |value, normalizer| normalizer.apply(value))
}

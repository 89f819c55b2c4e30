use std::any::Any;

use uuid::Uuid;

use super::RecordKind;
use crate::encoder::{FieldValue, Record};

/// US state a location sits in. Looked up by abbreviation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct State {
    pub id: Uuid,
    pub name: String,
    pub abbreviation: String,
}

/// Review status of a presentation.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Status {
    pub id: Uuid,
    pub name: String,
}

pub const STATUS_SUBMITTED: &str = "SUBMITTED";
pub const STATUS_APPROVED: &str = "APPROVED";
pub const STATUS_REJECTED: &str = "REJECTED";

pub const STATUSES: &[&str] = &[STATUS_SUBMITTED, STATUS_APPROVED, STATUS_REJECTED];

/// (name, abbreviation) pairs seeded into a fresh store.
pub const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

impl Record for State {
    fn kind(&self) -> RecordKind {
        RecordKind::State
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "name" => FieldValue::text(&self.name),
            "abbreviation" => FieldValue::text(&self.abbreviation),
            _ => return None,
        })
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Record for Status {
    fn kind(&self) -> RecordKind {
        RecordKind::Status
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "name" => FieldValue::text(&self.name),
            _ => return None,
        })
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

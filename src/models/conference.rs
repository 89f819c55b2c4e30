use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Location, RecordKind};
use crate::encoder::{FieldValue, HasCanonicalUrl, Record};

/// Conference record, hydrated with its location
#[derive(Debug, Clone, PartialEq)]
pub struct Conference {
    pub id: Uuid,
    pub name: String,
    pub starts: DateTime<Utc>,
    pub ends: DateTime<Utc>,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub max_presentations: i32,
    pub max_attendees: i32,
    pub location: Location,
}

/// Request model for creating a new conference
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateConference {
    pub name: String,
    pub starts: DateTime<Utc>,
    pub ends: DateTime<Utc>,
    pub description: String,
    pub max_presentations: i32,
    pub max_attendees: i32,
    /// ID of the hosting location
    pub location: Uuid,
}

/// Request model for updating a conference
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateConference {
    pub name: Option<String>,
    pub starts: Option<DateTime<Utc>>,
    pub ends: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub max_presentations: Option<i32>,
    pub max_attendees: Option<i32>,
    /// ID of the hosting location
    pub location: Option<Uuid>,
}

impl HasCanonicalUrl for Conference {
    fn canonical_url(&self) -> String {
        format!("/api/conferences/{}", self.id)
    }
}

impl Record for Conference {
    fn kind(&self) -> RecordKind {
        RecordKind::Conference
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "name" => FieldValue::text(&self.name),
            "starts" => self.starts.into(),
            "ends" => self.ends.into(),
            "description" => FieldValue::text(&self.description),
            "created" => self.created.into(),
            "updated" => self.updated.into(),
            "max_presentations" => self.max_presentations.into(),
            "max_attendees" => self.max_attendees.into(),
            "location" => FieldValue::Reference(&self.location),
            _ => return None,
        })
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn canonical(&self) -> Option<&dyn HasCanonicalUrl> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Conference, RecordKind};
use crate::encoder::{FieldValue, HasCanonicalUrl, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct Attendee {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
    pub created: DateTime<Utc>,
    pub conference: Conference,
}

/// Request model for registering an attendee; the conference comes from the path
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAttendee {
    pub email: String,
    pub name: String,
    pub company_name: Option<String>,
}

/// Request model for updating an attendee
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAttendee {
    pub email: Option<String>,
    pub name: Option<String>,
    /// `null` clears the company; omit the field to keep it
    #[serde(default, deserialize_with = "super::deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub company_name: Option<Option<String>>,
}

impl HasCanonicalUrl for Attendee {
    fn canonical_url(&self) -> String {
        format!("/api/attendees/{}", self.id)
    }
}

impl Record for Attendee {
    fn kind(&self) -> RecordKind {
        RecordKind::Attendee
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "email" => FieldValue::text(&self.email),
            "name" => FieldValue::text(&self.name),
            "company_name" => FieldValue::optional_text(self.company_name.as_deref()),
            "created" => self.created.into(),
            "conference" => FieldValue::Reference(&self.conference),
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

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Conference, RecordKind, Status};
use crate::encoder::{FieldValue, HasCanonicalUrl, Record};

/// Talk submitted to a conference
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub id: Uuid,
    pub presenter_name: String,
    pub company_name: Option<String>,
    pub presenter_email: String,
    pub title: String,
    pub synopsis: String,
    pub created: DateTime<Utc>,
    pub status: Status,
    pub conference: Conference,
}

/// Request model for submitting a presentation; the conference comes from the path
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePresentation {
    pub presenter_name: String,
    pub company_name: Option<String>,
    pub presenter_email: String,
    pub title: String,
    pub synopsis: String,
}

/// Request model for updating a presentation. Status changes go through approval/rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePresentation {
    pub presenter_name: Option<String>,
    /// `null` clears the company; omit the field to keep it
    #[serde(default, deserialize_with = "super::deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub company_name: Option<Option<String>>,
    pub presenter_email: Option<String>,
    pub title: Option<String>,
    pub synopsis: Option<String>,
}

impl HasCanonicalUrl for Presentation {
    fn canonical_url(&self) -> String {
        format!("/api/presentations/{}", self.id)
    }
}

impl Record for Presentation {
    fn kind(&self) -> RecordKind {
        RecordKind::Presentation
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "presenter_name" => FieldValue::text(&self.presenter_name),
            "company_name" => FieldValue::optional_text(self.company_name.as_deref()),
            "presenter_email" => FieldValue::text(&self.presenter_email),
            "title" => FieldValue::text(&self.title),
            "synopsis" => FieldValue::text(&self.synopsis),
            "created" => self.created.into(),
            "status" => FieldValue::Reference(&self.status),
            "conference" => FieldValue::Reference(&self.conference),
            _ => return None,
        })
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn canonical(&self) -> Option<&dyn HasCanonicalUrl> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Conference, RecordKind, State};
use crate::encoder::{FieldValue, HasCanonicalUrl, Record};

/// Venue that hosts conferences
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub room_count: i32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub state: State,
    /// Picture of the city, resolved from the image search when the location is saved
    pub image_url: Option<String>,
    /// Conferences held here. Only filled in by detail lookups.
    pub conferences: Vec<Conference>,
}

/// Request model for creating a location
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLocation {
    pub name: String,
    pub city: String,
    pub room_count: i32,
    /// Two-letter state abbreviation (e.g., PA)
    pub state: String,
}

/// Request model for updating a location
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub city: Option<String>,
    pub room_count: Option<i32>,
    /// Two-letter state abbreviation (e.g., PA)
    pub state: Option<String>,
}

/// Location insert with the state already resolved
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub city: String,
    pub room_count: i32,
    pub state_id: Uuid,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocationChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub room_count: Option<i32>,
    pub state_id: Option<Uuid>,
    /// `Some(None)` clears the picture.
    pub image_url: Option<Option<String>>,
}

impl HasCanonicalUrl for Location {
    fn canonical_url(&self) -> String {
        format!("/api/locations/{}", self.id)
    }
}

impl Record for Location {
    fn kind(&self) -> RecordKind {
        RecordKind::Location
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::uuid(self.id),
            "name" => FieldValue::text(&self.name),
            "city" => FieldValue::text(&self.city),
            "room_count" => self.room_count.into(),
            "created" => self.created.into(),
            "updated" => self.updated.into(),
            "state" => FieldValue::Reference(&self.state),
            "image_url" => FieldValue::optional_text(self.image_url.as_deref()),
            "conferences" => FieldValue::records(&self.conferences),
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

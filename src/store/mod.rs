//! Record persistence.
//!
//! Handlers talk to a [`Store`]; records come back fully hydrated (a
//! conference carries its location, which carries its state).

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Attendee, Conference, CreateAttendee, CreateConference, CreatePresentation, Location,
    LocationChanges, NewLocation, Presentation, RecordKind, State, Status, UpdateAttendee,
    UpdateConference, UpdatePresentation,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: RecordKind, key: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn not_found(kind: RecordKind, key: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn list_states(&self) -> Result<Vec<State>, StoreError>;

    /// Case-insensitive lookup by two-letter abbreviation.
    async fn find_state(&self, abbreviation: &str) -> Result<State, StoreError>;

    async fn find_status(&self, name: &str) -> Result<Status, StoreError>;

    /// All locations ordered by name, without their conferences.
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError>;

    /// A location with the conferences held there.
    async fn get_location(&self, id: Uuid) -> Result<Location, StoreError>;

    async fn create_location(&self, new: NewLocation) -> Result<Location, StoreError>;

    async fn update_location(
        &self,
        id: Uuid,
        changes: LocationChanges,
    ) -> Result<Location, StoreError>;

    /// Deletes the location and, by cascade, its conferences.
    async fn delete_location(&self, id: Uuid) -> Result<u64, StoreError>;

    /// All conferences ordered by start time, then name.
    async fn list_conferences(&self) -> Result<Vec<Conference>, StoreError>;

    async fn get_conference(&self, id: Uuid) -> Result<Conference, StoreError>;

    async fn create_conference(&self, new: CreateConference) -> Result<Conference, StoreError>;

    async fn update_conference(
        &self,
        id: Uuid,
        changes: UpdateConference,
    ) -> Result<Conference, StoreError>;

    async fn delete_conference(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn list_attendees(&self, conference_id: Uuid) -> Result<Vec<Attendee>, StoreError>;

    async fn get_attendee(&self, id: Uuid) -> Result<Attendee, StoreError>;

    async fn create_attendee(
        &self,
        conference_id: Uuid,
        new: CreateAttendee,
    ) -> Result<Attendee, StoreError>;

    async fn update_attendee(
        &self,
        id: Uuid,
        changes: UpdateAttendee,
    ) -> Result<Attendee, StoreError>;

    async fn delete_attendee(&self, id: Uuid) -> Result<u64, StoreError>;

    async fn list_presentations(
        &self,
        conference_id: Uuid,
    ) -> Result<Vec<Presentation>, StoreError>;

    async fn get_presentation(&self, id: Uuid) -> Result<Presentation, StoreError>;

    /// New presentations start out as SUBMITTED.
    async fn create_presentation(
        &self,
        conference_id: Uuid,
        new: CreatePresentation,
    ) -> Result<Presentation, StoreError>;

    async fn update_presentation(
        &self,
        id: Uuid,
        changes: UpdatePresentation,
    ) -> Result<Presentation, StoreError>;

    async fn set_presentation_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Presentation, StoreError>;

    async fn delete_presentation(&self, id: Uuid) -> Result<u64, StoreError>;
}

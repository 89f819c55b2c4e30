use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    Attendee, Conference, CreateAttendee, CreateConference, CreatePresentation, Location,
    LocationChanges, NewLocation, Presentation, RecordKind, State, Status, UpdateAttendee,
    UpdateConference, UpdatePresentation, STATUSES, STATUS_SUBMITTED, US_STATES,
};

/// In-process store with the same relational behavior as [`super::PgStore`].
///
/// Used when no database is configured, and by the HTTP tests.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

struct LocationRow {
    id: Uuid,
    name: String,
    city: String,
    room_count: i32,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    state_id: Uuid,
    image_url: Option<String>,
}

struct ConferenceRow {
    id: Uuid,
    name: String,
    starts: DateTime<Utc>,
    ends: DateTime<Utc>,
    description: String,
    created: DateTime<Utc>,
    updated: DateTime<Utc>,
    max_presentations: i32,
    max_attendees: i32,
    location_id: Uuid,
}

struct AttendeeRow {
    id: Uuid,
    email: String,
    name: String,
    company_name: Option<String>,
    created: DateTime<Utc>,
    conference_id: Uuid,
}

struct PresentationRow {
    id: Uuid,
    presenter_name: String,
    company_name: Option<String>,
    presenter_email: String,
    title: String,
    synopsis: String,
    created: DateTime<Utc>,
    status_id: Uuid,
    conference_id: Uuid,
}

#[derive(Default)]
struct Tables {
    states: Vec<State>,
    statuses: Vec<Status>,
    locations: HashMap<Uuid, LocationRow>,
    conferences: HashMap<Uuid, ConferenceRow>,
    attendees: HashMap<Uuid, AttendeeRow>,
    presentations: HashMap<Uuid, PresentationRow>,
}

impl Tables {
    fn state(&self, id: Uuid) -> Result<State, StoreError> {
        self.states
            .iter()
            .find(|state| state.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::State, id))
    }

    fn status(&self, id: Uuid) -> Result<Status, StoreError> {
        self.statuses
            .iter()
            .find(|status| status.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Status, id))
    }

    fn status_named(&self, name: &str) -> Result<Status, StoreError> {
        self.statuses
            .iter()
            .find(|status| status.name == name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::Status, name))
    }

    fn location(&self, id: Uuid) -> Result<Location, StoreError> {
        let row = self
            .locations
            .get(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Location, id))?;
        Ok(Location {
            id: row.id,
            name: row.name.clone(),
            city: row.city.clone(),
            room_count: row.room_count,
            created: row.created,
            updated: row.updated,
            state: self.state(row.state_id)?,
            image_url: row.image_url.clone(),
            conferences: Vec::new(),
        })
    }

    fn conference(&self, id: Uuid) -> Result<Conference, StoreError> {
        let row = self
            .conferences
            .get(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Conference, id))?;
        Ok(Conference {
            id: row.id,
            name: row.name.clone(),
            starts: row.starts,
            ends: row.ends,
            description: row.description.clone(),
            created: row.created,
            updated: row.updated,
            max_presentations: row.max_presentations,
            max_attendees: row.max_attendees,
            location: self.location(row.location_id)?,
        })
    }

    fn attendee(&self, id: Uuid) -> Result<Attendee, StoreError> {
        let row = self
            .attendees
            .get(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Attendee, id))?;
        Ok(Attendee {
            id: row.id,
            email: row.email.clone(),
            name: row.name.clone(),
            company_name: row.company_name.clone(),
            created: row.created,
            conference: self.conference(row.conference_id)?,
        })
    }

    fn presentation(&self, id: Uuid) -> Result<Presentation, StoreError> {
        let row = self
            .presentations
            .get(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Presentation, id))?;
        Ok(Presentation {
            id: row.id,
            presenter_name: row.presenter_name.clone(),
            company_name: row.company_name.clone(),
            presenter_email: row.presenter_email.clone(),
            title: row.title.clone(),
            synopsis: row.synopsis.clone(),
            created: row.created,
            status: self.status(row.status_id)?,
            conference: self.conference(row.conference_id)?,
        })
    }

    fn conferences_at(&self, location_id: Uuid) -> Result<Vec<Conference>, StoreError> {
        let mut conferences = self
            .conferences
            .values()
            .filter(|row| row.location_id == location_id)
            .map(|row| self.conference(row.id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_conferences(&mut conferences);
        Ok(conferences)
    }

    /// Removes a conference and everything registered against it.
    fn remove_conference(&mut self, id: Uuid) -> u64 {
        if self.conferences.remove(&id).is_none() {
            return 0;
        }
        self.attendees.retain(|_, row| row.conference_id != id);
        self.presentations.retain(|_, row| row.conference_id != id);
        1
    }
}

fn sort_conferences(conferences: &mut [Conference]) {
    conferences.sort_by(|a, b| {
        a.starts
            .cmp(&b.starts)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl MemoryStore {
    /// A store seeded with US states and presentation statuses.
    pub fn new() -> Self {
        let tables = Tables {
            states: US_STATES
                .iter()
                .map(|(name, abbreviation)| State {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    abbreviation: abbreviation.to_string(),
                })
                .collect(),
            statuses: STATUSES
                .iter()
                .map(|name| Status {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                })
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_states(&self) -> Result<Vec<State>, StoreError> {
        let tables = self.tables.read().await;
        let mut states = tables.states.clone();
        states.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(states)
    }

    async fn find_state(&self, abbreviation: &str) -> Result<State, StoreError> {
        let tables = self.tables.read().await;
        tables
            .states
            .iter()
            .find(|state| state.abbreviation.eq_ignore_ascii_case(abbreviation))
            .cloned()
            .ok_or_else(|| StoreError::not_found(RecordKind::State, abbreviation))
    }

    async fn find_status(&self, name: &str) -> Result<Status, StoreError> {
        self.tables.read().await.status_named(name)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        let tables = self.tables.read().await;
        let mut locations = tables
            .locations
            .keys()
            .map(|id| tables.location(*id))
            .collect::<Result<Vec<_>, _>>()?;
        locations.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(locations)
    }

    async fn get_location(&self, id: Uuid) -> Result<Location, StoreError> {
        let tables = self.tables.read().await;
        let mut location = tables.location(id)?;
        location.conferences = tables.conferences_at(id)?;
        Ok(location)
    }

    async fn create_location(&self, new: NewLocation) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;
        tables.state(new.state_id)?;
        let now = Utc::now();
        let id = Uuid::new_v4();
        tables.locations.insert(
            id,
            LocationRow {
                id,
                name: new.name,
                city: new.city,
                room_count: new.room_count,
                created: now,
                updated: now,
                state_id: new.state_id,
                image_url: new.image_url,
            },
        );
        tables.location(id)
    }

    async fn update_location(
        &self,
        id: Uuid,
        changes: LocationChanges,
    ) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(state_id) = changes.state_id {
            tables.state(state_id)?;
        }
        let row = tables
            .locations
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Location, id))?;
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(city) = changes.city {
            row.city = city;
        }
        if let Some(room_count) = changes.room_count {
            row.room_count = room_count;
        }
        if let Some(state_id) = changes.state_id {
            row.state_id = state_id;
        }
        if let Some(image_url) = changes.image_url {
            row.image_url = image_url;
        }
        row.updated = Utc::now();

        let mut location = tables.location(id)?;
        location.conferences = tables.conferences_at(id)?;
        Ok(location)
    }

    async fn delete_location(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.locations.remove(&id).is_none() {
            return Ok(0);
        }
        let hosted: Vec<Uuid> = tables
            .conferences
            .values()
            .filter(|row| row.location_id == id)
            .map(|row| row.id)
            .collect();
        for conference_id in hosted {
            tables.remove_conference(conference_id);
        }
        Ok(1)
    }

    async fn list_conferences(&self) -> Result<Vec<Conference>, StoreError> {
        let tables = self.tables.read().await;
        let mut conferences = tables
            .conferences
            .keys()
            .map(|id| tables.conference(*id))
            .collect::<Result<Vec<_>, _>>()?;
        sort_conferences(&mut conferences);
        Ok(conferences)
    }

    async fn get_conference(&self, id: Uuid) -> Result<Conference, StoreError> {
        self.tables.read().await.conference(id)
    }

    async fn create_conference(&self, new: CreateConference) -> Result<Conference, StoreError> {
        let mut tables = self.tables.write().await;
        tables.location(new.location)?;
        let now = Utc::now();
        let id = Uuid::new_v4();
        tables.conferences.insert(
            id,
            ConferenceRow {
                id,
                name: new.name,
                starts: new.starts,
                ends: new.ends,
                description: new.description,
                created: now,
                updated: now,
                max_presentations: new.max_presentations,
                max_attendees: new.max_attendees,
                location_id: new.location,
            },
        );
        tables.conference(id)
    }

    async fn update_conference(
        &self,
        id: Uuid,
        changes: UpdateConference,
    ) -> Result<Conference, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(location_id) = changes.location {
            tables.location(location_id)?;
        }
        let row = tables
            .conferences
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Conference, id))?;
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(starts) = changes.starts {
            row.starts = starts;
        }
        if let Some(ends) = changes.ends {
            row.ends = ends;
        }
        if let Some(description) = changes.description {
            row.description = description;
        }
        if let Some(max_presentations) = changes.max_presentations {
            row.max_presentations = max_presentations;
        }
        if let Some(max_attendees) = changes.max_attendees {
            row.max_attendees = max_attendees;
        }
        if let Some(location_id) = changes.location {
            row.location_id = location_id;
        }
        row.updated = Utc::now();
        tables.conference(id)
    }

    async fn delete_conference(&self, id: Uuid) -> Result<u64, StoreError> {
        Ok(self.tables.write().await.remove_conference(id))
    }

    async fn list_attendees(&self, conference_id: Uuid) -> Result<Vec<Attendee>, StoreError> {
        let tables = self.tables.read().await;
        let mut attendees = tables
            .attendees
            .values()
            .filter(|row| row.conference_id == conference_id)
            .map(|row| tables.attendee(row.id))
            .collect::<Result<Vec<_>, _>>()?;
        attendees.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(attendees)
    }

    async fn get_attendee(&self, id: Uuid) -> Result<Attendee, StoreError> {
        self.tables.read().await.attendee(id)
    }

    async fn create_attendee(
        &self,
        conference_id: Uuid,
        new: CreateAttendee,
    ) -> Result<Attendee, StoreError> {
        let mut tables = self.tables.write().await;
        tables.conference(conference_id)?;
        let id = Uuid::new_v4();
        tables.attendees.insert(
            id,
            AttendeeRow {
                id,
                email: new.email,
                name: new.name,
                company_name: new.company_name,
                created: Utc::now(),
                conference_id,
            },
        );
        tables.attendee(id)
    }

    async fn update_attendee(
        &self,
        id: Uuid,
        changes: UpdateAttendee,
    ) -> Result<Attendee, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .attendees
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Attendee, id))?;
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(name) = changes.name {
            row.name = name;
        }
        if let Some(company_name) = changes.company_name {
            row.company_name = company_name;
        }
        tables.attendee(id)
    }

    async fn delete_attendee(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(u64::from(tables.attendees.remove(&id).is_some()))
    }

    async fn list_presentations(
        &self,
        conference_id: Uuid,
    ) -> Result<Vec<Presentation>, StoreError> {
        let tables = self.tables.read().await;
        let mut presentations = tables
            .presentations
            .values()
            .filter(|row| row.conference_id == conference_id)
            .map(|row| tables.presentation(row.id))
            .collect::<Result<Vec<_>, _>>()?;
        presentations.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(presentations)
    }

    async fn get_presentation(&self, id: Uuid) -> Result<Presentation, StoreError> {
        self.tables.read().await.presentation(id)
    }

    async fn create_presentation(
        &self,
        conference_id: Uuid,
        new: CreatePresentation,
    ) -> Result<Presentation, StoreError> {
        let mut tables = self.tables.write().await;
        tables.conference(conference_id)?;
        let status_id = tables.status_named(STATUS_SUBMITTED)?.id;
        let id = Uuid::new_v4();
        tables.presentations.insert(
            id,
            PresentationRow {
                id,
                presenter_name: new.presenter_name,
                company_name: new.company_name,
                presenter_email: new.presenter_email,
                title: new.title,
                synopsis: new.synopsis,
                created: Utc::now(),
                status_id,
                conference_id,
            },
        );
        tables.presentation(id)
    }

    async fn update_presentation(
        &self,
        id: Uuid,
        changes: UpdatePresentation,
    ) -> Result<Presentation, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .presentations
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Presentation, id))?;
        if let Some(presenter_name) = changes.presenter_name {
            row.presenter_name = presenter_name;
        }
        if let Some(company_name) = changes.company_name {
            row.company_name = company_name;
        }
        if let Some(presenter_email) = changes.presenter_email {
            row.presenter_email = presenter_email;
        }
        if let Some(title) = changes.title {
            row.title = title;
        }
        if let Some(synopsis) = changes.synopsis {
            row.synopsis = synopsis;
        }
        tables.presentation(id)
    }

    async fn set_presentation_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Presentation, StoreError> {
        let mut tables = self.tables.write().await;
        let status_id = tables.status_named(status)?.id;
        let row = tables
            .presentations
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(RecordKind::Presentation, id))?;
        row.status_id = status_id;
        tables.presentation(id)
    }

    async fn delete_presentation(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(u64::from(tables.presentations.remove(&id).is_some()))
    }
}

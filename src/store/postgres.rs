use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{
    Attendee, Conference, CreateAttendee, CreateConference, CreatePresentation, Location,
    LocationChanges, NewLocation, Presentation, RecordKind, State, Status, UpdateAttendee,
    UpdateConference, UpdatePresentation, STATUS_SUBMITTED,
};

const LOCATION_SELECT: &str = r#"
    SELECT
        l.id AS location_id, l.name AS location_name, l.city AS location_city,
        l.room_count AS location_room_count, l.created AS location_created,
        l.updated AS location_updated, l.image_url AS location_image_url,
        s.id AS state_id, s.name AS state_name, s.abbreviation AS state_abbreviation
    FROM locations l
    JOIN states s ON s.id = l.state_id
"#;

const CONFERENCE_SELECT: &str = r#"
    SELECT
        c.id AS conference_id, c.name AS conference_name, c.starts AS conference_starts,
        c.ends AS conference_ends, c.description AS conference_description,
        c.created AS conference_created, c.updated AS conference_updated,
        c.max_presentations AS conference_max_presentations,
        c.max_attendees AS conference_max_attendees,
        l.id AS location_id, l.name AS location_name, l.city AS location_city,
        l.room_count AS location_room_count, l.created AS location_created,
        l.updated AS location_updated, l.image_url AS location_image_url,
        s.id AS state_id, s.name AS state_name, s.abbreviation AS state_abbreviation
    FROM conferences c
    JOIN locations l ON l.id = c.location_id
    JOIN states s ON s.id = l.state_id
"#;

const ATTENDEE_SELECT: &str = r#"
    SELECT
        a.id AS attendee_id, a.email AS attendee_email, a.name AS attendee_name,
        a.company_name AS attendee_company_name, a.created AS attendee_created,
        c.id AS conference_id, c.name AS conference_name, c.starts AS conference_starts,
        c.ends AS conference_ends, c.description AS conference_description,
        c.created AS conference_created, c.updated AS conference_updated,
        c.max_presentations AS conference_max_presentations,
        c.max_attendees AS conference_max_attendees,
        l.id AS location_id, l.name AS location_name, l.city AS location_city,
        l.room_count AS location_room_count, l.created AS location_created,
        l.updated AS location_updated, l.image_url AS location_image_url,
        s.id AS state_id, s.name AS state_name, s.abbreviation AS state_abbreviation
    FROM attendees a
    JOIN conferences c ON c.id = a.conference_id
    JOIN locations l ON l.id = c.location_id
    JOIN states s ON s.id = l.state_id
"#;

const PRESENTATION_SELECT: &str = r#"
    SELECT
        p.id AS presentation_id, p.presenter_name AS presentation_presenter_name,
        p.company_name AS presentation_company_name,
        p.presenter_email AS presentation_presenter_email,
        p.title AS presentation_title, p.synopsis AS presentation_synopsis,
        p.created AS presentation_created,
        st.id AS status_id, st.name AS status_name,
        c.id AS conference_id, c.name AS conference_name, c.starts AS conference_starts,
        c.ends AS conference_ends, c.description AS conference_description,
        c.created AS conference_created, c.updated AS conference_updated,
        c.max_presentations AS conference_max_presentations,
        c.max_attendees AS conference_max_attendees,
        l.id AS location_id, l.name AS location_name, l.city AS location_city,
        l.room_count AS location_room_count, l.created AS location_created,
        l.updated AS location_updated, l.image_url AS location_image_url,
        s.id AS state_id, s.name AS state_name, s.abbreviation AS state_abbreviation
    FROM presentations p
    JOIN statuses st ON st.id = p.status_id
    JOIN conferences c ON c.id = p.conference_id
    JOIN locations l ON l.id = c.location_id
    JOIN states s ON s.id = l.state_id
"#;

fn state_from_row(row: &PgRow) -> Result<State, sqlx::Error> {
    Ok(State {
        id: row.try_get("state_id")?,
        name: row.try_get("state_name")?,
        abbreviation: row.try_get("state_abbreviation")?,
    })
}

fn location_from_row(row: &PgRow) -> Result<Location, sqlx::Error> {
    Ok(Location {
        id: row.try_get("location_id")?,
        name: row.try_get("location_name")?,
        city: row.try_get("location_city")?,
        room_count: row.try_get("location_room_count")?,
        created: row.try_get("location_created")?,
        updated: row.try_get("location_updated")?,
        state: state_from_row(row)?,
        image_url: row.try_get("location_image_url")?,
        conferences: Vec::new(),
    })
}

fn conference_from_row(row: &PgRow) -> Result<Conference, sqlx::Error> {
    Ok(Conference {
        id: row.try_get("conference_id")?,
        name: row.try_get("conference_name")?,
        starts: row.try_get("conference_starts")?,
        ends: row.try_get("conference_ends")?,
        description: row.try_get("conference_description")?,
        created: row.try_get("conference_created")?,
        updated: row.try_get("conference_updated")?,
        max_presentations: row.try_get("conference_max_presentations")?,
        max_attendees: row.try_get("conference_max_attendees")?,
        location: location_from_row(row)?,
    })
}

fn attendee_from_row(row: &PgRow) -> Result<Attendee, sqlx::Error> {
    Ok(Attendee {
        id: row.try_get("attendee_id")?,
        email: row.try_get("attendee_email")?,
        name: row.try_get("attendee_name")?,
        company_name: row.try_get("attendee_company_name")?,
        created: row.try_get("attendee_created")?,
        conference: conference_from_row(row)?,
    })
}

fn presentation_from_row(row: &PgRow) -> Result<Presentation, sqlx::Error> {
    Ok(Presentation {
        id: row.try_get("presentation_id")?,
        presenter_name: row.try_get("presentation_presenter_name")?,
        company_name: row.try_get("presentation_company_name")?,
        presenter_email: row.try_get("presentation_presenter_email")?,
        title: row.try_get("presentation_title")?,
        synopsis: row.try_get("presentation_synopsis")?,
        created: row.try_get("presentation_created")?,
        status: Status {
            id: row.try_get("status_id")?,
            name: row.try_get("status_name")?,
        },
        conference: conference_from_row(row)?,
    })
}

/// Postgres-backed store. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!(max_connections, "Connected to Postgres");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_states(&self) -> Result<Vec<State>, StoreError> {
        let states = sqlx::query_as::<_, State>(
            "SELECT id, name, abbreviation FROM states ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(states)
    }

    async fn find_state(&self, abbreviation: &str) -> Result<State, StoreError> {
        sqlx::query_as::<_, State>(
            "SELECT id, name, abbreviation FROM states WHERE abbreviation = UPPER($1)",
        )
        .bind(abbreviation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(RecordKind::State, abbreviation))
    }

    async fn find_status(&self, name: &str) -> Result<Status, StoreError> {
        sqlx::query_as::<_, Status>("SELECT id, name FROM statuses WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Status, name))
    }

    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        let rows = sqlx::query(&format!("{LOCATION_SELECT} ORDER BY l.name, l.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(location_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_location(&self, id: Uuid) -> Result<Location, StoreError> {
        let row = sqlx::query(&format!("{LOCATION_SELECT} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Location, id))?;
        let mut location = location_from_row(&row)?;

        let rows = sqlx::query(&format!(
            "{CONFERENCE_SELECT} WHERE c.location_id = $1 ORDER BY c.starts, c.name, c.id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        location.conferences = rows
            .iter()
            .map(conference_from_row)
            .collect::<Result<_, _>>()?;

        Ok(location)
    }

    async fn create_location(&self, new: NewLocation) -> Result<Location, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO locations (name, city, room_count, state_id, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.city)
        .bind(new.room_count)
        .bind(new.state_id)
        .bind(&new.image_url)
        .fetch_one(&self.pool)
        .await?;

        self.get_location(id).await
    }

    async fn update_location(
        &self,
        id: Uuid,
        changes: LocationChanges,
    ) -> Result<Location, StoreError> {
        let existing = self.get_location(id).await?;

        sqlx::query(
            r#"
            UPDATE locations
            SET name = $1, city = $2, room_count = $3, state_id = $4, image_url = $5,
                updated = NOW()
            WHERE id = $6
            "#,
        )
        .bind(changes.name.unwrap_or(existing.name))
        .bind(changes.city.unwrap_or(existing.city))
        .bind(changes.room_count.unwrap_or(existing.room_count))
        .bind(changes.state_id.unwrap_or(existing.state.id))
        .bind(changes.image_url.unwrap_or(existing.image_url))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_location(id).await
    }

    async fn delete_location(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_conferences(&self) -> Result<Vec<Conference>, StoreError> {
        let rows = sqlx::query(&format!("{CONFERENCE_SELECT} ORDER BY c.starts, c.name, c.id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(conference_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_conference(&self, id: Uuid) -> Result<Conference, StoreError> {
        let row = sqlx::query(&format!("{CONFERENCE_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Conference, id))?;
        Ok(conference_from_row(&row)?)
    }

    async fn create_conference(&self, new: CreateConference) -> Result<Conference, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO conferences (
                name, starts, ends, description,
                max_presentations, max_attendees, location_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(new.starts)
        .bind(new.ends)
        .bind(&new.description)
        .bind(new.max_presentations)
        .bind(new.max_attendees)
        .bind(new.location)
        .fetch_one(&self.pool)
        .await?;

        self.get_conference(id).await
    }

    async fn update_conference(
        &self,
        id: Uuid,
        changes: UpdateConference,
    ) -> Result<Conference, StoreError> {
        let existing = self.get_conference(id).await?;

        sqlx::query(
            r#"
            UPDATE conferences
            SET name = $1, starts = $2, ends = $3, description = $4,
                max_presentations = $5, max_attendees = $6, location_id = $7,
                updated = NOW()
            WHERE id = $8
            "#,
        )
        .bind(changes.name.unwrap_or(existing.name))
        .bind(changes.starts.unwrap_or(existing.starts))
        .bind(changes.ends.unwrap_or(existing.ends))
        .bind(changes.description.unwrap_or(existing.description))
        .bind(changes.max_presentations.unwrap_or(existing.max_presentations))
        .bind(changes.max_attendees.unwrap_or(existing.max_attendees))
        .bind(changes.location.unwrap_or(existing.location.id))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_conference(id).await
    }

    async fn delete_conference(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM conferences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_attendees(&self, conference_id: Uuid) -> Result<Vec<Attendee>, StoreError> {
        let rows = sqlx::query(&format!(
            "{ATTENDEE_SELECT} WHERE a.conference_id = $1 ORDER BY a.name, a.id"
        ))
        .bind(conference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(attendee_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_attendee(&self, id: Uuid) -> Result<Attendee, StoreError> {
        let row = sqlx::query(&format!("{ATTENDEE_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Attendee, id))?;
        Ok(attendee_from_row(&row)?)
    }

    async fn create_attendee(
        &self,
        conference_id: Uuid,
        new: CreateAttendee,
    ) -> Result<Attendee, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO attendees (email, name, company_name, conference_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.company_name)
        .bind(conference_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_attendee(id).await
    }

    async fn update_attendee(
        &self,
        id: Uuid,
        changes: UpdateAttendee,
    ) -> Result<Attendee, StoreError> {
        let existing = self.get_attendee(id).await?;

        sqlx::query("UPDATE attendees SET email = $1, name = $2, company_name = $3 WHERE id = $4")
            .bind(changes.email.unwrap_or(existing.email))
            .bind(changes.name.unwrap_or(existing.name))
            .bind(changes.company_name.unwrap_or(existing.company_name))
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.get_attendee(id).await
    }

    async fn delete_attendee(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_presentations(
        &self,
        conference_id: Uuid,
    ) -> Result<Vec<Presentation>, StoreError> {
        let rows = sqlx::query(&format!(
            "{PRESENTATION_SELECT} WHERE p.conference_id = $1 ORDER BY p.title, p.id"
        ))
        .bind(conference_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(presentation_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_presentation(&self, id: Uuid) -> Result<Presentation, StoreError> {
        let row = sqlx::query(&format!("{PRESENTATION_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found(RecordKind::Presentation, id))?;
        Ok(presentation_from_row(&row)?)
    }

    async fn create_presentation(
        &self,
        conference_id: Uuid,
        new: CreatePresentation,
    ) -> Result<Presentation, StoreError> {
        let submitted = self.find_status(STATUS_SUBMITTED).await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO presentations (
                presenter_name, company_name, presenter_email,
                title, synopsis, status_id, conference_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&new.presenter_name)
        .bind(&new.company_name)
        .bind(&new.presenter_email)
        .bind(&new.title)
        .bind(&new.synopsis)
        .bind(submitted.id)
        .bind(conference_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_presentation(id).await
    }

    async fn update_presentation(
        &self,
        id: Uuid,
        changes: UpdatePresentation,
    ) -> Result<Presentation, StoreError> {
        let existing = self.get_presentation(id).await?;

        sqlx::query(
            r#"
            UPDATE presentations
            SET presenter_name = $1, company_name = $2, presenter_email = $3,
                title = $4, synopsis = $5
            WHERE id = $6
            "#,
        )
        .bind(changes.presenter_name.unwrap_or(existing.presenter_name))
        .bind(changes.company_name.unwrap_or(existing.company_name))
        .bind(changes.presenter_email.unwrap_or(existing.presenter_email))
        .bind(changes.title.unwrap_or(existing.title))
        .bind(changes.synopsis.unwrap_or(existing.synopsis))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_presentation(id).await
    }

    async fn set_presentation_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Presentation, StoreError> {
        let status = self.find_status(status).await?;

        let result = sqlx::query("UPDATE presentations SET status_id = $1 WHERE id = $2")
            .bind(status.id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(RecordKind::Presentation, id));
        }

        self.get_presentation(id).await
    }

    async fn delete_presentation(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM presentations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

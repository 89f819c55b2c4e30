pub mod attendee;
pub mod conference;
pub mod kind;
pub mod location;
pub mod presentation;
pub mod state;

pub use attendee::*;
pub use conference::*;
pub use kind::*;
pub use location::*;
pub use presentation::*;
pub use state::*;

use serde::{Deserialize, Deserializer};

/// Keeps an explicit `null` apart from a missing field: a missing field stays
/// `None` through `#[serde(default)]`, while `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Record;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn location() -> Location {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        Location {
            id: Uuid::new_v4(),
            name: "Hall A".to_string(),
            city: "Philadelphia".to_string(),
            room_count: 12,
            created: at,
            updated: at,
            state: State {
                id: Uuid::new_v4(),
                name: "Pennsylvania".to_string(),
                abbreviation: "PA".to_string(),
            },
            image_url: None,
            conferences: Vec::new(),
        }
    }

    fn conference() -> Conference {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        Conference {
            id: Uuid::new_v4(),
            name: "RustConf".to_string(),
            starts: at,
            ends: at,
            description: "Talks".to_string(),
            created: at,
            updated: at,
            max_presentations: 40,
            max_attendees: 900,
            location: location(),
        }
    }

    fn assert_schema_covered(record: &dyn Record) {
        for def in record.kind().fields() {
            assert!(
                record.field(def.name).is_some(),
                "{} does not expose {}",
                record.kind(),
                def.name
            );
        }
        assert!(record.field("not_a_field").is_none());
    }

    #[test]
    fn test_every_declared_field_is_readable() {
        let conference = conference();
        let attendee = Attendee {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            company_name: None,
            created: conference.created,
            conference: conference.clone(),
        };
        let presentation = Presentation {
            id: Uuid::new_v4(),
            presenter_name: "Grace".to_string(),
            company_name: Some("Navy".to_string()),
            presenter_email: "grace@example.com".to_string(),
            title: "Compilers".to_string(),
            synopsis: "A talk".to_string(),
            created: conference.created,
            status: Status {
                id: Uuid::new_v4(),
                name: STATUS_SUBMITTED.to_string(),
            },
            conference: conference.clone(),
        };

        assert_schema_covered(&conference.location);
        assert_schema_covered(&conference);
        assert_schema_covered(&attendee);
        assert_schema_covered(&presentation);
    }

    #[test]
    fn test_update_company_name_is_tri_state() {
        let absent: UpdateAttendee = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert_eq!(absent.company_name, None);

        let cleared: UpdateAttendee = serde_json::from_str(r#"{"company_name": null}"#).unwrap();
        assert_eq!(cleared.company_name, Some(None));

        let set: UpdatePresentation =
            serde_json::from_str(r#"{"company_name": "Acme"}"#).unwrap();
        assert_eq!(set.company_name, Some(Some("Acme".to_string())));
    }

    #[test]
    fn test_canonical_urls() {
        let conference = conference();
        let href = conference.canonical().map(|c| c.canonical_url());
        assert_eq!(href, Some(format!("/api/conferences/{}", conference.id)));
        let href = conference.location.canonical().map(|c| c.canonical_url());
        assert_eq!(href, Some(format!("/api/locations/{}", conference.location.id)));
    }
}

use std::fmt;

/// The record kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    State,
    Status,
    Location,
    Conference,
    Attendee,
    Presentation,
}

/// Shape of a single record field, as seen by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar,
    Timestamp,
    Reference(RecordKind),
    Collection(RecordKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn scalar(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::Scalar }
}

const fn timestamp(name: &'static str) -> FieldDef {
    FieldDef { name, kind: FieldKind::Timestamp }
}

const fn reference(name: &'static str, target: RecordKind) -> FieldDef {
    FieldDef { name, kind: FieldKind::Reference(target) }
}

const fn collection(name: &'static str, target: RecordKind) -> FieldDef {
    FieldDef { name, kind: FieldKind::Collection(target) }
}

const STATE_FIELDS: &[FieldDef] = &[scalar("id"), scalar("name"), scalar("abbreviation")];

const STATUS_FIELDS: &[FieldDef] = &[scalar("id"), scalar("name")];

const LOCATION_FIELDS: &[FieldDef] = &[
    scalar("id"),
    scalar("name"),
    scalar("city"),
    scalar("room_count"),
    timestamp("created"),
    timestamp("updated"),
    reference("state", RecordKind::State),
    scalar("image_url"),
    collection("conferences", RecordKind::Conference),
];

const CONFERENCE_FIELDS: &[FieldDef] = &[
    scalar("id"),
    scalar("name"),
    timestamp("starts"),
    timestamp("ends"),
    scalar("description"),
    timestamp("created"),
    timestamp("updated"),
    scalar("max_presentations"),
    scalar("max_attendees"),
    reference("location", RecordKind::Location),
];

const ATTENDEE_FIELDS: &[FieldDef] = &[
    scalar("id"),
    scalar("email"),
    scalar("name"),
    scalar("company_name"),
    timestamp("created"),
    reference("conference", RecordKind::Conference),
];

const PRESENTATION_FIELDS: &[FieldDef] = &[
    scalar("id"),
    scalar("presenter_name"),
    scalar("company_name"),
    scalar("presenter_email"),
    scalar("title"),
    scalar("synopsis"),
    timestamp("created"),
    reference("status", RecordKind::Status),
    reference("conference", RecordKind::Conference),
];

impl RecordKind {
    /// Declared fields of this kind, in declaration order.
    pub const fn fields(self) -> &'static [FieldDef] {
        match self {
            RecordKind::State => STATE_FIELDS,
            RecordKind::Status => STATUS_FIELDS,
            RecordKind::Location => LOCATION_FIELDS,
            RecordKind::Conference => CONFERENCE_FIELDS,
            RecordKind::Attendee => ATTENDEE_FIELDS,
            RecordKind::Presentation => PRESENTATION_FIELDS,
        }
    }

    pub fn field(self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|def| def.name == name)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::State => "State",
            RecordKind::Status => "Status",
            RecordKind::Location => "Location",
            RecordKind::Conference => "Conference",
            RecordKind::Attendee => "Attendee",
            RecordKind::Presentation => "Presentation",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup() {
        assert_eq!(
            RecordKind::Location.field("state").map(|def| def.kind),
            Some(FieldKind::Reference(RecordKind::State))
        );
        assert_eq!(
            RecordKind::Conference.field("starts").map(|def| def.kind),
            Some(FieldKind::Timestamp)
        );
        assert!(RecordKind::Attendee.field("title").is_none());
    }

    #[test]
    fn test_field_names_are_unique() {
        for kind in [
            RecordKind::State,
            RecordKind::Status,
            RecordKind::Location,
            RecordKind::Conference,
            RecordKind::Attendee,
            RecordKind::Presentation,
        ] {
            let fields = kind.fields();
            for (i, def) in fields.iter().enumerate() {
                assert!(
                    fields[i + 1..].iter().all(|other| other.name != def.name),
                    "{} declares {} twice",
                    kind,
                    def.name
                );
            }
        }
    }
}

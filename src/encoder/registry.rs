use std::sync::Arc;

use serde_json::{Map, Value};

use super::{Encodable, EncodeError, Encoder, EncoderSpec, Record, SpecError};
use crate::models::{Location, Presentation, RecordKind};

/// Every resource encoder the API uses, built once at startup.
#[derive(Debug)]
pub struct Encoders {
    encoder: Encoder,
    pub state_list: Arc<EncoderSpec>,
    pub location_list: Arc<EncoderSpec>,
    pub location_detail: Arc<EncoderSpec>,
    pub conference_list: Arc<EncoderSpec>,
    pub conference_detail: Arc<EncoderSpec>,
    pub attendee_list: Arc<EncoderSpec>,
    pub attendee_detail: Arc<EncoderSpec>,
    pub presentation_list: Arc<EncoderSpec>,
    pub presentation_detail: Arc<EncoderSpec>,
}

impl Encoders {
    pub fn build() -> Result<Self, SpecError> {
        Self::with_encoder(Encoder::default())
    }

    pub fn with_encoder(encoder: Encoder) -> Result<Self, SpecError> {
        let state_list = Arc::new(
            EncoderSpec::builder("StateList", RecordKind::State)
                .fields(["name", "abbreviation"])
                .build()?,
        );

        let location_list = Arc::new(
            EncoderSpec::builder("LocationList", RecordKind::Location)
                .fields(["name"])
                .build()?,
        );

        let conference_list = Arc::new(
            EncoderSpec::builder("ConferenceList", RecordKind::Conference)
                .fields(["name"])
                .build()?,
        );

        let location_detail = Arc::new(
            EncoderSpec::builder("LocationDetail", RecordKind::Location)
                .fields([
                    "name",
                    "city",
                    "room_count",
                    "created",
                    "updated",
                    "state",
                    "image_url",
                    "conferences",
                ])
                .nested("conferences", conference_list.clone())
                .extra(state_abbreviation)
                .build()?,
        );

        let conference_detail = Arc::new(
            EncoderSpec::builder("ConferenceDetail", RecordKind::Conference)
                .fields([
                    "name",
                    "starts",
                    "ends",
                    "description",
                    "created",
                    "updated",
                    "max_presentations",
                    "max_attendees",
                    "location",
                ])
                .nested("location", location_list.clone())
                .build()?,
        );

        let attendee_list = Arc::new(
            EncoderSpec::builder("AttendeeList", RecordKind::Attendee)
                .fields(["name"])
                .build()?,
        );

        let attendee_detail = Arc::new(
            EncoderSpec::builder("AttendeeDetail", RecordKind::Attendee)
                .fields(["email", "name", "company_name", "created", "conference"])
                .nested("conference", conference_list.clone())
                .build()?,
        );

        let presentation_list = Arc::new(
            EncoderSpec::builder("PresentationList", RecordKind::Presentation)
                .fields(["title", "status"])
                .extra(status_name)
                .build()?,
        );

        let presentation_detail = Arc::new(
            EncoderSpec::builder("PresentationDetail", RecordKind::Presentation)
                .fields([
                    "presenter_name",
                    "company_name",
                    "presenter_email",
                    "title",
                    "synopsis",
                    "created",
                    "status",
                    "conference",
                ])
                .nested("conference", conference_list.clone())
                .extra(status_name)
                .build()?,
        );

        Ok(Self {
            encoder,
            state_list,
            location_list,
            location_detail,
            conference_list,
            conference_detail,
            attendee_list,
            attendee_detail,
            presentation_list,
            presentation_detail,
        })
    }

    pub fn one<R: Record>(&self, record: &R, spec: &EncoderSpec) -> Result<Value, EncodeError> {
        self.encoder.encode(Encodable::one(record), spec)
    }

    pub fn many<R: Record>(&self, records: &[R], spec: &EncoderSpec) -> Result<Value, EncodeError> {
        self.encoder.encode(Encodable::many(records), spec)
    }
}

fn state_abbreviation(record: &dyn Record) -> Map<String, Value> {
    let mut extra = Map::new();
    if let Some(location) = record.as_any().downcast_ref::<Location>() {
        extra.insert(
            "state".to_string(),
            Value::String(location.state.abbreviation.clone()),
        );
    }
    extra
}

fn status_name(record: &dyn Record) -> Map<String, Value> {
    let mut extra = Map::new();
    if let Some(presentation) = record.as_any().downcast_ref::<Presentation>() {
        extra.insert(
            "status".to_string(),
            Value::String(presentation.status.name.clone()),
        );
    }
    extra
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::deleted;
use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{CreateAttendee, UpdateAttendee};

#[utoipa::path(
    get,
    path = "/api/conferences/{conference_id}/attendees",
    tag = "attendees",
    params(("conference_id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Attendees of the conference", body = serde_json::Value)
    )
)]
pub async fn list_attendees(
    State(state): State<AppState>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let attendees = state.store.list_attendees(conference_id).await?;
    let encoders = &state.encoders;
    Ok(Json(json!({
        "attendees": encoders.many(&attendees, &encoders.attendee_list)?,
    })))
}

#[utoipa::path(
    post,
    path = "/api/conferences/{conference_id}/attendees",
    tag = "attendees",
    params(("conference_id" = Uuid, Path, description = "Conference ID")),
    request_body = CreateAttendee,
    responses(
        (status = 201, description = "Attendee registered", body = serde_json::Value),
        (status = 400, description = "Invalid conference id")
    )
)]
pub async fn create_attendee(
    State(state): State<AppState>,
    Path(conference_id): Path<Uuid>,
    Json(new_attendee): Json<CreateAttendee>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .store
        .get_conference(conference_id)
        .await
        .map_err(ApiError::reference(ApiError::INVALID_CONFERENCE))?;

    let attendee = state
        .store
        .create_attendee(conference_id, new_attendee)
        .await?;

    let encoders = &state.encoders;
    Ok((
        StatusCode::CREATED,
        Json(encoders.one(&attendee, &encoders.attendee_detail)?),
    ))
}

#[utoipa::path(
    get,
    path = "/api/attendees/{id}",
    tag = "attendees",
    params(("id" = Uuid, Path, description = "Attendee ID")),
    responses(
        (status = 200, description = "Attendee found", body = serde_json::Value),
        (status = 404, description = "Attendee not found")
    )
)]
pub async fn get_attendee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let attendee = state.store.get_attendee(id).await?;
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&attendee, &encoders.attendee_detail)?))
}

#[utoipa::path(
    put,
    path = "/api/attendees/{id}",
    tag = "attendees",
    params(("id" = Uuid, Path, description = "Attendee ID")),
    request_body = UpdateAttendee,
    responses(
        (status = 200, description = "Attendee updated", body = serde_json::Value),
        (status = 404, description = "Attendee not found")
    )
)]
pub async fn update_attendee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateAttendee>,
) -> Result<Json<Value>, ApiError> {
    let attendee = state.store.update_attendee(id, update).await?;
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&attendee, &encoders.attendee_detail)?))
}

#[utoipa::path(
    delete,
    path = "/api/attendees/{id}",
    tag = "attendees",
    params(("id" = Uuid, Path, description = "Attendee ID")),
    responses(
        (status = 200, description = "Whether an attendee was deleted", body = serde_json::Value)
    )
)]
pub async fn delete_attendee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let count = state.store.delete_attendee(id).await?;
    Ok(deleted(count))
}

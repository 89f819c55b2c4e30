use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::deleted;
use crate::app::AppState;
use crate::enrichment::weather_for;
use crate::error::ApiError;
use crate::models::{CreateConference, UpdateConference};

#[utoipa::path(
    get,
    path = "/api/conferences",
    tag = "conferences",
    responses(
        (status = 200, description = "All conferences, ordered by start", body = serde_json::Value),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_conferences(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let conferences = state.store.list_conferences().await?;
    let encoders = &state.encoders;
    Ok(Json(json!({
        "conferences": encoders.many(&conferences, &encoders.conference_list)?,
    })))
}

/// Conference detail together with the current weather at its location.
#[utoipa::path(
    get,
    path = "/api/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Conference and weather (null when unavailable)", body = serde_json::Value),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn get_conference(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let conference = state.store.get_conference(id).await?;
    let location = &conference.location;
    let weather = weather_for(
        state.weather.as_ref(),
        &location.city,
        &location.state.abbreviation,
    )
    .await;

    let encoders = &state.encoders;
    Ok(Json(json!({
        "conference": encoders.one(&conference, &encoders.conference_detail)?,
        "weather": weather,
    })))
}

#[utoipa::path(
    post,
    path = "/api/conferences",
    tag = "conferences",
    request_body = CreateConference,
    responses(
        (status = 201, description = "Conference created", body = serde_json::Value),
        (status = 400, description = "Invalid location id")
    )
)]
pub async fn create_conference(
    State(state): State<AppState>,
    Json(new_conference): Json<CreateConference>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .store
        .get_location(new_conference.location)
        .await
        .map_err(ApiError::reference(ApiError::INVALID_LOCATION))?;

    let conference = state.store.create_conference(new_conference).await?;
    tracing::info!(conference = %conference.id, "Created conference");

    let encoders = &state.encoders;
    Ok((
        StatusCode::CREATED,
        Json(encoders.one(&conference, &encoders.conference_detail)?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    request_body = UpdateConference,
    responses(
        (status = 200, description = "Conference updated", body = serde_json::Value),
        (status = 400, description = "Invalid location id"),
        (status = 404, description = "Conference not found")
    )
)]
pub async fn update_conference(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateConference>,
) -> Result<Json<Value>, ApiError> {
    if let Some(location_id) = update.location {
        state
            .store
            .get_location(location_id)
            .await
            .map_err(ApiError::reference(ApiError::INVALID_LOCATION))?;
    }

    let conference = state.store.update_conference(id, update).await?;

    let encoders = &state.encoders;
    Ok(Json(encoders.one(&conference, &encoders.conference_detail)?))
}

#[utoipa::path(
    delete,
    path = "/api/conferences/{id}",
    tag = "conferences",
    params(("id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Whether a conference was deleted", body = serde_json::Value)
    )
)]
pub async fn delete_conference(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let count = state.store.delete_conference(id).await?;
    Ok(deleted(count))
}

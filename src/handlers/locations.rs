use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::deleted;
use crate::app::AppState;
use crate::enrichment::image_for;
use crate::error::ApiError;
use crate::models::{CreateLocation, LocationChanges, NewLocation, UpdateLocation};

#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "locations",
    responses(
        (status = 200, description = "All locations, ordered by name", body = serde_json::Value),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_locations(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let locations = state.store.list_locations().await?;
    let encoders = &state.encoders;
    Ok(Json(json!({
        "locations": encoders.many(&locations, &encoders.location_list)?,
    })))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "locations",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location found", body = serde_json::Value),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let location = state.store.get_location(id).await?;
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&location, &encoders.location_detail)?))
}

#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "locations",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = serde_json::Value),
        (status = 400, description = "Invalid state abbreviation")
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    Json(new_location): Json<CreateLocation>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let found = state
        .store
        .find_state(&new_location.state)
        .await
        .map_err(ApiError::reference(ApiError::INVALID_STATE))?;

    let image_url = image_for(
        state.images.as_ref(),
        &new_location.city,
        &found.abbreviation,
    )
    .await;

    let location = state
        .store
        .create_location(NewLocation {
            name: new_location.name,
            city: new_location.city,
            room_count: new_location.room_count,
            state_id: found.id,
            image_url,
        })
        .await?;
    tracing::info!(location = %location.id, "Created location");

    let encoders = &state.encoders;
    Ok((
        StatusCode::CREATED,
        Json(encoders.one(&location, &encoders.location_detail)?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    tag = "locations",
    params(("id" = Uuid, Path, description = "Location ID")),
    request_body = UpdateLocation,
    responses(
        (status = 200, description = "Location updated", body = serde_json::Value),
        (status = 400, description = "Invalid state abbreviation"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateLocation>,
) -> Result<Json<Value>, ApiError> {
    let existing = state.store.get_location(id).await?;

    let new_state = match &update.state {
        Some(abbreviation) => Some(
            state
                .store
                .find_state(abbreviation)
                .await
                .map_err(ApiError::reference(ApiError::INVALID_STATE))?,
        ),
        None => None,
    };

    // The picture follows the city, so only look again when the place moved.
    let city = update.city.as_deref().unwrap_or(&existing.city);
    let abbreviation = new_state
        .as_ref()
        .map_or(existing.state.abbreviation.as_str(), |s| s.abbreviation.as_str());
    let moved = city != existing.city || abbreviation != existing.state.abbreviation;
    let image_url = if moved {
        Some(image_for(state.images.as_ref(), city, abbreviation).await)
    } else {
        None
    };

    let location = state
        .store
        .update_location(
            id,
            LocationChanges {
                name: update.name,
                city: update.city,
                room_count: update.room_count,
                state_id: new_state.map(|s| s.id),
                image_url,
            },
        )
        .await?;

    let encoders = &state.encoders;
    Ok(Json(encoders.one(&location, &encoders.location_detail)?))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    tag = "locations",
    params(("id" = Uuid, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Whether a location was deleted", body = serde_json::Value)
    )
)]
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let count = state.store.delete_location(id).await?;
    Ok(deleted(count))
}

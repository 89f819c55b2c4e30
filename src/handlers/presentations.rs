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
use crate::models::{CreatePresentation, UpdatePresentation, STATUS_APPROVED, STATUS_REJECTED};

#[utoipa::path(
    get,
    path = "/api/conferences/{conference_id}/presentations",
    tag = "presentations",
    params(("conference_id" = Uuid, Path, description = "Conference ID")),
    responses(
        (status = 200, description = "Presentations submitted to the conference", body = serde_json::Value)
    )
)]
pub async fn list_presentations(
    State(state): State<AppState>,
    Path(conference_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let presentations = state.store.list_presentations(conference_id).await?;
    let encoders = &state.encoders;
    Ok(Json(json!({
        "presentations": encoders.many(&presentations, &encoders.presentation_list)?,
    })))
}

#[utoipa::path(
    post,
    path = "/api/conferences/{conference_id}/presentations",
    tag = "presentations",
    params(("conference_id" = Uuid, Path, description = "Conference ID")),
    request_body = CreatePresentation,
    responses(
        (status = 201, description = "Presentation submitted", body = serde_json::Value),
        (status = 400, description = "Invalid conference id")
    )
)]
pub async fn create_presentation(
    State(state): State<AppState>,
    Path(conference_id): Path<Uuid>,
    Json(new_presentation): Json<CreatePresentation>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state
        .store
        .get_conference(conference_id)
        .await
        .map_err(ApiError::reference(ApiError::INVALID_CONFERENCE))?;

    let presentation = state
        .store
        .create_presentation(conference_id, new_presentation)
        .await?;
    tracing::info!(presentation = %presentation.id, "Presentation submitted");

    let encoders = &state.encoders;
    Ok((
        StatusCode::CREATED,
        Json(encoders.one(&presentation, &encoders.presentation_detail)?),
    ))
}

#[utoipa::path(
    get,
    path = "/api/presentations/{id}",
    tag = "presentations",
    params(("id" = Uuid, Path, description = "Presentation ID")),
    responses(
        (status = 200, description = "Presentation found", body = serde_json::Value),
        (status = 404, description = "Presentation not found")
    )
)]
pub async fn get_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let presentation = state.store.get_presentation(id).await?;
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&presentation, &encoders.presentation_detail)?))
}

#[utoipa::path(
    put,
    path = "/api/presentations/{id}",
    tag = "presentations",
    params(("id" = Uuid, Path, description = "Presentation ID")),
    request_body = UpdatePresentation,
    responses(
        (status = 200, description = "Presentation updated", body = serde_json::Value),
        (status = 404, description = "Presentation not found")
    )
)]
pub async fn update_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdatePresentation>,
) -> Result<Json<Value>, ApiError> {
    let presentation = state.store.update_presentation(id, update).await?;
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&presentation, &encoders.presentation_detail)?))
}

#[utoipa::path(
    delete,
    path = "/api/presentations/{id}",
    tag = "presentations",
    params(("id" = Uuid, Path, description = "Presentation ID")),
    responses(
        (status = 200, description = "Whether a presentation was deleted", body = serde_json::Value)
    )
)]
pub async fn delete_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let count = state.store.delete_presentation(id).await?;
    Ok(deleted(count))
}

async fn set_status(state: &AppState, id: Uuid, status: &str) -> Result<Json<Value>, ApiError> {
    let presentation = state.store.set_presentation_status(id, status).await?;
    tracing::info!(presentation = %id, status, "Presentation reviewed");
    let encoders = &state.encoders;
    Ok(Json(encoders.one(&presentation, &encoders.presentation_detail)?))
}

#[utoipa::path(
    put,
    path = "/api/presentations/{id}/approval",
    tag = "presentations",
    params(("id" = Uuid, Path, description = "Presentation ID")),
    responses(
        (status = 200, description = "Presentation approved", body = serde_json::Value),
        (status = 404, description = "Presentation not found")
    )
)]
pub async fn approve_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    set_status(&state, id, STATUS_APPROVED).await
}

#[utoipa::path(
    put,
    path = "/api/presentations/{id}/rejection",
    tag = "presentations",
    params(("id" = Uuid, Path, description = "Presentation ID")),
    responses(
        (status = 200, description = "Presentation rejected", body = serde_json::Value),
        (status = 404, description = "Presentation not found")
    )
)]
pub async fn reject_presentation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    set_status(&state, id, STATUS_REJECTED).await
}

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

#[utoipa::path(
    get,
    path = "/api/states",
    tag = "states",
    responses(
        (status = 200, description = "All states, ordered by name", body = serde_json::Value),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_states(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let states = state.store.list_states().await?;
    let encoders = &state.encoders;
    Ok(Json(json!({
        "states": encoders.many(&states, &encoders.state_list)?,
    })))
}

//! Administrative read views across all owners.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::application::envelope::MessageEnvelope;
use crate::infra::http::api::error::{ApiError, admin_to_api};
use crate::infra::http::api::state::ApiState;

pub async fn admin_list_users(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.admin.list_users().await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new("All users data", "users", users)))
}

pub async fn admin_get_user(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.admin.get_user(&id).await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new("One user", "user", user)))
}

pub async fn admin_list_events(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.admin.list_events().await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new("All events data", "events", events)))
}

pub async fn admin_get_event(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.admin.get_event(&id).await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new("One event", "event", event)))
}

pub async fn admin_list_functions(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let functions = state.admin.list_functions().await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new(
        "All functions data",
        "functions",
        functions,
    )))
}

pub async fn admin_get_function(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let function = state.admin.get_function(&id).await.map_err(admin_to_api)?;
    Ok(Json(MessageEnvelope::new("One function", "function", function)))
}

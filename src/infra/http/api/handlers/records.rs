//! Owner-scoped record handlers, shared by events and functions.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::envelope::{ItemEnvelope, ListEnvelope, MessageEnvelope};
use crate::infra::http::api::error::{ApiError, codes, read_to_api, record_to_api};
use crate::infra::http::api::models::{DeletedResponse, ListQuery};
use crate::infra::http::api::state::{ApiState, RoutedResource};
use crate::infra::http::middleware::OwnerContext;

pub async fn list_records<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = R::service(&state)
        .list(ctx.owner, query.page_request())
        .await
        .map_err(read_to_api)?;

    Ok(Json(ListEnvelope::for_resource(page)))
}

pub async fn get_record<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let record = R::service(&state)
        .get(ctx.owner, &id)
        .await
        .map_err(read_to_api)?;

    Ok(Json(ItemEnvelope::for_resource(record)))
}

pub async fn create_record<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload.map_err(body_to_api)?;
    let record = R::service(&state)
        .create(ctx.owner, draft)
        .await
        .map_err(record_to_api)?;

    let body = MessageEnvelope::new(R::KIND.created_message(), R::KIND.singular(), record);
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn update_record<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
    Path(id): Path<String>,
    payload: Result<Json<R::Draft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload.map_err(body_to_api)?;
    let record = R::service(&state)
        .update(ctx.owner, &id, draft)
        .await
        .map_err(record_to_api)?;

    let body = MessageEnvelope::new(R::KIND.updated_message(), R::KIND.singular(), record);
    Ok(Json(body))
}

pub async fn delete_record<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    R::service(&state)
        .delete(ctx.owner, &id)
        .await
        .map_err(record_to_api)?;

    Ok(Json(DeletedResponse {
        msg: R::KIND.deleted_message(),
        deleted: None,
    }))
}

pub async fn delete_all_records<R: RoutedResource>(
    State(state): State<ApiState>,
    Extension(ctx): Extension<OwnerContext>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = R::service(&state)
        .delete_all(ctx.owner)
        .await
        .map_err(record_to_api)?;

    Ok(Json(DeletedResponse {
        msg: R::KIND.deleted_all_message(),
        deleted: Some(deleted),
    }))
}

fn body_to_api(rejection: JsonRejection) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        codes::INVALID_BODY,
        "Request body could not be parsed",
        Some(rejection.body_text()),
    )
}

use axum::{
    extract::{Json, Path, State},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, handlers::AppState};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCenterRequest {
    #[validate(length(min = 1, max = 50))]
    pub value: String,
    #[validate(length(min = 1, max = 100))]
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// List active storage centers
#[utoipa::path(
    get,
    path = "/api/v1/storage-centers",
    responses(
        (status = 200, description = "Centers listed", body = Vec<crate::services::storage_centers::CenterOption>)
    ),
    tag = "storage-centers"
)]
pub async fn list_centers(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let centers = state
        .services
        .storage_centers
        .list_centers()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(centers))
}

/// Register a storage center
#[utoipa::path(
    post,
    path = "/api/v1/storage-centers",
    request_body = CreateCenterRequest,
    responses(
        (status = 201, description = "Center registered", body = serde_json::Value),
        (status = 409, description = "Center value already exists", body = crate::errors::ErrorResponse)
    ),
    tag = "storage-centers"
)]
pub async fn create_center(
    State(state): State<AppState>,
    Json(payload): Json<CreateCenterRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let center = state
        .services
        .storage_centers
        .create_center(payload.value, payload.label, payload.sort_order)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(center))
}

/// Deactivate a storage center
#[utoipa::path(
    delete,
    path = "/api/v1/storage-centers/{id}",
    params(("id" = Uuid, Path, description = "Storage center ID")),
    responses(
        (status = 204, description = "Center deactivated"),
        (status = 404, description = "Center not found", body = crate::errors::ErrorResponse)
    ),
    tag = "storage-centers"
)]
pub async fn deactivate_center(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .storage_centers
        .deactivate_center(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn storage_center_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_centers).post(create_center))
        .route("/{id}", delete(deactivate_center))
}
